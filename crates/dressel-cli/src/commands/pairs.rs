use std::path::Path;

use anyhow::Result;
use dressel::{Mirror, MirrorReport};

use super::RunContext;

/// Mirror image/annotation pairs listed positionally in two manifests.
pub async fn run(ctx: &RunContext, images: &Path, annotations: &Path) -> Result<MirrorReport> {
    let pairs = dressel::load_pairs(images, annotations)?;

    let pb = ctx.progress_bar(pairs.len() as u64);
    let report = Mirror::new(&ctx.client, &ctx.root)
        .skip_existing(ctx.skip_existing)
        .with_progress(pb.clone())
        .pull_pairs(&pairs)
        .await;
    pb.finish_and_clear();

    Ok(report?)
}
