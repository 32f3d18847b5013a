use std::path::Path;

use anyhow::Result;
use dressel::{ContentKind, Mirror, MirrorReport};

use super::RunContext;

/// Mirror every suffix listed in `manifest`, decoded as `kind`.
pub async fn run(ctx: &RunContext, manifest: &Path, kind: ContentKind) -> Result<MirrorReport> {
    let entries = dressel::load_suffixes(manifest)?;

    let pb = ctx.progress_bar(entries.len() as u64);
    let report = Mirror::new(&ctx.client, &ctx.root)
        .skip_existing(ctx.skip_existing)
        .with_progress(pb.clone())
        .pull(&entries, kind)
        .await;
    pb.finish_and_clear();

    Ok(report?)
}
