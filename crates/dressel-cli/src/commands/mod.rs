pub mod pairs;
pub mod pull;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dressel::MirrorReport;
use dressel_earthdata::EarthdataClient;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::AppConfig;

/// Everything a pull command needs, resolved once at startup.
pub struct RunContext {
    pub client: EarthdataClient,
    pub root: PathBuf,
    pub skip_existing: bool,
    pub show_progress: bool,
}

/// Flags shared by every pull command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct MirrorArgs {
    /// Local mirror root (defaults to ~/datasets)
    #[arg(long)]
    pub root: Option<PathBuf>,
    /// Re-fetch entries even when their local file already exists
    #[arg(long)]
    pub no_skip_existing: bool,
}

impl RunContext {
    /// Load the token and build the client. Fails before any request is made
    /// if the token file is missing or empty.
    pub fn resolve(config: &AppConfig, args: &MirrorArgs, no_progress_bar: bool) -> Result<Self> {
        let token_path = config
            .token_path()
            .context("could not determine token file location")?;
        let token = dressel_earthdata::load_token(&token_path)?;
        let client = EarthdataClient::with_base_url(&token, config.base_url())?;

        let root = match &args.root {
            Some(root) => root.clone(),
            None => config
                .mirror_root()
                .context("could not determine home directory for mirror root")?,
        };

        Ok(Self {
            client,
            root,
            skip_existing: config.skip_existing() && !args.no_skip_existing,
            show_progress: !no_progress_bar,
        })
    }

    pub fn progress_bar(&self, total: u64) -> ProgressBar {
        create_progress_bar(!self.show_progress, total)
    }
}

/// Create a progress bar with a consistent template.
///
/// Hidden when the user passed `--no-progress-bar` or stderr is not a TTY.
pub fn create_progress_bar(no_progress_bar: bool, total: u64) -> ProgressBar {
    if no_progress_bar || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> "),
    );
    pb
}

pub fn print_report(report: &MirrorReport) {
    println!(
        "Fetched {} ({} already present, {} not found).",
        report.fetched,
        report.skipped_existing,
        report.not_found.len()
    );
}
