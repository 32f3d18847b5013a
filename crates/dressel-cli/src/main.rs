mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use dressel::ContentKind;
use tracing_subscriber::EnvFilter;

use crate::commands::{MirrorArgs, RunContext};

#[derive(Parser)]
#[command(name = "dressel")]
#[command(about = "Mirror Earthdata archive resources into a local dataset directory")]
struct Cli {
    /// Log verbosity when RUST_LOG is not set
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    log_level: LogLevel,

    /// Disable the progress bar
    #[arg(long, global = true)]
    no_progress_bar: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch every suffix listed in a manifest (the default command)
    Pull {
        /// Manifest file, one path suffix per line
        #[arg(long, default_value = "extensions.txt")]
        manifest: PathBuf,
        /// How to decode and store each resource (raw, image, text)
        #[arg(long, default_value = "raw")]
        kind: ContentKind,
        #[command(flatten)]
        mirror: MirrorArgs,
    },
    /// Fetch image/annotation pairs from two positionally matched manifests
    PullPairs {
        /// Manifest of image suffixes
        #[arg(long)]
        images: PathBuf,
        /// Manifest of annotation suffixes
        #[arg(long)]
        annotations: PathBuf,
        #[command(flatten)]
        mirror: MirrorArgs,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

fn init_logging(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let app_config = config::load_config();

    let command = cli.command.unwrap_or_else(|| Command::Pull {
        manifest: PathBuf::from("extensions.txt"),
        kind: ContentKind::Raw,
        mirror: MirrorArgs::default(),
    });

    let report = match command {
        Command::Pull {
            manifest,
            kind,
            mirror,
        } => {
            let ctx = RunContext::resolve(&app_config, &mirror, cli.no_progress_bar)?;
            commands::pull::run(&ctx, &manifest, kind).await?
        }
        Command::PullPairs {
            images,
            annotations,
            mirror,
        } => {
            let ctx = RunContext::resolve(&app_config, &mirror, cli.no_progress_bar)?;
            commands::pairs::run(&ctx, &images, &annotations).await?
        }
    };

    commands::print_report(&report);
    Ok(())
}
