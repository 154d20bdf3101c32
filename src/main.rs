//! resumegen: collect a directory of YAML resumes into one JSON file.
//!
//! Walks the input tree, parses every file as YAML, and writes the successfully
//! parsed documents as a single JSON array for the static site:
//!
//! `resumegen -i site/resumes/ -o site/static -n resumes`
//!
//! Files that fail to read or parse are logged and skipped. A missing input
//! directory is fatal.

mod aggregate;
mod config;
mod convert;
mod error;
mod load;
mod walk;

use anyhow::{Context, Result};
use clap::Parser;
use config::PipelineConfig;
use std::io::IsTerminal;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "resumegen",
    about = "Collect YAML resumes into a single JSON file for the static site"
)]
struct Cli {
    /// Directory tree containing the resume files
    #[arg(short = 'i', long, default_value = config::DEFAULT_INPUT_ROOT)]
    input: PathBuf,

    /// Output directory (created if missing)
    #[arg(short = 'o', long, default_value = config::DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Output file name, without the .json extension
    #[arg(short = 'n', long, default_value = config::DEFAULT_OUTPUT_NAME)]
    name: String,

    /// Maximum number of files loaded at once (default: unbounded)
    #[arg(short = 'j', long)]
    max_concurrency: Option<NonZeroUsize>,

    /// Exit with an error if the JSON file cannot be written
    #[arg(long)]
    strict: bool,

    /// Only log errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            input_root: self.input.clone(),
            output_dir: self.output.clone(),
            output_name: self.name.clone(),
            max_concurrency: self.max_concurrency,
            strict_write: self.strict,
        }
    }

    fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level());
    run(&cli.pipeline_config()).await
}

/// Progress goes to stdout, warnings and errors to stderr. `RUST_LOG`
/// overrides the level chosen on the command line.
fn init_tracing(level: &str) {
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(std::io::stdout().is_terminal())
                .with_target(false)
                .without_time(),
        )
        .init();
}

/// Walk → load → collect → write.
async fn run(config: &PipelineConfig) -> Result<()> {
    let paths = walk::walk(&config.input_root)
        .await
        .with_context(|| format!("Error processing resumes in {}", config.input_root.display()))?;
    info!(count = paths.len(), "found resume files");

    let results = load::load_all(&load::FsSource, &paths, config.max_concurrency).await;
    let resumes = aggregate::collect(results);
    info!(count = resumes.len(), "parsed resumes");

    aggregate::publish(&resumes, config)
        .await
        .context("Error writing JSON file")?;

    info!("All resumes processed successfully.");
    Ok(())
}
