//! Tokentune command-line entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use tokentune_core::{pipeline, PreprocessConfig};

#[derive(Debug, Parser)]
#[command(name = "tokentune", version, about = "Prepare raw audio recordings for model training")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize, slice, and filter audio files, emitting clips + a manifest.
    Preprocess {
        /// Directory of raw .wav recordings (flat, non-recursive).
        #[arg(long = "input_dir")]
        input_dir: PathBuf,
        /// Directory receiving the clips and the manifest.
        #[arg(long = "output_dir")]
        output_dir: PathBuf,
        /// Path to the JSON run configuration.
        #[arg(long = "config")]
        config: PathBuf,
    },
}

fn main() {
    // ── Tracing ───────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tokentune_core=info,tokentune_cli=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("tokentune failed: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Preprocess {
            input_dir,
            output_dir,
            config,
        } => {
            info!(
                input_dir = %input_dir.display(),
                output_dir = %output_dir.display(),
                config = %config.display(),
                "tokentune preprocess starting"
            );

            let config = PreprocessConfig::load(&config)?;
            let summary = pipeline::run(&input_dir, &output_dir, &config)
                .with_context(|| format!("preprocessing {} failed", input_dir.display()))?;

            println!(
                "Preprocessed {} clips to {}",
                summary.clips_accepted,
                output_dir.display()
            );
            println!("Manifest written to {}", summary.manifest_path.display());
            Ok(())
        }
    }
}
