use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use karasu_core::RunConfig;
use karasu_trainer::run_training;

/// Train a GCN node classifier on a graph dataset.
#[derive(Parser)]
#[command(name = "train", version)]
struct Args {
    /// Path to the run configuration JSON.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Override the configured number of epochs.
    #[arg(long)]
    epochs: Option<usize>,
}

fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let args = Args::parse();
    let mut cf = RunConfig::from_file(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;
    if let Some(epochs) = args.epochs {
        cf.epochs = epochs;
    }

    run_training(cf)?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Training failed: {e:#}");
        std::process::exit(1);
    }
}
