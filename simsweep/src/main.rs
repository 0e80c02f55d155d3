//! Main entry point for the simsweep binary
//!
//! Loads an experiment set and a config template, then runs every
//! experiment through the simulator with the real services.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use shared::{logging, ExperimentSet};
use simsweep::{
    services::{RealArtifactStore, RealSimulatorLauncher},
    ConfigTemplate, Orchestrator, RunConfig,
};

/// Run a sweep of simulator experiments with bounded concurrency
#[derive(Parser)]
#[command(name = "simsweep")]
#[command(about = "Runs the network simulator once per experiment, at most one process per CPU")]
pub struct Args {
    /// Path to the simulator binary
    pub binary: PathBuf,

    /// Experiment type passed to the simulator as its first argument
    #[arg(allow_negative_numbers = true)]
    pub experiment_type: i32,

    /// JSON file mapping experiment names to template parameters
    pub experiments: PathBuf,

    /// Configuration template file
    pub template: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logging::init_tracing(Some(&args.log_level));

    let experiments = ExperimentSet::from_json_file(&args.experiments)
        .with_context(|| format!("loading experiments from {}", args.experiments.display()))?;

    let template_text = tokio::fs::read_to_string(&args.template)
        .await
        .with_context(|| format!("reading template {}", args.template.display()))?;
    let template = ConfigTemplate::parse(&template_text)
        .with_context(|| format!("parsing template {}", args.template.display()))?;

    let config = RunConfig::new(args.binary, args.experiment_type);
    let orchestrator = Orchestrator::new(config, RealArtifactStore::new(), RealSimulatorLauncher::new())?;

    let summary = orchestrator.run(&experiments, &template).await?;

    tracing::debug!(
        summary = %serde_json::to_string(&summary)?,
        "Run summary"
    );
    println!("{}", summary.report());
    Ok(())
}
