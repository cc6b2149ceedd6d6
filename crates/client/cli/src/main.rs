//! Headless battle simulator entry point.
mod app;
mod pacing;
mod presentation;

use std::path::PathBuf;

use anyhow::Result;
use app::SimApp;
use clap::Parser;

/// Runs a scripted battle scenario to completion
#[derive(Parser, Debug)]
#[command(name = "battle-cli")]
#[command(about = "Headless simulator for elemental grid battles", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding config.toml and scenarios/
    #[arg(short, long, value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Scenario to run (file stem under scenarios/)
    #[arg(short, long, value_name = "NAME", default_value = "flooded_ruins")]
    pub scenario: String,

    /// Override the scenario's RNG seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many rounds if the battle is still running
    #[arg(long, default_value = "50")]
    pub max_turns: u32,

    /// Pause at every turn barrier, in milliseconds
    #[arg(long, default_value = "0")]
    pub pace_ms: u64,

    /// Print every battle event, not just the summary
    #[arg(short, long)]
    pub verbose: bool,

    /// List available scenarios and exit
    #[arg(long)]
    pub list: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging();

    SimApp::new(cli).run()
}

/// Setup logging to stderr
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
