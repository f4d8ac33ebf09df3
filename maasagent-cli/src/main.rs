//! maas-agent - rack controller agent binary
//!
//! Thin wrapper around the `maasagent` library: parses arguments, runs
//! the startup pipeline and maps the outcome to a process exit code.

use clap::Parser;
use std::path::PathBuf;
use std::process;

mod error;
mod runner;

#[derive(Parser)]
#[command(name = "maas-agent")]
#[command(version)]
#[command(about = "MAAS rack agent connecting to the region orchestrator", long_about = None)]
struct Args {
    /// Configuration file path (overrides MAAS_AGENT_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    process::exit(runner::run(args.config));
}
