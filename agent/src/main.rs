//! Batch-node execution agent for filesystem-polled CI steps.
//!
//! Runs inside a scheduler allocation and polls a shared working directory:
//! step scripts dropped by the orchestrator are executed with captured
//! output, completion is published as a `.executed` copy, and an exit
//! sentinel terminates the agent cleanly. With no work and no prior
//! executions the agent exits with failure after a bounded idle window, so
//! an unused allocation is not kept alive.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use agent::config::{AgentConfig, load_config};
use agent::exit_codes;
use agent::io::env_snapshot::write_env_snapshot;
use agent::io::executor::BashExecutor;
use agent::io::sync::CommandSyncer;
use agent::logging;
use agent::looping::{LoopStop, run_loop};

#[derive(Parser, Debug)]
#[command(
    name = "agent",
    version,
    about = "Single-node execution agent bridging a batch allocation with a CI orchestrator"
)]
struct Cli {
    /// Working directory polled for step scripts and the exit sentinel.
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Optional TOML config file; a missing file falls back to defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append agent diagnostics to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Path for the startup environment snapshot.
    #[arg(long, default_value = "env.log")]
    env_log: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            process::exit(exit_codes::FAILURE);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    match &cli.log_file {
        Some(path) => logging::init_file(path)?,
        None => logging::init(),
    }

    write_env_snapshot(&cli.env_log).context("write environment snapshot")?;

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AgentConfig::default(),
    };

    let outcome = run_loop(&cli.dir, &BashExecutor, &CommandSyncer, &config, |step| {
        debug!(script = %step.script, "step completed");
    })?;

    Ok(match outcome.stop {
        LoopStop::ExitSentinel { .. } => exit_codes::OK,
        LoopStop::StepFailed { .. } | LoopStop::IdleTimeout { .. } => exit_codes::FAILURE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let cli = Cli::parse_from(["agent"]);
        assert_eq!(cli.dir, PathBuf::from("."));
        assert_eq!(cli.env_log, PathBuf::from("env.log"));
        assert!(cli.config.is_none());
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn parse_overrides() {
        let cli = Cli::parse_from([
            "agent",
            "--dir",
            "/scratch/job",
            "--config",
            "agent.toml",
            "--log-file",
            "agent.log",
            "--env-log",
            "/scratch/job/env.log",
        ]);
        assert_eq!(cli.dir, PathBuf::from("/scratch/job"));
        assert_eq!(cli.config, Some(PathBuf::from("agent.toml")));
        assert_eq!(cli.log_file, Some(PathBuf::from("agent.log")));
        assert_eq!(cli.env_log, PathBuf::from("/scratch/job/env.log"));
    }
}
