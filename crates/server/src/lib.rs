//! Service layer and command-line surface for skillmatch.
//!
//! This crate wires the pure engine in `skillmatch-intelligence` to its
//! collaborators: a [`DeveloperDirectory`] for fingerprints and workloads and
//! a [`SignalClassifier`] for task signals. [`MatchingService`] is the async
//! facade; [`run`] is the entry point of the `skillmatch` binary.
//!
//! Logs go to stderr (filtered by `RUST_LOG`) so `--format json` output on
//! stdout stays machine-readable.

pub mod cli;
mod commands;
pub mod providers;
pub mod service;

pub use cli::{Cli, Commands, OutputFormat, SprintCommand};
pub use providers::{
    DeveloperDirectory, JsonWorkspaceDirectory, LabelClassifier, MemoryDirectory,
    PrecomputedClassifier, SignalClassifier, TaskDescription, WorkspaceFile, LABEL_CONFIDENCE,
};
pub use service::MatchingService;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{
    handle_benchmark_command, handle_compare_command, handle_config_command,
    handle_match_command, handle_optimize_command, handle_simulate_command,
    handle_skill_gaps_command, handle_sprint_command,
};
use skillmatch_state::{resolve, ConfigOverrides};
use tokio::runtime::Runtime;

/// The main entry point for the `skillmatch` application.
pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let output = execute(Cli::parse())?;
    println!("{output}");
    Ok(())
}

/// Resolve configuration, run one command, and return its rendered output.
pub fn execute(cli: Cli) -> Result<String> {
    let resolved = resolve(&ConfigOverrides {
        config_path: cli.config,
        workspace: cli.workspace,
        min_viable_score: cli.min_viable_score,
        min_peer_group_size: cli.min_peer_group,
        exact_pair_limit: cli.exact_pair_limit,
    })
    .context("failed to resolve configuration")?;
    let config = &resolved.engine;
    let command = cli.command;

    let rt = Runtime::new()?;
    rt.block_on(async {
        match command {
            Commands::Match {
                workspace,
                title,
                description,
                source,
                labels,
                signals,
            } => {
                handle_match_command(
                    config,
                    workspace,
                    title,
                    description,
                    source,
                    labels,
                    signals,
                )
                .await
            }
            Commands::Optimize {
                workspace,
                tasks,
                max_per_developer,
                current_workloads,
            } => {
                handle_optimize_command(
                    config,
                    workspace,
                    tasks,
                    max_per_developer,
                    current_workloads,
                )
                .await
            }
            Commands::Simulate {
                workspace,
                name,
                tasks,
                proposal,
                current_workloads,
            } => {
                handle_simulate_command(
                    config,
                    workspace,
                    name,
                    tasks,
                    proposal,
                    current_workloads,
                )
                .await
            }
            Commands::Benchmark {
                workspace,
                developer_id,
                domain,
            } => handle_benchmark_command(config, workspace, developer_id, domain).await,
            Commands::SkillGaps { workspace, skills } => {
                handle_skill_gaps_command(config, workspace, skills).await
            }
            Commands::Sprint { command } => handle_sprint_command(config, command).await,
            Commands::Config { format } => handle_config_command(&resolved, format),
            Commands::Compare {
                scenario_a,
                scenario_b,
                format,
            } => handle_compare_command(config, scenario_a, scenario_b, format),
        }
    })
}
