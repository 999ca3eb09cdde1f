use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// The exact response shape as pretty JSON.
    Json,
}

impl OutputFormat {
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Command-line interface for the `skillmatch` application.
#[derive(Debug, Parser)]
#[command(
    name = "skillmatch",
    version,
    about = "Match tasks to developers and optimize team assignments"
)]
pub struct Cli {
    /// Config file (default: `~/.skillmatch/config.toml`).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Workspace whose policy table applies (overrides `SKILLMATCH_WORKSPACE`).
    #[arg(long, global = true, value_name = "ID")]
    pub workspace: Option<String>,
    /// Minimum score for the optimizer to consider a pair.
    #[arg(long, global = true, value_name = "SCORE")]
    pub min_viable_score: Option<f64>,
    /// Smallest peer group that yields percentiles.
    #[arg(long, global = true, value_name = "N")]
    pub min_peer_group: Option<usize>,
    /// Largest task x developer matrix solved exactly.
    #[arg(long, global = true, value_name = "PAIRS")]
    pub exact_pair_limit: Option<usize>,
    #[command(subcommand)]
    pub command: Commands,
}

/// Workspace snapshot input shared by commands that read developers.
#[derive(Debug, Clone, Args)]
pub struct WorkspaceArgs {
    /// JSON file with `developers` and `workloads`.
    #[arg(long, env = "SKILLMATCH_WORKSPACE_FILE", value_name = "FILE")]
    pub workspace_file: PathBuf,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Available `skillmatch` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Ranks every developer for one task.
    Match {
        #[command(flatten)]
        workspace: WorkspaceArgs,
        /// Task title.
        #[arg(long)]
        title: String,
        /// Task description.
        #[arg(long, default_value = "")]
        description: String,
        /// Where the task came from.
        #[arg(long)]
        source: Option<String>,
        /// Structured labels (`skill:rust`, `prefer:tokio`, `domain:payments`, ...). Repeatable.
        #[arg(long = "label", value_name = "LABEL")]
        labels: Vec<String>,
        /// JSON file with precomputed task signals; labels are ignored when set.
        #[arg(long, value_name = "FILE")]
        signals: Option<PathBuf>,
    },
    /// Allocates tasks to maximize total match score under capacity limits.
    Optimize {
        #[command(flatten)]
        workspace: WorkspaceArgs,
        /// JSON array of tasks.
        #[arg(long, value_name = "FILE")]
        tasks: PathBuf,
        /// Maximum open tasks per developer, counting current ones.
        #[arg(long, value_name = "N", allow_negative_numbers = true)]
        max_per_developer: Option<i64>,
        /// JSON object of developer id to current task count.
        #[arg(long, value_name = "FILE")]
        current_workloads: Option<PathBuf>,
    },
    /// Scores a proposed allocation without optimizing it.
    Simulate {
        #[command(flatten)]
        workspace: WorkspaceArgs,
        /// Scenario name.
        #[arg(long, default_value = "proposed")]
        name: String,
        /// JSON array of tasks.
        #[arg(long, value_name = "FILE")]
        tasks: PathBuf,
        /// JSON array of `{task_id, developer_id}` pairs.
        #[arg(long, value_name = "FILE")]
        proposal: PathBuf,
        /// JSON object of developer id to current task count.
        #[arg(long, value_name = "FILE")]
        current_workloads: Option<PathBuf>,
    },
    /// Compares two scenario files produced by `optimize` or `simulate --format json`.
    Compare {
        /// Baseline scenario.
        scenario_a: PathBuf,
        /// Candidate scenario.
        scenario_b: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Benchmarks a developer against their peers.
    Benchmark {
        #[command(flatten)]
        workspace: WorkspaceArgs,
        /// Developer to benchmark.
        developer_id: String,
        /// Restrict peers to developers holding this domain.
        #[arg(long)]
        domain: Option<String>,
    },
    /// Reports team coverage for target skills.
    SkillGaps {
        #[command(flatten)]
        workspace: WorkspaceArgs,
        /// Target skills.
        #[arg(required = true)]
        skills: Vec<String>,
    },
    /// Sprint planning.
    Sprint {
        #[command(subcommand)]
        command: SprintCommand,
    },
    /// Prints the resolved engine configuration.
    Config {
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Sprint subcommands, each reading a sprint plan JSON file.
#[derive(Debug, Subcommand)]
pub enum SprintCommand {
    /// Capacity of the sprint's participants.
    Capacity(SprintArgs),
    /// Suggested assignments for the sprint's tasks.
    #[command(alias = "optimize")]
    Suggest(SprintArgs),
    /// Predicted completion of the sprint.
    Predict(SprintArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SprintArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,
    /// JSON sprint plan.
    #[arg(long, value_name = "FILE")]
    pub sprint: PathBuf,
}
