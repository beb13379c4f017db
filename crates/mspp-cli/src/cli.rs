use clap::{Parser, Subcommand, ValueHint};
use mspp_algo::{SolverKind, Symmetry, Variant};
use mspp_io::Layout;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mspp", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    /// Configuration file (defaults to ~/.mspp/config.toml when present)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Route agents over one network instance and write the solution
    Solve(SolveArgs),
    /// Solve every instance of a network file with one or more variants
    Batch(BatchArgs),
    /// Print network statistics, diagnostics and model sizes
    Inspect(InspectArgs),
    /// Agent set utilities
    Agents {
        #[command(subcommand)]
        command: AgentCommands,
    },
    /// List the supported formulation variants
    Variants,
}

/// Where the network comes from.
#[derive(clap::Args, Debug, Clone)]
pub struct NetworkArgs {
    /// Weight table (CSV)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub network: PathBuf,
    /// Orientation of the weight table
    #[arg(long, default_value = "rows")]
    pub layout: Layout,
}

#[derive(clap::Args, Debug)]
pub struct SolveArgs {
    #[command(flatten)]
    pub input: NetworkArgs,
    /// Instance label or zero-based position in the file (defaults to the first)
    #[arg(long)]
    pub instance: Option<String>,
    /// Agent list (JSON or CSV)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub agents: PathBuf,
    /// Formulation variant (MSPP, ABP, NBP, ALP, NLP, AQP, NQP)
    #[arg(long)]
    pub variant: Option<Variant>,
    /// MILP backend
    #[arg(long)]
    pub solver: Option<SolverKind>,
    /// Wall-clock limit in seconds
    #[arg(long)]
    pub time_limit: Option<f64>,
    /// Output solution file (JSON)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub out: PathBuf,
    /// Also write the routes as Graphviz DOT
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub dot: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    #[command(flatten)]
    pub input: NetworkArgs,
    /// Agent list (JSON or CSV)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub agents: PathBuf,
    /// Comma-separated variants, e.g. `abp,nbp`
    #[arg(long, value_delimiter = ',')]
    pub variants: Vec<Variant>,
    /// MILP backend
    #[arg(long)]
    pub solver: Option<SolverKind>,
    /// Per-job wall-clock limit in seconds
    #[arg(long)]
    pub time_limit: Option<f64>,
    /// Output directory for solutions and the batch manifest
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub out: PathBuf,
    /// Worker threads (0 = all CPUs)
    #[arg(long)]
    pub threads: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: NetworkArgs,
    /// Agent list; enables reachability checks and model sizes
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub agents: Option<PathBuf>,
    /// Only report model sizes for this variant
    #[arg(long)]
    pub variant: Option<Variant>,
    /// Print a JSON document instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// Generate an agent set for a layered grid
    Generate {
        /// Nodes per column
        #[arg(long)]
        rows: usize,
        /// Number of columns
        #[arg(long)]
        cols: usize,
        /// Number of agents
        #[arg(long)]
        count: usize,
        /// Endpoint overlap: high, medium or low
        #[arg(long, default_value = "medium")]
        symmetry: Symmetry,
        /// Seed for reproducible sets
        #[arg(long)]
        seed: Option<u64>,
        /// Output file (JSON)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
    },
}
