pub mod cli;
pub mod config;

pub use cli::{AgentCommands, BatchArgs, Cli, Commands, InspectArgs, NetworkArgs, SolveArgs};
pub use config::{load_config, MsppConfig};
