use anyhow::Context;
use clap::Parser;
use mspp_cli::{load_config, Cli, Commands};
use tracing::debug;
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let config = load_config(cli.config.as_deref())?;
    debug!(?config, "loaded configuration");

    match &cli.command {
        Commands::Solve(args) => commands::solve::handle(args, &config),
        Commands::Batch(args) => commands::batch::handle(args, &config),
        Commands::Inspect(args) => commands::inspect::handle(args),
        Commands::Agents { command } => commands::agents::handle(command),
        Commands::Variants => commands::variants::handle(),
    }
}
