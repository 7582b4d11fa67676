use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;
pub mod ux_error;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    debug!("Using YAML file {}", cli.yaml.display());

    match cli.command {
        Commands::Probe(cmd) => commands::probe::run(cmd, &cli.yaml).await,
        Commands::Stanza(args) => commands::stanza::run(args, &cli.yaml),
        Commands::Roles(args) => commands::roles::run(args, &cli.yaml),
        Commands::Cluster(args) => commands::cluster::run(args, &cli.yaml),
        Commands::Completion(args) => commands::completion::run(args)
    }
}
