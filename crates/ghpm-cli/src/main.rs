//! ghpm CLI entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ghpm_cli::cmd;
use ghpm_cli::ops::Context;
use ghpm_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        cmd::completions::completions(shell);
        return Ok(());
    }

    let ctx = Context::from_cli(&cli)?;

    match cli.command {
        Commands::Install { target, no_build } => {
            cmd::install::install(&ctx.with_no_build(no_build), &target).await
        }
        Commands::Remove { name } => cmd::remove::remove(&ctx, &name),
        Commands::List => cmd::list::list(&ctx),
        Commands::Search { query, limit } => cmd::search::search(&ctx, &query, limit).await,
        Commands::Update { name, no_build } => {
            cmd::update::update(&ctx.with_no_build(no_build), &name)
        }
        Commands::Info { name } => cmd::info::info(&ctx, &name),
        Commands::Completions { .. } => Ok(()),
    }
}
