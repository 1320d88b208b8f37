mod cli;
mod commands;
mod config;
mod observability;
mod output;

use anyhow::{Result, anyhow};
use clap::Parser;
use sbrecon_core::Reconciler;

use cli::{Cli, Commands};
use commands::{endpoint, namespace};
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.format.unwrap_or_default();

    let cfg = config::loader::load_config(cli.config.as_deref()).map_err(|e| anyhow!(e))?;
    observability::init_tracing_with_level(&cfg.logging.level);

    let bus = namespace::open(&cli.namespace, cfg.namespace_options()).await?;
    let reconciler = Reconciler::with_config(bus.clone(), cfg.reconciler.clone());

    match &cli.command {
        Commands::Create(args) => {
            endpoint::create(&reconciler, &bus, &cli.namespace, args, format).await?;
        }
        Commands::Read(args) => {
            endpoint::read(&reconciler, args, format).await?;
        }
        Commands::Lookup(args) => {
            endpoint::lookup(&reconciler, args, format).await?;
        }
        Commands::Import(args) => {
            endpoint::import(&reconciler, args, format).await?;
        }
        Commands::Topic(args) => {
            namespace::create_topic(&bus, &cli.namespace, &args.name).await?;
        }
        Commands::Status(args) => {
            endpoint::status(&args.state).await?;
        }
    }

    Ok(())
}
