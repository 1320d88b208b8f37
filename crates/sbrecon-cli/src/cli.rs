use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "sbrecon")]
#[command(about = "Reconcile Service Bus endpoints against a namespace snapshot")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file (defaults to ./sbrecon.toml)
    #[arg(short, long, global = true, env = "SBRECON_CONFIG")]
    pub config: Option<String>,

    /// Namespace snapshot to reconcile against
    #[arg(
        short,
        long,
        global = true,
        env = "SBRECON_NAMESPACE",
        default_value = "namespace.json"
    )]
    pub namespace: PathBuf,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an endpoint from a plan file
    Create(CreateArgs),
    /// Refresh a recorded endpoint state
    Read(ReadArgs),
    /// Describe an existing endpoint
    Lookup(LookupArgs),
    /// Build the state of an existing endpoint from `<topic>,<endpoint>`
    Import(ImportArgs),
    /// Show the reconciliation status of a recorded state
    Status(StatusArgs),
    /// Create a topic in the namespace snapshot
    Topic(TopicArgs),
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// JSON file with the declared endpoint
    #[arg(long)]
    pub plan: PathBuf,
    /// The primary queue already exists and must not be created
    #[arg(long)]
    pub skip_queue: bool,
    /// The endpoint already exists; additional queues are not created
    #[arg(long)]
    pub skip_endpoint: bool,
    /// Where to write the resulting state
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ReadArgs {
    /// JSON file with the recorded state
    #[arg(long)]
    pub state: PathBuf,
    /// Where to write the refreshed state
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct LookupArgs {
    #[arg(long)]
    pub topic: String,
    #[arg(long)]
    pub endpoint: String,
}

#[derive(clap::Args)]
pub struct ImportArgs {
    /// Import id, e.g. `bundle-1,orders`
    pub id: String,
    /// Where to write the imported state
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct StatusArgs {
    /// JSON file with the recorded state
    #[arg(long)]
    pub state: PathBuf,
}

#[derive(clap::Args)]
pub struct TopicArgs {
    /// Topic name
    pub name: String,
}
