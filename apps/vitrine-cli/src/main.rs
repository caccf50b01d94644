//! vitrine CLI - vendor feed to storefront catalog synchronization
//!
//! Subcommands cover the full reconciliation surface:
//! - `sync` diffs the feed against the local store and converges the backend
//! - `item` converges a single item, resending every facet
//! - `retry` re-runs items stuck in a failure status
//! - `analyze` prints what a sync would do, without doing it
//! - `inventory` audits or enforces absolute stock levels
//! - `stage` loads the feed into the local store only

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod error;

use context::{AppContext, ConnectionArgs};
use error::CliResult;

/// vitrine - catalog synchronization for the storefront
#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync the vendor feed against the storefront catalog
    Sync(commands::sync::SyncArgs),

    /// Converge a single item by its tag number
    Item(commands::item::ItemArgs),

    /// Re-run items whose last publish or update failed
    Retry(commands::retry::RetryArgs),

    /// Show what a sync would do, without remote calls
    Analyze(commands::analyze::AnalyzeArgs),

    /// Audit or enforce remote stock levels
    Inventory(commands::inventory::InventoryArgs),

    /// Load the feed into the local store without remote calls
    Stage(commands::stage::StageArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new(cli.connection.clone());

    let result = run(cli, &ctx).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli, ctx: &AppContext) -> CliResult<()> {
    match cli.command {
        Commands::Sync(args) => commands::sync::execute(args, ctx).await,
        Commands::Item(args) => commands::item::execute(args, ctx).await,
        Commands::Retry(args) => commands::retry::execute(args, ctx).await,
        Commands::Analyze(args) => commands::analyze::execute(args, ctx).await,
        Commands::Inventory(args) => commands::inventory::execute(args, ctx).await,
        Commands::Stage(args) => commands::stage::execute(args, ctx).await,
    }
}
