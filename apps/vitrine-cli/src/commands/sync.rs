//! Full feed-against-store sync.

use clap::Args;

use crate::commands::{check_failure_ceiling, print_sync_summary};
use crate::context::AppContext;
use crate::error::CliResult;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Resend every facet for every item in the feed, changed or not
    #[arg(long)]
    pub force: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: SyncArgs, ctx: &AppContext) -> CliResult<()> {
    let controller = ctx.controller().await?;
    let summary = controller.sync(args.force).await?;
    print_sync_summary(&summary, args.json)?;
    check_failure_ceiling(&summary, ctx.sync_config().failure_ceiling)
}
