//! Re-run items stuck in a failure status.

use clap::Args;

use crate::commands::{check_failure_ceiling, print_sync_summary};
use crate::context::AppContext;
use crate::error::CliResult;

/// Arguments for the retry command
#[derive(Args, Debug)]
pub struct RetryArgs {
    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: RetryArgs, ctx: &AppContext) -> CliResult<()> {
    let controller = ctx.controller().await?;
    let summary = controller.retry_failed().await?;

    if summary.processed == 0 && !args.json {
        println!("No failed items to retry.");
        return Ok(());
    }

    print_sync_summary(&summary, args.json)?;
    check_failure_ceiling(&summary, ctx.sync_config().failure_ceiling)
}
