//! Single-item sync.

use clap::Args;

use crate::commands::print_sync_summary;
use crate::context::AppContext;
use crate::error::CliResult;

/// Arguments for the item command
#[derive(Args, Debug)]
pub struct ItemArgs {
    /// Business key (tag number) of the item to converge
    pub key: String,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: ItemArgs, ctx: &AppContext) -> CliResult<()> {
    let controller = ctx.controller().await?;
    let summary = controller.sync_item(&args.key).await?;
    print_sync_summary(&summary, args.json)
}
