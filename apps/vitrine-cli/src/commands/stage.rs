//! Stage the feed into the local store without remote calls.

use clap::Args;

use crate::context::AppContext;
use crate::error::{CliError, CliResult};

/// Arguments for the stage command
#[derive(Args, Debug)]
pub struct StageArgs {
    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: StageArgs, ctx: &AppContext) -> CliResult<()> {
    let controller = ctx.offline_controller().await?;
    let summary = controller.stage().await?;

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&summary).map_err(|e| CliError::Io(e.to_string()))?;
        println!("{rendered}");
        return Ok(());
    }

    println!("Inserted:   {}", summary.inserted);
    println!("Updated:    {}", summary.updated);
    println!("Unchanged:  {}", summary.unchanged);
    println!("Deleted:    {}", summary.deleted);
    Ok(())
}
