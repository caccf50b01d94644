//! Dry-run report: what a sync would do.

use clap::Args;

use crate::context::AppContext;
use crate::error::{CliError, CliResult};

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: AnalyzeArgs, ctx: &AppContext) -> CliResult<()> {
    let controller = ctx.offline_controller().await?;
    let report = controller.analyze().await?;

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&report).map_err(|e| CliError::Io(e.to_string()))?;
        println!("{rendered}");
        return Ok(());
    }

    if report.is_empty() {
        println!("Nothing to do: store and feed agree ({} items).", report.unchanged);
        return Ok(());
    }

    print_section("New", &report.new_keys);
    print_section("Changed", &report.changed_keys);
    print_section("Deleted", &report.deleted_keys);
    println!("Unchanged: {}", report.unchanged);
    Ok(())
}

fn print_section(label: &str, keys: &[String]) {
    if keys.is_empty() {
        return;
    }
    println!("{label} ({}):", keys.len());
    for key in keys {
        println!("  {key}");
    }
}
