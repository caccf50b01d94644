//! Inventory audit and enforcement.

use clap::{Args, Subcommand};
use vitrine_sync::{InventoryEnforcer, InventoryReport, RetryPolicy};

use crate::context::AppContext;
use crate::error::{CliError, CliResult};

/// Inventory management commands
#[derive(Args, Debug)]
pub struct InventoryArgs {
    #[command(subcommand)]
    pub command: InventoryCommands,
}

#[derive(Subcommand, Debug)]
pub enum InventoryCommands {
    /// Report quantity discrepancies without changing anything
    Audit(ReportArgs),

    /// Repair every discrepancy by writing the expected quantity
    Enforce(ReportArgs),
}

/// Shared arguments for both inventory subcommands
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: InventoryArgs, ctx: &AppContext) -> CliResult<()> {
    let enforcer = InventoryEnforcer::new(
        ctx.catalog()?,
        ctx.store().await?,
        RetryPolicy::new(ctx.sync_config().max_retries, 1),
    );

    match args.command {
        InventoryCommands::Audit(report_args) => {
            let report = enforcer.audit().await?;
            print_report(&report, report_args.json)
        }
        InventoryCommands::Enforce(report_args) => {
            let report = enforcer.enforce().await?;
            print_report(&report, report_args.json)
        }
    }
}

fn print_report(report: &InventoryReport, json: bool) -> CliResult<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(report).map_err(|e| CliError::Io(e.to_string()))?;
        println!("{rendered}");
        return Ok(());
    }

    println!("Checked: {} product(s)", report.checked);

    if report.is_clean() {
        println!("No discrepancies.");
        return Ok(());
    }

    for d in &report.discrepancies {
        let state = if d.repaired { "repaired" } else { "found" };
        println!(
            "  {} ({}): expected {}, remote had {} [{state}]",
            d.business_key, d.product_id, d.expected, d.actual
        );
    }
    for sku in &report.unmatched_skus {
        println!("  unmatched remote SKU: {sku}");
    }
    Ok(())
}
