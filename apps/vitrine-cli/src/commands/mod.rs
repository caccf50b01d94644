//! Command implementations.

pub mod analyze;
pub mod inventory;
pub mod item;
pub mod retry;
pub mod stage;
pub mod sync;

use vitrine_sync::SyncSummary;

use crate::error::{CliError, CliResult};

/// Shared summary printer for the run-producing commands.
pub(crate) fn print_sync_summary(summary: &SyncSummary, json: bool) -> CliResult<()> {
    if json {
        let rendered = serde_json::to_string_pretty(summary)
            .map_err(|e| CliError::Io(e.to_string()))?;
        println!("{rendered}");
        return Ok(());
    }

    println!("Processed:  {}", summary.processed);
    println!("Published:  {}", summary.published);
    println!("Updated:    {}", summary.updated);
    println!("Deleted:    {}", summary.deleted);
    println!("Failed:     {}", summary.failed);
    println!("Unchanged:  {}", summary.unchanged);
    if summary.processed > 0 {
        println!("Success:    {:.1}%", summary.success_rate() * 100.0);
    }
    Ok(())
}

/// Turn a run that crossed the operator's failure ceiling into a
/// non-zero exit. The run itself completes either way.
pub(crate) fn check_failure_ceiling(summary: &SyncSummary, ceiling: usize) -> CliResult<()> {
    if summary.over_failure_ceiling(ceiling) {
        return Err(CliError::FailureCeiling {
            failed: summary.failed,
        });
    }
    Ok(())
}
