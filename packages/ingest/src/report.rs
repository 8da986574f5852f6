//! Run summary logging and JSON export.

use std::path::Path;

use payroll_ledger_models::{DocumentStatus, RunSummary};

/// Errors raised while writing a run report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The report file could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The summary could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Logs one line per document followed by the run totals.
pub fn log_summary(summary: &RunSummary) {
    for doc in &summary.documents {
        match doc.status {
            DocumentStatus::Processed if doc.table_found => log::info!(
                "  {} [{}] {} ({}): {} row(s) written",
                doc.file,
                doc.year,
                doc.name,
                doc.tax_id,
                doc.rows_written
            ),
            DocumentStatus::Processed => log::info!(
                "  {} [{}] {} ({}): no table extracted",
                doc.file,
                doc.year,
                doc.name,
                doc.tax_id
            ),
            DocumentStatus::Failed => log::info!(
                "  {}: failed: {}",
                doc.file,
                doc.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    log::info!(
        "Run complete in {:.1}s: {} document(s), {} processed, {} failed, {} without table",
        summary.duration.as_secs_f64(),
        summary.documents.len(),
        summary.processed(),
        summary.failed(),
        summary.without_table()
    );
}

/// Writes `summary` as pretty-printed JSON to `path`.
///
/// # Errors
///
/// Returns [`ReportError`] if serialization or the file write fails.
pub fn write_report(summary: &RunSummary, path: &Path) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;

    log::info!("Wrote run report to {}", path.display());

    Ok(())
}
