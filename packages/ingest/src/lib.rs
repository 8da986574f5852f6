#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Batch driver that merges payroll statement PDFs into the workbook
//! ledger.
//!
//! Documents are processed strictly one at a time. Each one is read,
//! its identity and earnings/deductions table are extracted, and the
//! ledger is opened, merged and saved before the next document starts.
//! A document that cannot be read is reported and skipped; a ledger that
//! cannot be opened or saved stops the run.

pub mod config;
pub mod discovery;
pub mod report;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use payroll_ledger_extract::{ExtractedTable, extract_identity, extract_table_rows};
use payroll_ledger_ledger::xlsx::XlsxLedger;
use payroll_ledger_ledger::{LedgerError, LedgerStore, merge_into_store};
use payroll_ledger_models::progress::ProgressCallback;
use payroll_ledger_models::{DocumentReport, DocumentStatus, Identity, RunSummary, file_label};
use payroll_ledger_pdf::{DocumentExtractor, PdfError};

pub use config::LedgerConfig;

/// Number of leading text characters logged at `debug` for each document.
pub const TEXT_PREVIEW_CHARS: usize = 500;

/// A document that could not be turned into extracted data.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The extractor could not read the document.
    #[error("{file}: {source}")]
    Read {
        /// File name of the document.
        file: String,
        /// Underlying extraction failure.
        #[source]
        source: PdfError,
    },
}

/// Everything extracted from one readable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedDocument {
    /// File name of the document.
    pub file: String,
    /// Identity fields found in the text.
    pub identity: Identity,
    /// The normalized earnings/deductions table, if one was located.
    pub table: Option<ExtractedTable>,
}

/// Reads one document and extracts its identity and table.
///
/// Missing identity fields and a missing table are not errors.
///
/// # Errors
///
/// Returns [`DocumentError::Read`] if the extractor cannot load the
/// document.
pub fn process_document(
    extractor: &dyn DocumentExtractor,
    path: &Path,
) -> Result<ProcessedDocument, DocumentError> {
    let file = file_label(path);

    let document = extractor.load(path).map_err(|source| DocumentError::Read {
        file: file.clone(),
        source,
    })?;

    log::debug!(
        "{file}: text preview: {}",
        document
            .text
            .chars()
            .take(TEXT_PREVIEW_CHARS)
            .collect::<String>()
    );

    let identity = extract_identity(&document.text);
    let table = extract_table_rows(&document);

    log::info!(
        "{file}: name={} tax_id={} admission={} year={} table={}",
        identity.display_name(),
        identity.display_tax_id(),
        identity.display_admission_date(),
        identity.year_label(),
        table.as_ref().map_or_else(
            || "not found".to_owned(),
            |t| format!("{} row(s)", t.rows.len())
        )
    );

    Ok(ProcessedDocument {
        file,
        identity,
        table,
    })
}

/// Processes `paths` in order, merging each document into `store` as soon
/// as it has been extracted.
///
/// An unreadable document, or a sheet operation the workbook rejects, is
/// reported as failed and the run moves on.
///
/// # Errors
///
/// Returns the first fatal [`LedgerError`] (the ledger cannot be opened or
/// saved). The progress bar is finished and documents after that point are
/// not processed.
pub fn run_documents<S: LedgerStore>(
    paths: &[PathBuf],
    extractor: &dyn DocumentExtractor,
    store: &S,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<RunSummary, LedgerError> {
    let start = Instant::now();
    let mut summary = RunSummary::start();

    progress.set_total(paths.len() as u64);

    for path in paths {
        progress.set_message(file_label(path));

        let report = match process_document(extractor, path) {
            Ok(processed) => match merge_document(store, &processed) {
                Ok(report) => report,
                Err(e) if e.is_fatal() => {
                    log::error!("Ledger failure while merging {}: {e}", processed.file);
                    progress.finish(format!("aborted at {}: {e}", processed.file));
                    return Err(e);
                }
                Err(e) => {
                    log::error!("Failed to merge {}: {e}", processed.file);
                    let mut report =
                        DocumentReport::processed(&processed.file, &processed.identity);
                    report.status = DocumentStatus::Failed;
                    report.table_found = processed.table.is_some();
                    report.error = Some(e.to_string());
                    report
                }
            },
            Err(e) => {
                log::error!("Failed to process {e}");
                let DocumentError::Read { file, source } = e;
                DocumentReport::failed(file, source.to_string())
            }
        };

        summary.documents.push(report);
        progress.inc(1);
    }

    summary.duration = start.elapsed();
    progress.finish(format!(
        "{} processed, {} failed",
        summary.processed(),
        summary.failed()
    ));

    Ok(summary)
}

fn merge_document<S: LedgerStore>(
    store: &S,
    processed: &ProcessedDocument,
) -> Result<DocumentReport, LedgerError> {
    let mut report = DocumentReport::processed(&processed.file, &processed.identity);

    let Some(table) = &processed.table else {
        log::warn!("{}: no table extracted; ledger left unchanged", processed.file);
        return Ok(report);
    };

    let outcome = merge_into_store(
        store,
        processed.identity.year_label(),
        &table.rows,
        &processed.identity,
    )?;

    report.table_found = true;
    report.rows_extracted = table.raw_rows;
    report.rows_written = outcome.rows_written;

    Ok(report)
}

/// Discovers the statements in `config.source_directory` and merges them
/// into the workbook at `config.ledger_path`.
///
/// # Errors
///
/// Returns [`LedgerError`] if the workbook cannot be opened or saved.
pub fn run(
    config: &LedgerConfig,
    extractor: &dyn DocumentExtractor,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<RunSummary, LedgerError> {
    log::info!(
        "Merging statements from {} into {}",
        config.source_directory.display(),
        config.ledger_path.display()
    );

    let paths = discovery::discover(&config.source_directory);
    let store = XlsxLedger::new(&config.ledger_path);

    run_documents(&paths, extractor, &store, progress)
}
