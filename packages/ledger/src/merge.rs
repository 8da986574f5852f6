//! Per-year sheet replacement and summary stamping.
//!
//! A year sheet always reflects the most recent document for that year:
//! an existing sheet is deleted and rebuilt from scratch, never appended
//! to. Only rows exactly as wide as the header are written.

use payroll_ledger_models::{
    Identity, LEDGER_HEADER, NormalizedRow, SUMMARY_ADMISSION_CELL, SUMMARY_NAME_CELL,
    SUMMARY_SHEET, SUMMARY_TAX_ID_CELL,
};

use crate::{LedgerError, LedgerStore, Workbook};

/// What a merge did to the workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Name of the year sheet that was written.
    pub sheet: String,
    /// Whether a sheet with that name existed and was replaced.
    pub replaced: bool,
    /// Data rows written below the header.
    pub rows_written: usize,
    /// Rows dropped because their width did not match the header.
    pub rows_dropped: usize,
    /// Whether the summary sheet existed and received the identity.
    pub summary_stamped: bool,
}

/// Replaces the `year_label` sheet with `rows` and stamps `identity` into
/// the summary sheet, if there is one.
///
/// Only one identity is held by the summary sheet; a later merge
/// overwrites an earlier one.
///
/// # Errors
///
/// Returns [`LedgerError`] if the workbook rejects a sheet operation.
pub fn merge<W: Workbook + ?Sized>(
    book: &mut W,
    year_label: &str,
    rows: &[NormalizedRow],
    identity: &Identity,
) -> Result<MergeOutcome, LedgerError> {
    let replaced = book.has_sheet(year_label);
    if replaced {
        log::debug!("Removing existing sheet '{year_label}'");
        book.remove_sheet(year_label)?;
    }

    book.create_sheet(year_label)?;
    book.write_row(year_label, 1, &LEDGER_HEADER)?;

    let mut next_row: u32 = 2;
    let mut rows_dropped = 0;
    for row in rows {
        if !row.has_width(LEDGER_HEADER.len()) {
            log::debug!(
                "Dropping row with {} field(s) from sheet '{year_label}': {:?}",
                row.len(),
                row.fields().first()
            );
            rows_dropped += 1;
            continue;
        }

        let values: Vec<&str> = row.fields().iter().map(String::as_str).collect();
        book.write_row(year_label, next_row, &values)?;
        next_row += 1;
    }

    let summary_stamped = book.has_sheet(SUMMARY_SHEET);
    if summary_stamped {
        book.write_cell(SUMMARY_SHEET, SUMMARY_NAME_CELL, identity.display_name())?;
        book.write_cell(SUMMARY_SHEET, SUMMARY_TAX_ID_CELL, identity.display_tax_id())?;
        book.write_cell(
            SUMMARY_SHEET,
            SUMMARY_ADMISSION_CELL,
            identity.display_admission_date(),
        )?;
    }

    Ok(MergeOutcome {
        sheet: year_label.to_owned(),
        replaced,
        rows_written: rows.len() - rows_dropped,
        rows_dropped,
        summary_stamped,
    })
}

/// Opens the ledger, merges one document's rows, and saves it back.
///
/// # Errors
///
/// Returns [`LedgerError`] if the ledger cannot be opened, mutated, or
/// saved. A failed mutation leaves the stored workbook untouched; see
/// [`LedgerError::is_fatal`].
pub fn merge_into_store<S: LedgerStore>(
    store: &S,
    year_label: &str,
    rows: &[NormalizedRow],
    identity: &Identity,
) -> Result<MergeOutcome, LedgerError> {
    let mut book = store.open()?;
    let outcome = merge(&mut book, year_label, rows, identity)?;
    store.save(&book)?;

    log::info!(
        "Wrote {} row(s) to sheet '{}'{}",
        outcome.rows_written,
        outcome.sheet,
        if outcome.replaced {
            " (replaced existing sheet)"
        } else {
            ""
        }
    );

    Ok(outcome)
}
