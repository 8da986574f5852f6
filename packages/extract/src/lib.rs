#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Identity extraction, table location, and row normalization for payroll
//! statements.
//!
//! None of these steps can fail: a field that does not match stays `None`,
//! a missing table is `None`, and a row that is not data is skipped.
//! [`extract_table_rows`] ties the locator and the normalizer together.

pub mod identity;
pub mod locator;
pub mod normalizer;

use payroll_ledger_models::{COLUMN_COUNT, Document, NormalizedRow};

pub use identity::extract as extract_identity;
pub use locator::locate;
pub use normalizer::{RowOutcome, normalize};

/// Rows recovered from a document's earnings/deductions table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTable {
    /// Number of body rows in the located table.
    pub raw_rows: usize,
    /// Rows that survived header/noise skipping, in table order.
    pub rows: Vec<NormalizedRow>,
}

/// Joins the non-empty cells of a raw row with single spaces.
#[must_use]
pub fn join_cells(cells: &[String]) -> String {
    cells
        .iter()
        .filter(|cell| !cell.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Locates the earnings/deductions table and normalizes each body row.
///
/// Returns `None` when the document has no matching table.
#[must_use]
pub fn extract_table_rows(document: &Document) -> Option<ExtractedTable> {
    let grid = locate(document)?;
    let body = grid.body();

    let rows = body
        .iter()
        .filter_map(|cells| match normalize(&join_cells(cells), COLUMN_COUNT) {
            RowOutcome::Record(row) => Some(row),
            RowOutcome::Skip => None,
        })
        .collect::<Vec<_>>();

    log::debug!(
        "{}: normalized {} of {} table row(s)",
        document.file_name(),
        rows.len(),
        body.len()
    );

    Some(ExtractedTable {
        raw_rows: body.len(),
        rows,
    })
}
