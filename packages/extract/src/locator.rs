//! Earnings/deductions table location.

use payroll_ledger_models::{Document, TABLE_MARKER, TableGrid};

/// Returns whether the grid's header row starts with a cell containing
/// [`TABLE_MARKER`]. The match is case-sensitive.
#[must_use]
pub fn is_payroll_table(grid: &TableGrid) -> bool {
    grid.header()
        .and_then(|header| header.first())
        .is_some_and(|cell| cell.contains(TABLE_MARKER))
}

/// Finds the first payroll table, scanning pages in document order and
/// tables within a page in extraction order.
///
/// `None` is a normal outcome: the document simply has no such table.
#[must_use]
pub fn locate(document: &Document) -> Option<&TableGrid> {
    document
        .pages
        .iter()
        .enumerate()
        .find_map(|(page_idx, grids)| {
            grids.iter().position(is_payroll_table).map(|table_idx| {
                log::debug!(
                    "{}: payroll table found on page {} (table {})",
                    document.file_name(),
                    page_idx + 1,
                    table_idx + 1
                );
                &grids[table_idx]
            })
        })
}
