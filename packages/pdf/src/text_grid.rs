//! Table-grid segmentation from page text.
//!
//! Text extraction flattens a payroll table into space-aligned lines. A
//! page is cut into blocks at blank lines; every block becomes one
//! [`TableGrid`] whose rows are the block's lines split into cells on runs
//! of two or more whitespace characters. Column boundaries are frequently
//! lost here, which is why rows are re-normalized downstream.

use std::sync::LazyLock;

use payroll_ledger_models::TableGrid;
use regex::Regex;

static CELL_GAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s{2,}").unwrap_or_else(|_| unreachable!())
});

/// Splits one line into trimmed, non-empty cells.
#[must_use]
pub fn split_cells(line: &str) -> Vec<String> {
    CELL_GAP
        .split(line)
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Segments the text of a single page into table grids, in page order.
#[must_use]
pub fn segment(page_text: &str) -> Vec<TableGrid> {
    let mut grids = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    for line in page_text.lines() {
        if line.trim().is_empty() {
            if !rows.is_empty() {
                grids.push(TableGrid::new(std::mem::take(&mut rows)));
            }
            continue;
        }

        rows.push(split_cells(line));
    }

    if !rows.is_empty() {
        grids.push(TableGrid::new(rows));
    }

    log::trace!("Segmented page into {} grid(s)", grids.len());

    grids
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn splits_on_wide_gaps_only() {
        assert_eq!(
            split_cells("  SALARIO BASE   1.234,56\t\t234,00  "),
            vec!["SALARIO BASE", "1.234,56", "234,00"]
        );
    }

    #[test]
    fn blank_lines_separate_grids() {
        let text = "EMPRESA XYZ\nMATRICULA: 12 - ANA\n\n\
                    PROVENTOS/DESCONTO  JANEIRO  FEVEREIRO\n\
                    SALARIO  1.000,00  1.000,00\n\n";
        let grids = segment(text);
        assert_eq!(grids.len(), 2);
        assert_eq!(grids[0].rows, vec![vec!["EMPRESA XYZ"], vec!["MATRICULA: 12 - ANA"]]);
        assert_eq!(
            grids[1].header().unwrap(),
            ["PROVENTOS/DESCONTO", "JANEIRO", "FEVEREIRO"]
        );
        assert_eq!(grids[1].body().len(), 1);
    }

    #[test]
    fn trailing_block_without_blank_line_is_kept() {
        let grids = segment("A  B\nC  D");
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].rows.len(), 2);
    }

    #[test]
    fn empty_page_has_no_grids() {
        assert!(segment("\n   \n").is_empty());
    }
}
