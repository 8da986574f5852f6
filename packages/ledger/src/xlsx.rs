//! `.xlsx` workbook backend built on [`umya_spreadsheet`].
//!
//! The workbook must already exist; the ledger never creates one. Every
//! save rewrites the whole file.

use std::path::{Path, PathBuf};

use umya_spreadsheet::Spreadsheet;
use umya_spreadsheet::helper::coordinate::index_from_coordinate;

use crate::{LedgerError, LedgerStore, Workbook};

/// A ledger stored as an `.xlsx` file.
#[derive(Debug, Clone)]
pub struct XlsxLedger {
    path: PathBuf,
}

impl XlsxLedger {
    /// Creates a store for the workbook at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing workbook.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for XlsxLedger {
    type Book = XlsxWorkbook;

    fn open(&self) -> Result<Self::Book, LedgerError> {
        log::debug!("Opening ledger {}", self.path.display());

        umya_spreadsheet::reader::xlsx::read(&self.path)
            .map(XlsxWorkbook)
            .map_err(|e| LedgerError::Open {
                path: self.path.clone(),
                message: e.to_string(),
            })
    }

    fn save(&self, book: &Self::Book) -> Result<(), LedgerError> {
        umya_spreadsheet::writer::xlsx::write(&book.0, &self.path).map_err(|e| {
            LedgerError::Save {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;

        log::debug!("Saved ledger {}", self.path.display());

        Ok(())
    }
}

/// A loaded `.xlsx` workbook.
#[derive(Debug)]
pub struct XlsxWorkbook(Spreadsheet);

impl XlsxWorkbook {
    fn sheet_mut(
        &mut self,
        name: &str,
    ) -> Result<&mut umya_spreadsheet::Worksheet, LedgerError> {
        self.0
            .get_sheet_by_name_mut(name)
            .ok_or_else(|| LedgerError::Sheet(format!("no sheet named '{name}'")))
    }
}

/// Resolves an upper-case `A1` address to umya's 1-based `(column, row)`.
fn coordinate(address: &str) -> Option<(u32, u32)> {
    let digits = address.trim_start_matches(|c: char| c.is_ascii_uppercase());
    let has_letters = digits.len() < address.len();
    if !has_letters || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    match index_from_coordinate(address) {
        (Some(col), Some(row), _, _) if col > 0 && row > 0 => Some((col, row)),
        _ => None,
    }
}

impl Workbook for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.0
            .get_sheet_collection()
            .iter()
            .map(|sheet| sheet.get_name().to_owned())
            .collect()
    }

    fn has_sheet(&self, name: &str) -> bool {
        self.0.get_sheet_by_name(name).is_some()
    }

    fn remove_sheet(&mut self, name: &str) -> Result<(), LedgerError> {
        self.0
            .remove_sheet_by_name(name)
            .map_err(|e| LedgerError::Sheet(format!("cannot remove sheet '{name}': {e}")))
    }

    fn create_sheet(&mut self, name: &str) -> Result<(), LedgerError> {
        self.0
            .new_sheet(name)
            .map(|_| ())
            .map_err(|e| LedgerError::Sheet(format!("cannot create sheet '{name}': {e}")))
    }

    fn write_row(&mut self, sheet: &str, row: u32, values: &[&str]) -> Result<(), LedgerError> {
        let worksheet = self.sheet_mut(sheet)?;
        for (col, value) in (1u32..).zip(values) {
            worksheet
                .get_cell_mut((col, row))
                .set_value_string(*value);
        }
        Ok(())
    }

    fn write_cell(&mut self, sheet: &str, address: &str, value: &str) -> Result<(), LedgerError> {
        let at = coordinate(address)
            .ok_or_else(|| LedgerError::Sheet(format!("invalid cell address '{address}'")))?;
        self.sheet_mut(sheet)?
            .get_cell_mut(at)
            .set_value_string(value);
        Ok(())
    }

    fn cell(&self, sheet: &str, address: &str) -> Option<String> {
        let at = coordinate(address)?;
        self.0
            .get_sheet_by_name(sheet)?
            .get_cell(at)
            .map(|cell| cell.get_value().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use payroll_ledger_models::{
        COLUMN_COUNT, Identity, LEDGER_HEADER, NAME_NOT_FOUND, NormalizedRow, SUMMARY_SHEET,
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::merge_into_store;

    fn seed_ledger(dir: &Path, sheets: &[&str]) -> PathBuf {
        let mut book = umya_spreadsheet::new_file();
        for name in sheets {
            book.new_sheet(*name).unwrap();
        }
        let path = dir.join("ledger.xlsx");
        umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();
        path
    }

    fn row(description: &str, value: &str) -> NormalizedRow {
        let mut fields = vec![description.to_owned(), value.to_owned()];
        fields.resize(COLUMN_COUNT, String::new());
        NormalizedRow::new(fields)
    }

    fn sheet_rows(book: &XlsxWorkbook, sheet: &str, rows: u32) -> Vec<Vec<String>> {
        (1..=rows)
            .map(|r| {
                ["A", "B", "N"]
                    .iter()
                    .map(|col| book.cell(sheet, &format!("{col}{r}")).unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn addresses_resolve_through_umya_coordinates() {
        assert_eq!(coordinate("C2"), Some((3, 2)));
        assert_eq!(coordinate("AA10"), Some((27, 10)));
        assert_eq!(coordinate("C0"), None);
        assert_eq!(coordinate("C"), None);
        assert_eq!(coordinate("12"), None);
        assert_eq!(coordinate("C2X"), None);
    }

    #[test]
    fn invalid_address_is_a_sheet_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = XlsxLedger::new(seed_ledger(dir.path(), &[SUMMARY_SHEET]));
        let mut book = store.open().unwrap();

        let err = book.write_cell(SUMMARY_SHEET, "C2X", "x").unwrap_err();
        assert!(matches!(err, LedgerError::Sheet(_)));
        assert_eq!(book.cell(SUMMARY_SHEET, "not-a-cell"), None);
    }

    #[test]
    fn opening_a_missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = XlsxLedger::new(dir.path().join("missing.xlsx"))
            .open()
            .unwrap_err();
        assert!(matches!(err, LedgerError::Open { .. }));
    }

    #[test]
    fn merge_round_trips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = XlsxLedger::new(seed_ledger(dir.path(), &[SUMMARY_SHEET]));

        let identity = Identity {
            competence_year: Some("2023".to_owned()),
            ..Identity::default()
        };
        merge_into_store(&store, "2023", &[row("SALARIO", "1.000,00")], &identity).unwrap();

        let book = store.open().unwrap();
        assert!(book.has_sheet("2023"));
        assert_eq!(
            sheet_rows(&book, "2023", 2),
            vec![
                vec![LEDGER_HEADER[0], LEDGER_HEADER[1], LEDGER_HEADER[13]],
                vec!["SALARIO", "1.000,00", ""],
            ]
        );
        assert_eq!(book.cell(SUMMARY_SHEET, "C2").as_deref(), Some(NAME_NOT_FOUND));
    }

    #[test]
    fn same_year_is_replaced_and_reruns_are_stable() {
        let dir = tempfile::tempdir().unwrap();
        let store = XlsxLedger::new(seed_ledger(dir.path(), &[]));
        let identity = Identity::default();

        merge_into_store(
            &store,
            "2023",
            &[row("SALARIO", "1,00"), row("INSS", "2,00")],
            &identity,
        )
        .unwrap();
        let rows = [row("FERIAS", "3,00")];
        merge_into_store(&store, "2023", &rows, &identity).unwrap();
        let first = sheet_rows(&store.open().unwrap(), "2023", 3);
        merge_into_store(&store, "2023", &rows, &identity).unwrap();
        let book = store.open().unwrap();
        let second = sheet_rows(&book, "2023", 3);

        assert_eq!(first, second);
        assert_eq!(second[1], vec!["FERIAS", "3,00", ""]);
        assert_eq!(second[2], vec!["", "", ""]);
        assert_eq!(
            book.sheet_names().iter().filter(|n| *n == "2023").count(),
            1
        );
    }
}
