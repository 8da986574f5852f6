//! In-process workbook backend.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use crate::{LedgerError, LedgerStore, Workbook};

/// Parses an `A1`-style address into 1-based `(row, column)`.
fn parse_address(address: &str) -> Option<(u32, u32)> {
    let split = address.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = address.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let column = letters.chars().try_fold(0u32, |acc, c| {
        let value = u32::from(c.to_ascii_uppercase()) - u32::from('A') + 1;
        acc.checked_mul(26)?.checked_add(value)
    })?;
    let row = digits.parse::<u32>().ok().filter(|r| *r > 0)?;

    Some((row, column))
}

/// One sheet: cell text keyed by 1-based `(row, column)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Sheet {
    name: String,
    cells: BTreeMap<(u32, u32), String>,
}

/// A workbook held entirely in memory. Sheets keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryWorkbook {
    sheets: Vec<Sheet>,
}

impl MemoryWorkbook {
    /// Creates a workbook with the given empty sheets.
    #[must_use]
    pub fn new(sheet_names: &[&str]) -> Self {
        Self {
            sheets: sheet_names
                .iter()
                .map(|name| Sheet {
                    name: (*name).to_owned(),
                    cells: BTreeMap::new(),
                })
                .collect(),
        }
    }

    /// Returns the sheet's rows from row 1 to its last written row. Each
    /// row runs to its last written column; gaps read as `""`.
    #[must_use]
    pub fn rows(&self, name: &str) -> Option<Vec<Vec<String>>> {
        let sheet = self.sheet(name)?;
        let last_row = sheet.cells.keys().map(|(row, _)| *row).max().unwrap_or(0);

        Some(
            (1..=last_row)
                .map(|row| {
                    let last_col = sheet
                        .cells
                        .range((row, 0)..=(row, u32::MAX))
                        .map(|((_, col), _)| *col)
                        .max()
                        .unwrap_or(0);
                    (1..=last_col)
                        .map(|col| sheet.cells.get(&(row, col)).cloned().unwrap_or_default())
                        .collect()
                })
                .collect(),
        )
    }

    fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    fn sheet_mut(&mut self, name: &str) -> Result<&mut Sheet, LedgerError> {
        self.sheets
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| LedgerError::Sheet(format!("no sheet named '{name}'")))
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn remove_sheet(&mut self, name: &str) -> Result<(), LedgerError> {
        let idx = self
            .sheets
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| LedgerError::Sheet(format!("no sheet named '{name}'")))?;
        self.sheets.remove(idx);
        Ok(())
    }

    fn create_sheet(&mut self, name: &str) -> Result<(), LedgerError> {
        if self.has_sheet(name) {
            return Err(LedgerError::Sheet(format!("sheet '{name}' already exists")));
        }
        self.sheets.push(Sheet {
            name: name.to_owned(),
            cells: BTreeMap::new(),
        });
        Ok(())
    }

    fn write_row(&mut self, sheet: &str, row: u32, values: &[&str]) -> Result<(), LedgerError> {
        let sheet = self.sheet_mut(sheet)?;
        for (col, value) in (1u32..).zip(values) {
            sheet.cells.insert((row, col), (*value).to_owned());
        }
        Ok(())
    }

    fn write_cell(&mut self, sheet: &str, address: &str, value: &str) -> Result<(), LedgerError> {
        let key = parse_address(address)
            .ok_or_else(|| LedgerError::Sheet(format!("invalid cell address '{address}'")))?;
        self.sheet_mut(sheet)?.cells.insert(key, value.to_owned());
        Ok(())
    }

    fn cell(&self, sheet: &str, address: &str) -> Option<String> {
        let key = parse_address(address)?;
        self.sheet(sheet)?.cells.get(&key).cloned()
    }
}

/// A [`LedgerStore`] that keeps its workbook in memory.
///
/// [`open`](LedgerStore::open) hands out a copy and
/// [`save`](LedgerStore::save) replaces the stored workbook, matching the
/// whole-file rewrite of the on-disk backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    book: Mutex<MemoryWorkbook>,
}

impl MemoryStore {
    /// Creates a store holding `book`.
    #[must_use]
    pub const fn new(book: MemoryWorkbook) -> Self {
        Self {
            book: Mutex::new(book),
        }
    }

    /// Returns a copy of the stored workbook.
    #[must_use]
    pub fn snapshot(&self) -> MemoryWorkbook {
        self.book
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LedgerStore for MemoryStore {
    type Book = MemoryWorkbook;

    fn open(&self) -> Result<Self::Book, LedgerError> {
        self.book
            .lock()
            .map(|book| book.clone())
            .map_err(|e| LedgerError::Open {
                path: "<memory>".into(),
                message: e.to_string(),
            })
    }

    fn save(&self, book: &Self::Book) -> Result<(), LedgerError> {
        let mut stored = self.book.lock().map_err(|e| LedgerError::Save {
            path: "<memory>".into(),
            message: e.to_string(),
        })?;
        *stored = book.clone();
        Ok(())
    }
}
