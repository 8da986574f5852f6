#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Workbook ledger backends and the per-year sheet merge policy.
//!
//! The ledger is a spreadsheet workbook holding one sheet per competence
//! year plus an optional summary sheet. [`merge::merge`] applies the
//! replacement policy against any [`Workbook`]; [`merge::merge_into_store`]
//! wraps it in a full open → mutate → save cycle against a
//! [`LedgerStore`].
//!
//! Backends:
//! - [`xlsx::XlsxLedger`]: an `.xlsx` file on disk, rewritten whole on save.
//! - [`memory::MemoryStore`]: an in-process workbook.

pub mod memory;
pub mod merge;
pub mod xlsx;

use std::path::PathBuf;

pub use merge::{MergeOutcome, merge, merge_into_store};

/// Errors raised by ledger backends.
///
/// [`Open`](Self::Open) and [`Save`](Self::Save) abort the run. A
/// [`Sheet`](Self::Sheet) failure happens before anything is saved, so it
/// only fails the document being merged.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The backing workbook could not be opened.
    #[error("failed to open ledger {path}: {message}")]
    Open {
        /// Location of the workbook.
        path: PathBuf,
        /// Underlying failure.
        message: String,
    },

    /// The backing workbook could not be written.
    #[error("failed to save ledger {path}: {message}")]
    Save {
        /// Location of the workbook.
        path: PathBuf,
        /// Underlying failure.
        message: String,
    },

    /// A sheet operation was rejected by the backend.
    #[error("sheet error: {0}")]
    Sheet(String),
}

impl LedgerError {
    /// Whether the error means the backing store itself is unusable.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Open { .. } | Self::Save { .. })
    }
}

/// Sheet-level operations the merge policy needs from a workbook.
///
/// Rows and columns are 1-based. Cell addresses use `A1` notation.
pub trait Workbook {
    /// Names of all sheets, in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Whether a sheet with exactly this name exists.
    fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names().iter().any(|n| n == name)
    }

    /// Deletes a sheet and everything in it.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Sheet`] if the sheet does not exist or the
    /// backend refuses to remove it.
    fn remove_sheet(&mut self, name: &str) -> Result<(), LedgerError>;

    /// Appends a new, empty sheet.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Sheet`] if the name is taken or invalid.
    fn create_sheet(&mut self, name: &str) -> Result<(), LedgerError>;

    /// Writes `values` into `row`, starting at column 1.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Sheet`] if the sheet does not exist.
    fn write_row(&mut self, sheet: &str, row: u32, values: &[&str]) -> Result<(), LedgerError>;

    /// Writes a single cell.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Sheet`] if the sheet does not exist or the
    /// address is malformed.
    fn write_cell(&mut self, sheet: &str, address: &str, value: &str) -> Result<(), LedgerError>;

    /// Reads a single cell as text. `None` if the sheet or cell is absent.
    fn cell(&self, sheet: &str, address: &str) -> Option<String>;
}

/// Persistent storage for a [`Workbook`].
///
/// Nothing is cached between [`open`](Self::open) calls: each merge
/// reloads the workbook and [`save`](Self::save) rewrites all of it.
pub trait LedgerStore {
    /// The workbook type this store loads.
    type Book: Workbook;

    /// Loads the workbook from storage.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Open`] if storage cannot be read.
    fn open(&self) -> Result<Self::Book, LedgerError>;

    /// Writes the whole workbook back to storage.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Save`] if storage cannot be written.
    fn save(&self, book: &Self::Book) -> Result<(), LedgerError>;
}
