#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Document, identity, payroll row, and run report types.
//!
//! A financial statement [`Document`] is turned into an [`Identity`] plus a
//! list of [`NormalizedRow`]s, which the ledger writes into a per-year
//! sheet. Every stage reports back through [`DocumentReport`] and the
//! aggregated [`RunSummary`].

pub mod progress;

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Number of columns in a year sheet: description, twelve months, total.
pub const COLUMN_COUNT: usize = 14;

/// Fixed header written as the first row of every year sheet.
pub const LEDGER_HEADER: [&str; COLUMN_COUNT] = [
    "PROVENTOS/DESCONTO",
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
    "Total",
];

/// Marker that identifies the earnings/deductions table. Matched
/// case-sensitively against the first cell of a table's header row.
pub const TABLE_MARKER: &str = "PROVENTOS/DESCONTO";

/// Name of the optional summary sheet that receives the identity stamp.
pub const SUMMARY_SHEET: &str = "Recalculo";

/// Summary sheet cell receiving the employee name.
pub const SUMMARY_NAME_CELL: &str = "C2";

/// Summary sheet cell receiving the tax id.
pub const SUMMARY_TAX_ID_CELL: &str = "C3";

/// Summary sheet cell receiving the admission date.
pub const SUMMARY_ADMISSION_CELL: &str = "C4";

/// Rendering of a missing employee name.
pub const NAME_NOT_FOUND: &str = "NOME NÃO ENCONTRADO";

/// Rendering of a missing tax id.
pub const TAX_ID_NOT_FOUND: &str = "CPF NÃO ENCONTRADO";

/// Rendering of a missing admission date.
pub const ADMISSION_NOT_FOUND: &str = "ADMISSÃO NÃO ENCONTRADA";

/// Sheet label used when no competence year could be found.
pub const UNKNOWN_YEAR: &str = "AnoDesconhecido";

/// One table grid as produced by the document extractor: ordered rows of
/// ordered cell strings. The first row is the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableGrid {
    /// Rows in extraction order.
    pub rows: Vec<Vec<String>>,
}

impl TableGrid {
    /// Creates a grid from raw rows.
    #[must_use]
    pub const fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Returns the header row, if the grid has any rows.
    #[must_use]
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Returns every row after the header.
    #[must_use]
    pub fn body(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }
}

/// A loaded financial statement document. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Where the document was read from.
    pub path: PathBuf,
    /// Full extracted text, pages concatenated.
    pub text: String,
    /// Table grids per page, in page order then extraction order.
    pub pages: Vec<Vec<TableGrid>>,
}

impl Document {
    /// Creates a document from its extracted parts.
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        text: impl Into<String>,
        pages: Vec<Vec<TableGrid>>,
    ) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            pages,
        }
    }

    /// File name used in reports, falling back to the full path.
    #[must_use]
    pub fn file_name(&self) -> String {
        file_label(&self.path)
    }
}

/// Returns the final path component as a display string.
#[must_use]
pub fn file_label(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

/// Employee identity fields pulled from a document's text.
///
/// Each field is independently optional. The "not found" renderings are
/// applied only where the value leaves the program (reports, the summary
/// sheet, sheet labels).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Employee name.
    pub name: Option<String>,
    /// CPF tax id as printed (digits, dots, dashes).
    pub tax_id: Option<String>,
    /// Admission date as printed (`DD/MM/YYYY`).
    pub admission_date: Option<String>,
    /// Four-digit competence year.
    pub competence_year: Option<String>,
}

impl Identity {
    /// Name, or [`NAME_NOT_FOUND`].
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(NAME_NOT_FOUND)
    }

    /// Tax id, or [`TAX_ID_NOT_FOUND`].
    #[must_use]
    pub fn display_tax_id(&self) -> &str {
        self.tax_id.as_deref().unwrap_or(TAX_ID_NOT_FOUND)
    }

    /// Admission date, or [`ADMISSION_NOT_FOUND`].
    #[must_use]
    pub fn display_admission_date(&self) -> &str {
        self.admission_date.as_deref().unwrap_or(ADMISSION_NOT_FOUND)
    }

    /// Year sheet label, or [`UNKNOWN_YEAR`].
    #[must_use]
    pub fn year_label(&self) -> &str {
        self.competence_year.as_deref().unwrap_or(UNKNOWN_YEAR)
    }
}

/// A row produced by the normalizer.
///
/// A well-formed row has exactly [`COLUMN_COUNT`] fields: description,
/// twelve month values, and the total, with `""` for absent values. Rows
/// with any other width can still be produced (more monetary tokens than
/// value slots) and are dropped by the ledger merger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow(pub Vec<String>);

impl NormalizedRow {
    /// Wraps the given fields.
    #[must_use]
    pub const fn new(fields: Vec<String>) -> Self {
        Self(fields)
    }

    /// The row's fields in column order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the row has no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the row has exactly `width` fields.
    #[must_use]
    pub fn has_width(&self, width: usize) -> bool {
        self.0.len() == width
    }
}

impl<S: Into<String>> FromIterator<S> for NormalizedRow {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Outcome of processing one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentStatus {
    /// Text was read; identity and (possibly) a table were extracted.
    Processed,
    /// The document could not be read.
    Failed,
}

/// Per-document progress record for the reporting surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReport {
    /// File name of the document.
    pub file: String,
    /// Employee name, rendered with its sentinel when missing.
    pub name: String,
    /// Tax id, rendered with its sentinel when missing.
    pub tax_id: String,
    /// Admission date, rendered with its sentinel when missing.
    pub admission_date: String,
    /// Year sheet label.
    pub year: String,
    /// Whether the document was processed or failed.
    pub status: DocumentStatus,
    /// Whether a table matching [`TABLE_MARKER`] was found.
    pub table_found: bool,
    /// Number of body rows in the located table.
    pub rows_extracted: usize,
    /// Number of rows written to the year sheet.
    pub rows_written: usize,
    /// Failure description for [`DocumentStatus::Failed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentReport {
    /// Builds a report for a document that was read successfully.
    #[must_use]
    pub fn processed(file: impl Into<String>, identity: &Identity) -> Self {
        Self {
            file: file.into(),
            name: identity.display_name().to_owned(),
            tax_id: identity.display_tax_id().to_owned(),
            admission_date: identity.display_admission_date().to_owned(),
            year: identity.year_label().to_owned(),
            status: DocumentStatus::Processed,
            table_found: false,
            rows_extracted: 0,
            rows_written: 0,
            error: None,
        }
    }

    /// Builds a report for a document that could not be read.
    #[must_use]
    pub fn failed(file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name: NAME_NOT_FOUND.to_owned(),
            tax_id: TAX_ID_NOT_FOUND.to_owned(),
            admission_date: ADMISSION_NOT_FOUND.to_owned(),
            year: UNKNOWN_YEAR.to_owned(),
            status: DocumentStatus::Failed,
            table_found: false,
            rows_extracted: 0,
            rows_written: 0,
            error: Some(error.into()),
        }
    }
}

/// Aggregated result of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// How long the run took.
    pub duration: Duration,
    /// One report per discovered document, in processing order.
    pub documents: Vec<DocumentReport>,
}

impl RunSummary {
    /// Starts an empty summary stamped with the current time.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            duration: Duration::ZERO,
            documents: Vec::new(),
        }
    }

    /// Number of documents that were read successfully.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.count_status(DocumentStatus::Processed)
    }

    /// Number of documents that could not be read.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count_status(DocumentStatus::Failed)
    }

    /// Number of readable documents without a matching table.
    #[must_use]
    pub fn without_table(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| d.status == DocumentStatus::Processed && !d.table_found)
            .count()
    }

    fn count_status(&self, status: DocumentStatus) -> usize {
        self.documents.iter().filter(|d| d.status == status).count()
    }
}
