#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! PDF text and table-grid extraction for payroll statements.
//!
//! Payroll statements ("fichas financeiras") arrive as PDFs. This crate
//! turns one into a [`Document`]: the full text (pages concatenated) plus
//! per-page table grids segmented from the page text by [`text_grid`].
//!
//! The primary entry point is [`PdfExtractor`], which implements the
//! [`DocumentExtractor`] trait so the pipeline can be driven by any other
//! document source (tests use an in-memory one).

pub mod text_grid;

use std::path::Path;

use payroll_ledger_models::Document;

/// Errors specific to PDF extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// Reading the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// The PDF was parsed but yielded no text.
    #[error("could not extract text from PDF")]
    EmptyText,
}

/// Loads a [`Document`] from a path.
///
/// How text and tables are pulled out of the file is up to the
/// implementation; callers only rely on page order and table order.
pub trait DocumentExtractor: Send + Sync {
    /// Reads and extracts the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the document is unreadable, corrupt, or has
    /// no extractable text.
    fn load(&self, path: &Path) -> Result<Document, PdfError>;
}

/// Extracts payroll documents from PDF files using [`pdf_extract`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Creates a new extractor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Extracts the text of every page of an in-memory PDF.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Extraction`] if the PDF cannot be parsed. A
    /// panic inside `pdf_extract` (it panics on some structurally valid but
    /// malformed files) is caught and reported the same way.
    pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, PdfError> {
        std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
            .map_err(|payload| {
                PdfError::Extraction(format!(
                    "PDF extractor panicked: {}",
                    panic_message(&*payload)
                ))
            })?
            .map_err(|e| PdfError::Extraction(format!("failed to extract text from PDF: {e}")))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

impl DocumentExtractor for PdfExtractor {
    fn load(&self, path: &Path) -> Result<Document, PdfError> {
        let bytes = std::fs::read(path)?;

        log::debug!("Read {} bytes from {}", bytes.len(), path.display());

        let pages = Self::extract_pages(&bytes)?;
        let document = document_from_pages(path, &pages)?;

        log::debug!(
            "Extracted {} characters and {} table(s) across {} page(s) from {}",
            document.text.len(),
            document.pages.iter().map(Vec::len).sum::<usize>(),
            pages.len(),
            path.display()
        );

        Ok(document)
    }
}

/// Assembles a [`Document`] from per-page text.
///
/// The full text is every page followed by a blank line. Each page is
/// segmented into table grids independently.
///
/// # Errors
///
/// Returns [`PdfError::EmptyText`] if no page contains any text.
pub fn document_from_pages(path: &Path, pages: &[String]) -> Result<Document, PdfError> {
    let mut text = String::new();
    for page in pages {
        text.push_str(page);
        text.push_str("\n\n");
    }

    if text.trim().is_empty() {
        return Err(PdfError::EmptyText);
    }

    let grids = pages.iter().map(|page| text_grid::segment(page)).collect();

    Ok(Document::new(path, text, grids))
}
