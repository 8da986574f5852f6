//! Statement discovery.

use std::path::{Path, PathBuf};

/// Lists the PDF files directly inside `dir`.
///
/// The `.pdf` suffix is matched case-insensitively and subdirectories are
/// not descended into. A missing or unreadable directory is logged and
/// yields no documents rather than failing the run. Paths are sorted so
/// reports read the same from run to run; nothing downstream depends on
/// the order.
#[must_use]
pub fn discover(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("Cannot read source directory {}: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {e}", dir.display());
                None
            }
        })
        .filter(|path| path.is_file() && is_pdf(path))
        .collect();
    paths.sort();

    if paths.is_empty() {
        log::warn!("No PDF files found in {}", dir.display());
    } else {
        log::info!("Found {} PDF file(s) in {}", paths.len(), dir.display());
    }

    paths
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lists_pdfs_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.pdf", "B.PDF", "notes.txt", "pdf"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let found: Vec<String> = discover(dir.path())
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();

        assert_eq!(found, vec!["B.PDF", "a.pdf"]);
    }

    #[test]
    fn missing_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(&dir.path().join("absent")).is_empty());
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path()).is_empty());
    }
}
