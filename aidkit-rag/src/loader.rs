//! Corpus loading: turn a directory of reference manuals into [`Document`]s.
//!
//! Plain text (`.txt`) and markdown (`.md`) files are read directly. PDF
//! files are converted with the `pdftotext` system binary (poppler);
//! extraction quality is whatever the tool produces. Files that cannot be
//! read or yield no text are skipped with a warning rather than aborting
//! the indexing pass.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::document::{Document, DocumentFormat};
use crate::error::{RagError, Result};

/// Load every readable document under `dir`, in path-sorted order.
///
/// Sorting makes index builds reproducible for a fixed corpus.
///
/// # Errors
///
/// Returns [`RagError::CorpusUnavailable`] if `dir` does not exist, is not
/// a directory, or yields zero readable documents.
pub async fn load_corpus(dir: &Path) -> Result<Vec<Document>> {
    if !dir.is_dir() {
        return Err(RagError::CorpusUnavailable {
            location: dir.display().to_string(),
            message: "not a readable directory".to_string(),
        });
    }

    let mut paths: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        let format = match path.extension().and_then(|ext| ext.to_str()) {
            Some("txt") | Some("md") => DocumentFormat::Text,
            Some("pdf") => DocumentFormat::Pdf,
            _ => continue,
        };

        let id = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unnamed")
            .to_string();

        let text = match format {
            DocumentFormat::Text => match tokio::fs::read_to_string(&path).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(document = %id, error = %e, "skipping unreadable file");
                    continue;
                }
            },
            DocumentFormat::Pdf => match extract_pdf_text(&path).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(document = %id, error = %e, "skipping PDF");
                    continue;
                }
            },
        };

        if text.trim().is_empty() {
            warn!(document = %id, "skipping empty document");
            continue;
        }

        let mut metadata = HashMap::new();
        metadata.insert("path".to_string(), path.display().to_string());

        documents.push(Document { id, text, format, metadata });
    }

    if documents.is_empty() {
        return Err(RagError::CorpusUnavailable {
            location: dir.display().to_string(),
            message: "no readable documents found".to_string(),
        });
    }

    info!(corpus = %dir.display(), documents = documents.len(), "loaded corpus");
    Ok(documents)
}

/// Convert a PDF to text via the `pdftotext` system binary.
async fn extract_pdf_text(path: &Path) -> Result<String> {
    let output = tokio::process::Command::new("pdftotext")
        .arg("-layout")
        .arg("-enc")
        .arg("UTF-8")
        .arg(path)
        .arg("-")
        .output()
        .await
        .map_err(|e| RagError::CorpusUnavailable {
            location: path.display().to_string(),
            message: format!("pdftotext could not be run (is poppler installed?): {e}"),
        })?;

    if !output.status.success() {
        return Err(RagError::CorpusUnavailable {
            location: path.display().to_string(),
            message: format!("pdftotext failed: {}", String::from_utf8_lossy(&output.stderr)),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_directory_is_corpus_unavailable() {
        let err = load_corpus(Path::new("/definitely/not/here")).await.unwrap_err();
        assert!(matches!(err, RagError::CorpusUnavailable { .. }));
    }

    #[tokio::test]
    async fn loads_text_files_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_burns.txt"), "Cool the burn under running water.")
            .unwrap();
        std::fs::write(dir.path().join("a_bleeding.txt"), "Apply direct pressure.").unwrap();
        std::fs::write(dir.path().join("notes.csv"), "ignored,because,unknown,extension").unwrap();

        let docs = load_corpus(dir.path()).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "a_bleeding.txt");
        assert_eq!(docs[1].id, "b_burns.txt");
        assert_eq!(docs[0].format, DocumentFormat::Text);
    }

    #[tokio::test]
    async fn empty_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("empty.txt"), "   \n").unwrap();

        let err = load_corpus(dir.path()).await.unwrap_err();
        assert!(matches!(err, RagError::CorpusUnavailable { .. }));
    }
}
