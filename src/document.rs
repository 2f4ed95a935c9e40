//! # Document Loader Module
//!
//! Carica un asset testuale in memoria e lo persiste una sola volta a fine pipeline.
//!
//! ## Ciclo di vita:
//! 1. `Document::load()`: lettura completa, validazione UTF-8, lunghezza originale
//! 2. Il testo non viene mai modificato in place: il rewriter produce un nuovo `String`
//! 3. `Document::persist()`: scrittura atomica del nuovo testo sul path originale
//!
//! Ogni errore di lettura/scrittura diventa `OptimizeError::DocumentIo` con il path
//! del documento, e interrompe solo quel documento.

use crate::error::OptimizeError;
use crate::file_manager::FileManager;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A text asset loaded for optimization
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    text: String,
}

impl Document {
    /// Reads a UTF-8 document from disk
    pub async fn load(path: &Path) -> Result<Self, OptimizeError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| OptimizeError::document_io(path, e))?;

        let text = String::from_utf8(bytes).map_err(|e| {
            OptimizeError::document_io(path, io::Error::new(io::ErrorKind::InvalidData, e))
        })?;

        debug!("Loaded {} ({} bytes)", path.display(), text.len());

        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }

    /// Builds a document from text already in memory
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in bytes of the text as loaded
    pub fn original_len(&self) -> usize {
        self.text.len()
    }

    /// Atomically replaces the file at `path()` with `new_text`
    pub async fn persist(&self, new_text: &str) -> Result<(), OptimizeError> {
        FileManager::write_atomically(&self.path, new_text.as_bytes().to_vec())
            .await
            .map_err(|e| {
                let source = match e.downcast::<io::Error>() {
                    Ok(io_error) => io_error,
                    Err(other) => io::Error::new(io::ErrorKind::Other, other.to_string()),
                };
                OptimizeError::document_io(&self.path, source)
            })?;

        debug!("Wrote {} ({} bytes)", self.path.display(), new_text.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_preserves_exact_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("page.html");
        let content = "<p>caffè\r\n\ttab</p>\n";
        std::fs::write(&path, content).unwrap();

        let document = Document::load(&path).await.unwrap();
        assert_eq!(document.text(), content);
        assert_eq!(document.original_len(), content.len());
        assert_eq!(document.path(), path.as_path());
    }

    #[tokio::test]
    async fn test_load_missing_is_document_io() {
        let temp_dir = TempDir::new().unwrap();
        let err = Document::load(&temp_dir.path().join("missing.html")).await.unwrap_err();
        assert!(matches!(err, OptimizeError::DocumentIo { .. }));
    }

    #[tokio::test]
    async fn test_load_non_utf8_is_document_io() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("binary.html");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = Document::load(&path).await.unwrap_err();
        assert!(matches!(err, OptimizeError::DocumentIo { .. }));
    }

    #[tokio::test]
    async fn test_persist_writes_new_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("page.html");
        std::fs::write(&path, "before").unwrap();

        let document = Document::load(&path).await.unwrap();
        document.persist("after").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "after");
    }
}
