//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `OptimizeError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `Decode`: Payload base64 invalido o container immagine non decodificabile
//! - `Encode`: Ricompressione JPEG fallita
//! - `DocumentIo`: Documento non leggibile o non scrivibile
//! - `EmptyDocument`: Documento originale di lunghezza zero (report impossibile)
//! - `Fetch`: Download o lettura della sorgente fallita (img-to-base64)
//! - `Validation`: Errori di validazione input/configurazione
//!
//! ## Politica di propagazione:
//! - `Decode` / `Encode`: recuperati localmente, il riferimento resta invariato
//! - `DocumentIo` / `EmptyDocument`: interrompono solo il documento corrente
//!
//! Il testo che non corrisponde al pattern non è un errore: viene copiato così com'è.
//!
//! ## Esempio:
//! ```ignore
//! if original_len == 0 {
//!     return Err(OptimizeError::EmptyDocument(path.to_path_buf()));
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for inline asset optimization
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Document I/O error on {}: {source}", path.display())]
    DocumentIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document is empty, cannot compute size change: {}", .0.display())]
    EmptyDocument(PathBuf),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl OptimizeError {
    /// Wraps an I/O failure with the document it happened on
    pub fn document_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DocumentIo {
            path: path.into(),
            source,
        }
    }

    /// True for the per-reference kinds that are recovered by keeping the original
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Encode(_))
    }
}

impl From<base64::DecodeError> for OptimizeError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Decode(format!("invalid base64 payload: {}", e))
    }
}

impl From<image::ImageError> for OptimizeError {
    fn from(e: image::ImageError) -> Self {
        Self::Decode(e.to_string())
    }
}
