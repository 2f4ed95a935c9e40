//! # Size Report Module
//!
//! Calcola la variazione di dimensione di un documento dopo la riscrittura:
//! `100 * (1 - new_len / original_len)`.
//!
//! Un documento originale vuoto non ha una percentuale definita: invece di
//! propagare un NaN/inf si restituisce `OptimizeError::EmptyDocument`.

use crate::error::OptimizeError;
use crate::file_manager::FileManager;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Before/after byte lengths of a document and the percent change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeReport {
    pub original_len: u64,
    pub new_len: u64,
    /// Positive when the document shrank
    pub reduction_percent: f64,
}

impl SizeReport {
    /// Computes the report for `path`, failing on an empty original
    pub fn compute(path: &Path, original_len: u64, new_len: u64) -> Result<Self, OptimizeError> {
        if original_len == 0 {
            return Err(OptimizeError::EmptyDocument(path.to_path_buf()));
        }

        let reduction_percent = 100.0 * (1.0 - new_len as f64 / original_len as f64);
        Ok(Self {
            original_len,
            new_len,
            reduction_percent,
        })
    }

    /// Bytes saved, zero when the document grew
    pub fn bytes_saved(&self) -> u64 {
        self.original_len.saturating_sub(self.new_len)
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Size reduced from {} to {} bytes ({:.1}%, {} -> {})",
            self.original_len,
            self.new_len,
            self.reduction_percent,
            FileManager::format_size(self.original_len),
            FileManager::format_size(self.new_len)
        )
    }
}
