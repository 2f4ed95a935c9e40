//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche aggregate del batch.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time per documento
//! - Tracking statistiche di ottimizzazione (documenti, riferimenti, byte risparmiati)
//! - Calcolo percentuale di riduzione complessiva
//! - Riepilogo finale
//!
//! ## Statistiche tracciate:
//! - **documents_processed**: Documenti riscritti (o simulati in dry run)
//! - **documents_failed**: Documenti abbandonati per errore I/O o documento vuoto
//! - **images_optimized**: Riferimenti sostituiti con il JPEG ottimizzato
//! - **images_kept**: Riferimenti lasciati intatti per errore di decode/encode
//! - **total_original_size** / **total_bytes_saved**
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:03] [========================================] 2/2 (100%) [OK] wifi_configuration.html: 61.3% saved
//! ```

use crate::file_manager::FileManager;
use crate::optimizer::DocumentOutcome;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages progress reporting for a batch of documents
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_documents: u64) -> Self {
        let bar = ProgressBar::new(total_documents);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// A manager that draws nothing, used in JSON mode
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Statistics tracker for a batch run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchStats {
    pub documents_processed: usize,
    pub documents_failed: usize,
    pub images_optimized: usize,
    pub images_kept: usize,
    pub total_original_size: u64,
    pub total_new_size: u64,
    pub total_bytes_saved: u64,
}

impl BatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, outcome: &DocumentOutcome) {
        self.documents_processed += 1;
        self.images_optimized += outcome.images_optimized;
        self.images_kept += outcome.images_kept;
        self.total_original_size += outcome.report.original_len;
        self.total_new_size += outcome.report.new_len;
        self.total_bytes_saved += outcome.report.bytes_saved();
    }

    pub fn add_failure(&mut self) {
        self.documents_failed += 1;
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        if self.total_original_size > 0 {
            (1.0 - self.total_new_size as f64 / self.total_original_size as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Documents: {} | Failed: {} | Images optimized: {} | Kept: {} | Total saved: {} ({:.2}%)",
            self.documents_processed,
            self.documents_failed,
            self.images_optimized,
            self.images_kept,
            FileManager::format_size(self.total_bytes_saved),
            self.overall_reduction_percent()
        )
    }
}
