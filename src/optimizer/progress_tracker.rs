//! # Progress Tracking Module
//!
//! Unifica progress bar tradizionale e eventi JSON in un unico tracker.
//! I completamenti arrivano già nell'ordine dei documenti, dal task orchestratore.

use crate::{
    json_output::JsonMessage,
    optimizer::DocumentOutcome,
    progress::ProgressManager,
};
use std::path::Path;

/// Tracker progress per documento
pub struct ProgressTracker {
    pub total_documents: usize,
    current: usize,
    json_output: bool,
    progress_manager: ProgressManager,
}

impl ProgressTracker {
    /// Crea un nuovo tracker
    pub fn new(total_documents: usize, json_output: bool) -> Self {
        let progress_manager = if json_output {
            ProgressManager::hidden()
        } else {
            ProgressManager::new(total_documents as u64)
        };

        Self {
            total_documents,
            current: 0,
            json_output,
            progress_manager,
        }
    }

    /// Documenti completati finora
    pub fn current(&self) -> usize {
        self.current
    }

    /// Gestisce completamento documento con eventi JSON automatici
    pub fn handle_document_completion(
        &mut self,
        path: &Path,
        result: &anyhow::Result<DocumentOutcome>,
    ) {
        self.current += 1;
        let name = path.file_name().unwrap_or_default().to_string_lossy();

        let message = match result {
            Ok(outcome) => {
                if self.json_output {
                    JsonMessage::document_complete(outcome).emit();
                }
                if outcome.images_optimized == 0 {
                    format!("[SKIP] {}: no image optimized", name)
                } else {
                    format!("[OK] {}: {:.1}% saved", name, outcome.report.reduction_percent)
                }
            }
            Err(e) => {
                if self.json_output {
                    JsonMessage::document_failed(path.to_path_buf(), format!("{:#}", e)).emit();
                }
                format!("[ERROR] {}: error", name)
            }
        };

        if self.json_output {
            JsonMessage::progress(self.current, self.total_documents).emit();
        }
        self.progress_manager.update(&message);
    }

    /// Finalizza progress bar
    pub fn finish(&self, summary: &str) {
        self.progress_manager.finish(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SizeReport;
    use std::path::PathBuf;

    #[test]
    fn test_counts_every_completion() {
        let mut tracker = ProgressTracker::new(2, true);
        let outcome = DocumentOutcome {
            path: PathBuf::from("a.html"),
            report: SizeReport::compute(Path::new("a.html"), 10, 5).unwrap(),
            images_found: 1,
            images_optimized: 1,
            images_kept: 0,
            written: true,
        };

        tracker.handle_document_completion(Path::new("a.html"), &Ok(outcome));
        tracker.handle_document_completion(Path::new("b.html"), &Err(anyhow::anyhow!("boom")));
        assert_eq!(tracker.current(), 2);
    }
}
