//! # Asset Optimizer Main Orchestrator
//!
//! Orchestratore principale che risolve i target, delega ogni documento a un
//! `DocumentTask` e aggrega le statistiche.
//!
//! ## Concorrenza
//! Con `workers = 1` i documenti sono elaborati strettamente in sequenza.
//! Con più worker fino a `workers` documenti sono in volo insieme; `buffered`
//! restituisce comunque i risultati nell'ordine dei target, quindi report,
//! eventi JSON e statistiche restano deterministici.

use crate::{
    config::Config,
    file_manager::FileManager,
    json_output::{JsonConfig, JsonMessage},
    optimizer::{document_task::DocumentTask, progress_tracker::ProgressTracker},
    progress::BatchStats,
};
use anyhow::Result;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Orchestratore principale
pub struct AssetOptimizer {
    config: Config,
}

impl AssetOptimizer {
    /// Crea nuova istanza dell'ottimizzatore
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Esegue il processo di ottimizzazione su tutti i documenti configurati
    pub async fn run(&self) -> Result<BatchStats> {
        let start_time = Instant::now();

        let documents = FileManager::resolve_targets(&self.config.targets);

        self.emit_start_message(&documents);
        self.log_configuration(&documents);

        let mut stats = BatchStats::new();
        if documents.is_empty() {
            info!("No documents found to process");
            self.print_final_stats(&stats, start_time.elapsed().as_secs_f64());
            return Ok(stats);
        }

        let mut tracker = ProgressTracker::new(documents.len(), self.config.json_output);
        let task = Arc::new(DocumentTask::new(&self.config));

        let mut completions = stream::iter(documents)
            .map(|path| {
                let task = Arc::clone(&task);
                async move {
                    let result = task.process(&path).await;
                    (path, result)
                }
            })
            .buffered(self.config.workers);

        while let Some((path, result)) = completions.next().await {
            tracker.handle_document_completion(&path, &result);

            match result {
                Ok(outcome) => stats.add_document(&outcome),
                Err(e) => {
                    error!("Failed to process {}: {:#}", path.display(), e);
                    stats.add_failure();
                }
            }
        }

        tracker.finish(&stats.format_summary());
        self.print_final_stats(&stats, start_time.elapsed().as_secs_f64());

        Ok(stats)
    }

    /// Invia messaggio di inizio
    fn emit_start_message(&self, documents: &[PathBuf]) {
        if self.config.json_output {
            JsonMessage::start(documents.to_vec(), JsonConfig::from(&self.config)).emit();
        } else {
            info!("Starting inline image optimization of {} document(s)", documents.len());
        }
    }

    /// Logga configurazione (solo se non JSON mode)
    fn log_configuration(&self, documents: &[PathBuf]) {
        if self.config.json_output {
            return;
        }

        info!(
            "Mode: Re-encode embedded images as JPEG (quality: {}, max width: {}px, filter: {:?})",
            self.config.jpeg_quality, self.config.max_width, self.config.resize_algorithm
        );

        if self.config.dry_run {
            info!("Dry run mode: No documents will be modified");
        }

        if self.config.workers > 1 {
            info!("Processing up to {} documents concurrently", self.config.workers);
        }

        for document in documents {
            info!("  • {}", document.display());
        }
    }

    /// Stampa statistiche finali
    fn print_final_stats(&self, stats: &BatchStats, duration: f64) {
        if self.config.json_output {
            JsonMessage::complete(stats, duration).emit();
        } else {
            info!("=== Optimization Complete ===");
            info!("Documents processed: {}", stats.documents_processed);
            info!("Documents failed: {}", stats.documents_failed);
            info!("Images optimized: {}", stats.images_optimized);
            info!("Images kept unchanged: {}", stats.images_kept);
            info!("Bytes saved: {}", FileManager::format_size(stats.total_bytes_saved));
            info!("Overall reduction: {:.2}%", stats.overall_reduction_percent());
        }
    }
}
