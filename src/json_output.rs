//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per l'uso da script e pipeline CI.
//!
//! ## Responsabilità:
//! - Emette messaggi JSON (uno per riga) su stdout per gli eventi del batch
//! - Riusa `SizeReport` e `DocumentOutcome` come sorgente dei dati
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio processo, lista documenti e configurazione
//! - `document_complete`: Fine elaborazione di un documento (con eventuale errore)
//! - `progress`: Progresso corrente
//! - `complete`: Fine processo con statistiche finali
//! - `error`: Errore generale

use crate::optimizer::DocumentOutcome;
use crate::progress::BatchStats;
use crate::resize::ResizeAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonMessage {
    /// Inizio del processo di ottimizzazione
    Start {
        documents: Vec<PathBuf>,
        total_documents: usize,
        config: JsonConfig,
    },

    /// Fine elaborazione di un documento
    DocumentComplete {
        path: PathBuf,
        original_size: u64,
        new_size: u64,
        reduction_percent: f64,
        images_found: usize,
        images_optimized: usize,
        images_kept: usize,
        written: bool,
        error: Option<String>,
    },

    /// Progresso corrente
    Progress {
        current: usize,
        total: usize,
        percentage: f64,
    },

    /// Processo completato
    Complete {
        documents_processed: usize,
        documents_failed: usize,
        images_optimized: usize,
        images_kept: usize,
        total_bytes_saved: u64,
        average_reduction: f64,
        duration_seconds: f64,
    },

    /// Errore generale
    Error {
        message: String,
        details: Option<String>,
    },
}

/// Configurazione per output JSON
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonConfig {
    pub max_width: u32,
    pub jpeg_quality: u8,
    pub resize_algorithm: ResizeAlgorithm,
    pub workers: usize,
    pub dry_run: bool,
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Crea un messaggio di inizio
    pub fn start(documents: Vec<PathBuf>, config: JsonConfig) -> Self {
        Self::Start {
            total_documents: documents.len(),
            documents,
            config,
        }
    }

    /// Crea un messaggio di completamento documento riuscito
    pub fn document_complete(outcome: &DocumentOutcome) -> Self {
        Self::DocumentComplete {
            path: outcome.path.clone(),
            original_size: outcome.report.original_len,
            new_size: outcome.report.new_len,
            reduction_percent: outcome.report.reduction_percent,
            images_found: outcome.images_found,
            images_optimized: outcome.images_optimized,
            images_kept: outcome.images_kept,
            written: outcome.written,
            error: None,
        }
    }

    /// Crea un messaggio di completamento documento fallito
    pub fn document_failed(path: PathBuf, error: String) -> Self {
        Self::DocumentComplete {
            path,
            original_size: 0,
            new_size: 0,
            reduction_percent: 0.0,
            images_found: 0,
            images_optimized: 0,
            images_kept: 0,
            written: false,
            error: Some(error),
        }
    }

    /// Crea un messaggio di progresso
    pub fn progress(current: usize, total: usize) -> Self {
        let percentage = if total > 0 {
            (current as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        Self::Progress {
            current,
            total,
            percentage,
        }
    }

    /// Crea un messaggio di completamento generale
    pub fn complete(stats: &BatchStats, duration_seconds: f64) -> Self {
        Self::Complete {
            documents_processed: stats.documents_processed,
            documents_failed: stats.documents_failed,
            images_optimized: stats.images_optimized,
            images_kept: stats.images_kept,
            total_bytes_saved: stats.total_bytes_saved,
            average_reduction: stats.overall_reduction_percent(),
            duration_seconds,
        }
    }

    /// Crea un messaggio di errore
    pub fn error(message: String, details: Option<String>) -> Self {
        Self::Error { message, details }
    }
}

/// Converti Config esistente in JsonConfig
impl From<&crate::Config> for JsonConfig {
    fn from(config: &crate::Config) -> Self {
        Self {
            max_width: config.max_width,
            jpeg_quality: config.jpeg_quality,
            resize_algorithm: config.resize_algorithm,
            workers: config.workers,
            dry_run: config.dry_run,
        }
    }
}
