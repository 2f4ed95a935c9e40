//! # Inline Asset Optimizer Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per i binari `asset-optimizer` e `img-to-base64`
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom per le diverse operazioni
//! - `document`: Caricamento e persistenza atomica dei documenti
//! - `locator`: Scansione lazy dei data URI base64 nel testo
//! - `color`: Normalizzazione del modello colore (flatten su bianco)
//! - `resize`: Politica di ridimensionamento a larghezza massima
//! - `transcoder`: Decode → normalize → resize → JPEG per singola immagine
//! - `rewriter`: Sostituzione single-pass per span
//! - `report`: Variazione percentuale della dimensione
//! - `optimizer`: Orchestratore del batch di documenti
//! - `file_manager`: Discovery documenti e scritture atomiche
//! - `progress` / `json_output`: Feedback visuale e eventi JSON
//! - `data_uri`: Logica dello strumento `img-to-base64`
//!
//! ## Utilizzo:
//! ```ignore
//! use inline_asset_optimizer::{AssetOptimizer, Config};
//!
//! let config = Config::default();
//! let optimizer = AssetOptimizer::new(config)?;
//! let stats = optimizer.run().await?;
//! ```

pub mod color;
pub mod config;
pub mod data_uri;
pub mod document;
pub mod error;
pub mod file_manager;
pub mod json_output;
pub mod locator;
pub mod optimizer;
pub mod progress;
pub mod report;
pub mod resize;
pub mod rewriter;
pub mod transcoder;

pub use config::Config;
pub use error::OptimizeError;
pub use locator::{locate, ImageReference};
pub use optimizer::{AssetOptimizer, DocumentOutcome};
pub use progress::BatchStats;
pub use report::SizeReport;
pub use transcoder::{ImageTranscoder, OptimizationResult, OptimizedImage};
