//! # Optimizer Module
//!
//! Separa le responsabilità in sottomoduli:
//! - `asset_optimizer`: Orchestratore principale del batch di documenti
//! - `document_task`: Pipeline completa su un singolo documento
//! - `progress_tracker`: Progress bar o eventi JSON per documento

pub mod asset_optimizer;
pub mod document_task;
pub mod progress_tracker;

pub use asset_optimizer::AssetOptimizer;
pub use document_task::{DocumentOutcome, DocumentTask};
pub use progress_tracker::ProgressTracker;
