//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di ottimizzazione
//! - Fornisce validazione dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `max_width`: Larghezza massima delle immagini in output (default: 600)
//! - `jpeg_quality`: Qualità JPEG (1-100, default: 70)
//! - `targets`: Documenti (o directory) da ottimizzare, in ordine
//! - `resize_algorithm`: Filtro di ricampionamento (default: Lanczos)
//! - `dry_run`: Calcola e riporta senza scrivere (default: false)
//! - `workers`: Documenti elaborati in parallelo (default: 1)
//! - `json_output`: Eventi JSON su stdout invece della progress bar (default: false)
//!
//! ## Validazione:
//! - Controlla che jpeg_quality sia 1-100
//! - Controlla che max_width sia > 0
//! - Controlla che workers sia > 0
//! - Controlla che ci sia almeno un target
//!
//! ## Esempio:
//! ```ignore
//! let config = Config {
//!     max_width: 480,
//!     jpeg_quality: 60,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::resize::ResizeAlgorithm;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the captive-portal pages of the firmware
pub const DEFAULT_ASSETS_DIR: &str = "components/esp-wifi-connect/assets";

/// Pages optimized when no target is given
pub const DEFAULT_DOCUMENTS: &[&str] = &["wifi_configuration.html", "wifi_configuration_done.html"];

/// Configuration for inline asset optimization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Images wider than this are downscaled to exactly this width
    pub max_width: u32,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// Documents or directories to process, in order
    pub targets: Vec<PathBuf>,
    /// Resampling filter used when downscaling
    pub resize_algorithm: ResizeAlgorithm,
    /// Dry run - report only, don't rewrite documents
    pub dry_run: bool,
    /// Number of documents processed concurrently
    pub workers: usize,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_width: 600,
            jpeg_quality: 70,
            targets: Self::default_targets(),
            resize_algorithm: ResizeAlgorithm::default(),
            dry_run: false,
            workers: 1,
            json_output: false,
        }
    }
}

impl Config {
    /// The two portal pages under `DEFAULT_ASSETS_DIR`
    pub fn default_targets() -> Vec<PathBuf> {
        DEFAULT_DOCUMENTS
            .iter()
            .map(|name| Path::new(DEFAULT_ASSETS_DIR).join(name))
            .collect()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(anyhow::anyhow!("JPEG quality must be between 1 and 100"));
        }

        if self.max_width == 0 {
            return Err(anyhow::anyhow!("Maximum width must be greater than 0"));
        }

        if self.workers == 0 {
            return Err(anyhow::anyhow!("Number of workers must be greater than 0"));
        }

        if self.targets.is_empty() {
            return Err(anyhow::anyhow!("At least one target document is required"));
        }

        Ok(())
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
