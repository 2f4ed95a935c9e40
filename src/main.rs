//! # Inline Asset Optimizer - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Caricamento della configurazione da file e override da CLI
//! - Avvio dell'optimizer e codice di uscita
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (target, quality, max width, workers, etc.)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 3. Carica `--config` se presente, poi applica gli override
//! 4. Istanzia AssetOptimizer e avvia il processo di ottimizzazione
//! 5. Esce con errore se almeno un documento è fallito
//!
//! ## Esempio di utilizzo:
//! ```bash
//! asset-optimizer site/index.html assets/ --quality 70 --max-width 600 --verbose
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use inline_asset_optimizer::json_output::JsonMessage;
use inline_asset_optimizer::resize::ResizeAlgorithm;
use inline_asset_optimizer::{AssetOptimizer, Config};

#[derive(Parser)]
#[command(name = "asset-optimizer")]
#[command(about = "Recompress base64 images embedded in HTML/CSS/SVG assets, in place")]
struct Args {
    /// Documents or directories to optimize (default: the Wi-Fi portal pages)
    targets: Vec<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// JPEG quality (1-100)
    #[arg(short, long)]
    quality: Option<u8>,

    /// Images wider than this are downscaled to exactly this width
    #[arg(short = 'W', long)]
    max_width: Option<u32>,

    /// Resampling filter used when downscaling
    #[arg(long, value_enum)]
    resize_algorithm: Option<ResizeAlgorithm>,

    /// Number of documents processed concurrently
    #[arg(short, long)]
    workers: Option<usize>,

    /// Dry run - report sizes but don't rewrite documents
    #[arg(long)]
    dry_run: bool,

    /// Emit newline-delimited JSON events on stdout
    #[arg(long)]
    json: bool,

    /// Write the effective configuration to this file and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Applies command line overrides on top of `config`
    fn apply_to(&self, mut config: Config) -> Config {
        if !self.targets.is_empty() {
            config.targets = self.targets.clone();
        }
        if let Some(quality) = self.quality {
            config.jpeg_quality = quality;
        }
        if let Some(max_width) = self.max_width {
            config.max_width = max_width;
        }
        if let Some(algorithm) = self.resize_algorithm {
            config.resize_algorithm = algorithm;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        config.dry_run |= self.dry_run;
        config.json_output |= self.json;
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; JSON mode keeps stdout for events only
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let base = match args.config {
        Some(ref path) => Config::from_file(path).await?,
        None => Config::default(),
    };
    let config = args.apply_to(base);
    config.validate()?;

    if let Some(ref path) = args.write_config {
        config.save_to_file(path).await?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    let json_output = config.json_output;
    let optimizer = AssetOptimizer::new(config)?;
    let stats = match optimizer.run().await {
        Ok(stats) => stats,
        Err(e) => {
            if json_output {
                JsonMessage::error("Optimization aborted".to_string(), Some(format!("{:#}", e))).emit();
            }
            return Err(e);
        }
    };

    if stats.documents_failed > 0 {
        return Err(anyhow::anyhow!(
            "{} document(s) could not be optimized",
            stats.documents_failed
        ));
    }

    Ok(())
}
