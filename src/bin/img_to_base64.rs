//! # img-to-base64
//!
//! Converte un'immagine (file locale o URL) in un data URI base64 e lo salva
//! su file, pronto da incollare in un attributo `src`.
//!
//! ## Modalità:
//! - **One-shot**: `img-to-base64 <sorgente>`; codice di uscita non zero in caso di errore
//! - **Interattiva**: senza argomenti chiede una sorgente dopo l'altra; `q` per uscire
//!
//! ## Esempio:
//! ```bash
//! img-to-base64 https://example.com/logo.png --output logo.txt
//! ```

use anyhow::Result;
use clap::Parser;
use inline_asset_optimizer::data_uri::{DataUriEncoder, ImageSource, DEFAULT_OUTPUT_FILE};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "img-to-base64")]
#[command(about = "Convert an image file or URL into a base64 data URI")]
struct Args {
    /// Image path or http(s) URL; omit for interactive mode
    source: Option<String>,

    /// File receiving the data URI
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let encoder = DataUriEncoder::new()?;

    match args.source {
        Some(ref input) => {
            let source = ImageSource::parse(input)?;
            convert_and_report(&encoder, &source, &args.output).await?;
            Ok(())
        }
        None => interactive(&encoder, &args.output).await,
    }
}

async fn interactive(encoder: &DataUriEncoder, output: &Path) -> Result<()> {
    println!("=== Image to Base64 Converter ===");
    println!("Enter an image URL or a local file path.");
    println!("Type 'q' to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"\nImage URL or path: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let input = line.trim();
        if input.eq_ignore_ascii_case("q") {
            break;
        }

        let source = match ImageSource::parse(input) {
            Ok(source) => source,
            Err(_) => {
                println!("Empty input. Please try again.");
                continue;
            }
        };

        // Failures are reported and the loop keeps going
        let _ = convert_and_report(encoder, &source, output).await;
    }

    println!("Goodbye!");
    Ok(())
}

async fn convert_and_report(encoder: &DataUriEncoder, source: &ImageSource, output: &Path) -> Result<()> {
    match encoder.convert(source, output).await {
        Ok(data_uri) => {
            println!("[SUCCESS] Base64 data saved to '{}'", output.display());
            println!("Data length: {} characters", data_uri.len());
            println!("Usage example: <img src=\"{}...\">", preview(&data_uri));
            Ok(())
        }
        Err(e) => {
            println!("[FAILED] {}", e);
            Err(e.into())
        }
    }
}

/// First characters of the data URI, enough to show its header
fn preview(data_uri: &str) -> &str {
    match data_uri.char_indices().nth(50) {
        Some((idx, _)) => &data_uri[..idx],
        None => data_uri,
    }
}
