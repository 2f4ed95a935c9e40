//! # Document Task Module
//!
//! Worker per l'ottimizzazione di un singolo documento.
//! Separato dall'orchestratore principale per maggiore modularità.
//!
//! Flusso: load → locate → transcode (per riferimento) → rewrite → report → persist.
//! Il lavoro CPU-bound (decode/resize/encode) gira sul thread pool bloccante di tokio.

use crate::{
    config::Config,
    document::Document,
    locator,
    report::SizeReport,
    rewriter::{self, RewrittenDocument},
    transcoder::ImageTranscoder,
};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Result of one document run
#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    pub path: PathBuf,
    pub report: SizeReport,
    pub images_found: usize,
    pub images_optimized: usize,
    pub images_kept: usize,
    /// False in dry run or when nothing changed
    pub written: bool,
}

/// Worker per elaborazione singoli documenti
#[derive(Debug, Clone)]
pub struct DocumentTask {
    dry_run: bool,
    transcoder: ImageTranscoder,
}

impl DocumentTask {
    /// Crea nuovo task
    pub fn new(config: &Config) -> Self {
        Self {
            dry_run: config.dry_run,
            transcoder: ImageTranscoder::new(config),
        }
    }

    /// Processa un singolo documento
    pub async fn process(&self, path: &Path) -> Result<DocumentOutcome> {
        info!("Processing {}...", path.display());

        let document = Document::load(path).await?;

        let transcoder = self.transcoder.clone();
        let (document, rewritten) = tokio::task::spawn_blocking(move || {
            let rewritten = optimize_text(&transcoder, document.text());
            (document, rewritten)
        })
        .await?;
        let rewritten = rewritten?;

        // An empty original aborts here, before anything is written
        let report = SizeReport::compute(
            document.path(),
            document.original_len() as u64,
            rewritten.text.len() as u64,
        )?;

        let written = if self.dry_run {
            debug!("Dry run: would rewrite {}", path.display());
            false
        } else if rewritten.substituted == 0 {
            debug!("No image replaced in {}, leaving file untouched", path.display());
            false
        } else {
            document.persist(&rewritten.text).await?;
            true
        };

        info!("{}: {}", path.display(), report);

        Ok(DocumentOutcome {
            path: path.to_path_buf(),
            report,
            images_found: rewritten.references(),
            images_optimized: rewritten.substituted,
            images_kept: rewritten.kept,
            written,
        })
    }
}

/// Locates, transcodes and splices every inline image of `text`, in locate order
pub fn optimize_text(transcoder: &ImageTranscoder, text: &str) -> Result<RewrittenDocument> {
    let results = locator::locate(text).map(|reference| {
        let result = transcoder.optimize(&reference);
        (reference, result)
    });

    rewriter::rewrite(text, results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptimizeError;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn png_payload(width: u32, height: u32) -> String {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 128, 255, 200])));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        STANDARD.encode(bytes)
    }

    #[test]
    fn test_optimize_text_isolates_failures() {
        let good = png_payload(16, 16);
        let text = format!(
            "<img src=\"data:image/png;base64,{good}\">\n<img src=\"data:image/png;base64,!!corrupt!!\">\n<img src='data:image/png;base64,{good}'>\n"
        );

        let rewritten = optimize_text(&ImageTranscoder::new(&Config::default()), &text).unwrap();
        assert_eq!(rewritten.substituted, 2);
        assert_eq!(rewritten.kept, 1);
        assert!(rewritten
            .text
            .contains("<img src=\"data:image/png;base64,!!corrupt!!\">"));
        assert!(rewritten.text.starts_with("<img src=\"data:image/jpeg;base64,"));
        assert!(rewritten.text.contains("<img src='data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn test_process_rewrites_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("page.html");
        let text = format!("<img src=\"data:image/png;base64,{}\">", png_payload(900, 90));
        std::fs::write(&path, &text).unwrap();

        let outcome = DocumentTask::new(&Config::default()).process(&path).await.unwrap();
        assert!(outcome.written);
        assert_eq!(outcome.images_found, 1);
        assert_eq!(outcome.images_optimized, 1);
        assert_eq!(outcome.report.original_len, text.len() as u64);

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk.len() as u64, outcome.report.new_len);
        assert!(on_disk.contains("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn test_process_dry_run_leaves_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("page.html");
        let text = format!("<img src=\"data:image/png;base64,{}\">", png_payload(32, 32));
        std::fs::write(&path, &text).unwrap();

        let config = Config {
            dry_run: true,
            ..Default::default()
        };
        let outcome = DocumentTask::new(&config).process(&path).await.unwrap();
        assert!(!outcome.written);
        assert_eq!(outcome.images_optimized, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
    }

    #[tokio::test]
    async fn test_process_empty_document_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.html");
        std::fs::write(&path, "").unwrap();

        let err = DocumentTask::new(&Config::default()).process(&path).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OptimizeError>(),
            Some(OptimizeError::EmptyDocument(_))
        ));
    }

    #[tokio::test]
    async fn test_process_missing_document_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = DocumentTask::new(&Config::default())
            .process(&temp_dir.path().join("missing.html"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OptimizeError>(),
            Some(OptimizeError::DocumentIo { .. })
        ));
    }
}
