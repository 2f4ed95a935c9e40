//! # Data URI Encoder Module
//!
//! Logica dello strumento `img-to-base64`: trasforma un file locale o un URL remoto
//! in una singola riga `data:<mime>;base64,<payload>` pronta da incollare in un `src`.
//!
//! ## Sorgenti supportate
//! - **URL** `http://` / `https://`: GET con User-Agent da browser (alcuni siti
//!   rispondono 403 ai client senza), MIME dal `Content-Type` se è `image/*`,
//!   altrimenti content sniffing
//! - **File locale**: MIME dall'estensione, poi content sniffing con `infer`,
//!   infine `image/png` con un warning
//!
//! ## Contratto di output
//! - Esattamente una riga, senza newline finale
//! - Scrittura atomica: in caso di errore il file di output non viene creato né toccato
//!
//! Questo modulo non è collegato alla pipeline di ottimizzazione: l'output si incolla
//! a mano nei documenti.

use crate::error::OptimizeError;
use crate::file_manager::FileManager;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::CONTENT_TYPE;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default output file of the tool
pub const DEFAULT_OUTPUT_FILE: &str = "base64_output.txt";

/// MIME type used when neither extension nor content identify the file
pub const FALLBACK_MIME: &str = "image/png";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Where the image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    File(PathBuf),
}

impl ImageSource {
    /// Parses user input, stripping one pair of surrounding quotes
    pub fn parse(input: &str) -> Result<Self, OptimizeError> {
        let trimmed = input.trim();
        let unquoted = strip_matching_quotes(trimmed).trim();

        if unquoted.is_empty() {
            return Err(OptimizeError::Validation("empty input".to_string()));
        }

        if unquoted.starts_with("http://") || unquoted.starts_with("https://") {
            Ok(ImageSource::Url(unquoted.to_string()))
        } else {
            Ok(ImageSource::File(PathBuf::from(unquoted)))
        }
    }
}

fn strip_matching_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Raw bytes of a source with the MIME type they were served or guessed as
#[derive(Debug, Clone)]
pub struct SourceContent {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SourceContent {
    /// `data:<mime>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// Fetches sources and writes data URIs
pub struct DataUriEncoder {
    client: reqwest::Client,
}

impl DataUriEncoder {
    pub fn new() -> Result<Self, OptimizeError> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| OptimizeError::Fetch(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Retrieves the bytes and MIME type of `source`
    pub async fn fetch(&self, source: &ImageSource) -> Result<SourceContent, OptimizeError> {
        match source {
            ImageSource::Url(url) => self.fetch_url(url).await,
            ImageSource::File(path) => fetch_file(path).await,
        }
    }

    async fn fetch_url(&self, url: &str) -> Result<SourceContent, OptimizeError> {
        debug!("Downloading {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| OptimizeError::Fetch(format!("error downloading URL: {}", e)))?;

        let served_mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(essence)
            // Generic types such as application/octet-stream say nothing useful
            .filter(|mime| mime.starts_with("image/"));

        let bytes = response
            .bytes()
            .await
            .map_err(|e| OptimizeError::Fetch(format!("error reading response body: {}", e)))?
            .to_vec();

        let mime_type = served_mime.unwrap_or_else(|| sniff_mime(&bytes));
        Ok(SourceContent { mime_type, bytes })
    }

    /// Fetches `source` and atomically writes its data URI to `output`.
    ///
    /// Returns the written data URI. Nothing is written on failure.
    pub async fn convert(&self, source: &ImageSource, output: &Path) -> Result<String, OptimizeError> {
        let content = self.fetch(source).await?;
        let data_uri = content.to_data_uri();

        FileManager::write_atomically(output, data_uri.clone().into_bytes())
            .await
            .map_err(|e| {
                OptimizeError::document_io(
                    output,
                    std::io::Error::new(std::io::ErrorKind::Other, format!("{:#}", e)),
                )
            })?;

        info!(
            "Base64 data saved to '{}' ({} characters)",
            output.display(),
            data_uri.len()
        );
        Ok(data_uri)
    }
}

async fn fetch_file(path: &Path) -> Result<SourceContent, OptimizeError> {
    if !path.exists() {
        return Err(OptimizeError::Fetch(format!("file not found at {}", path.display())));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| OptimizeError::Fetch(format!("error reading file {}: {}", path.display(), e)))?;

    let mime_type = match mime_from_extension(path) {
        Some(mime) => mime.to_string(),
        None => sniff_mime(&bytes),
    };

    Ok(SourceContent { mime_type, bytes })
}

/// `image/png; charset=binary` → `image/png`
fn essence(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next()?.trim().to_ascii_lowercase();
    if essence.is_empty() {
        None
    } else {
        Some(essence)
    }
}

/// Guesses the MIME type from well-known extensions
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/vnd.microsoft.icon",
        "avif" => "image/avif",
        "tif" | "tiff" => "image/tiff",
        _ => return None,
    };
    Some(mime)
}

fn sniff_mime(bytes: &[u8]) -> String {
    match infer::get(bytes) {
        Some(kind) => kind.mime_type().to_string(),
        None => {
            warn!("Could not detect MIME type, defaulting to {}", FALLBACK_MIME);
            FALLBACK_MIME.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert_eq!(
            ImageSource::parse("  https://example.com/a.png ").unwrap(),
            ImageSource::Url("https://example.com/a.png".to_string())
        );
        assert_eq!(
            ImageSource::parse("\"C:\\img\\logo.png\"").unwrap(),
            ImageSource::File(PathBuf::from("C:\\img\\logo.png"))
        );
        assert_eq!(
            ImageSource::parse("'logo.png'").unwrap(),
            ImageSource::File(PathBuf::from("logo.png"))
        );
        assert!(ImageSource::parse("   ").is_err());
        assert!(ImageSource::parse("\"\"").is_err());
    }

    #[test]
    fn test_mismatched_quotes_are_kept() {
        assert_eq!(
            ImageSource::parse("\"logo.png'").unwrap(),
            ImageSource::File(PathBuf::from("\"logo.png'"))
        );
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_from_extension(Path::new("a.PNG")), Some("image/png"));
        assert_eq!(mime_from_extension(Path::new("a.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_from_extension(Path::new("icon.svg")), Some("image/svg+xml"));
        assert_eq!(mime_from_extension(Path::new("README")), None);
    }

    #[test]
    fn test_essence_strips_parameters() {
        assert_eq!(essence("Image/PNG; charset=binary"), Some("image/png".to_string()));
        assert_eq!(essence(""), None);
    }

    #[test]
    fn test_sniff_falls_back_to_png() {
        assert_eq!(sniff_mime(b"\xff\xd8\xff\xe0\x00\x10JFIF\x00"), "image/jpeg");
        assert_eq!(sniff_mime(b"plain text"), FALLBACK_MIME);
    }

    #[test]
    fn test_data_uri_shape() {
        let content = SourceContent {
            mime_type: "image/gif".to_string(),
            bytes: b"GIF89a".to_vec(),
        };
        assert_eq!(content.to_data_uri(), "data:image/gif;base64,R0lGODlh");
    }
}
