//! # Image Transcoder Module
//!
//! Questo modulo trasforma un singolo payload base64 embedded in un JPEG ottimizzato,
//! interamente in memoria.
//!
//! ## Pipeline di Ottimizzazione
//!
//! 1. **Decodifica base64**: gli spazi ASCII nel payload vengono ignorati
//! 2. **Decodifica container**: PNG, JPEG, GIF, WebP, BMP tramite `image`
//! 3. **Normalizzazione colore**: flatten su bianco o conversione a RGB (vedi `color`)
//! 4. **Resize**: solo se più largo di `max_width` (vedi `resize`)
//! 5. **Ricompressione**: JPEG baseline con tabelle Huffman ottimizzate (`jpeg-encoder`)
//! 6. **Codifica base64**: il nuovo subtype è sempre `jpeg`
//!
//! ## Error Handling
//!
//! - Base64 invalido, container sconosciuto, dati corrotti, area zero → `OptimizeError::Decode`
//! - Dimensioni oltre i limiti JPEG o errori dell'encoder → `OptimizeError::Encode`
//! - Ogni errore resta confinato al singolo riferimento: `optimize()` restituisce
//!   `OptimizationResult::KeepOriginal` e il documento prosegue
//!
//! Il risultato può essere più grande dell'originale (immagini minuscole): non è un errore.
//!
//! ## Esempio
//!
//! ```ignore
//! let transcoder = ImageTranscoder::new(&config);
//! let optimized = transcoder.transcode(payload, "png")?;
//! println!("{}", optimized.data_uri());
//! ```

use crate::color::{self, ColorModel};
use crate::config::Config;
use crate::error::OptimizeError;
use crate::locator::ImageReference;
use crate::resize::{self, ResizeAlgorithm};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use image::{DynamicImage, GenericImageView, RgbImage};
use jpeg_encoder::{ColorType, Encoder, SamplingFactor};
use std::borrow::Cow;
use tracing::{debug, info, warn};

/// Declared subtype of every re-encoded image
pub const OUTPUT_SUBTYPE: &str = "jpeg";

/// Decoder that accepts payloads with or without `=` padding
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// A re-encoded image ready to be spliced back into a document
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    /// Base64 text of the JPEG stream
    pub payload: String,
    /// Size of the JPEG stream in bytes
    pub byte_len: usize,
    pub width: u32,
    pub height: u32,
    /// Color model of the source before normalization
    pub source_model: ColorModel,
}

impl OptimizedImage {
    /// Always `jpeg`
    pub fn subtype(&self) -> &'static str {
        OUTPUT_SUBTYPE
    }

    /// `data:image/jpeg;base64,<payload>`
    pub fn data_uri(&self) -> String {
        format!("data:image/{};base64,{}", OUTPUT_SUBTYPE, self.payload)
    }
}

/// Per-reference outcome consumed by the rewriter
#[derive(Debug, Clone)]
pub enum OptimizationResult {
    Optimized(OptimizedImage),
    /// Leave the original span byte-for-byte untouched
    KeepOriginal { reason: String },
}

impl OptimizationResult {
    pub fn is_optimized(&self) -> bool {
        matches!(self, OptimizationResult::Optimized(_))
    }
}

/// Decodes, normalizes, resizes and recompresses embedded images.
///
/// Quality, width and filter are fixed for the lifetime of the transcoder so
/// every reference of a run is treated the same way.
#[derive(Debug, Clone)]
pub struct ImageTranscoder {
    max_width: u32,
    jpeg_quality: u8,
    algorithm: ResizeAlgorithm,
}

impl ImageTranscoder {
    /// Creates a transcoder from the run configuration
    pub fn new(config: &Config) -> Self {
        Self {
            max_width: config.max_width,
            jpeg_quality: config.jpeg_quality,
            algorithm: config.resize_algorithm,
        }
    }

    /// Optimizes one located reference, converting any failure into `KeepOriginal`.
    ///
    /// Emits the per-reference log lines: subtype and payload length before,
    /// resulting length (or the failure) after.
    pub fn optimize(&self, reference: &ImageReference<'_>) -> OptimizationResult {
        info!(
            "Found image #{} of type {}, length {}",
            reference.index,
            reference.subtype,
            reference.payload.len()
        );

        match self.transcode(reference.payload, reference.subtype) {
            Ok(optimized) => {
                info!(
                    "Optimized image #{} to length {} ({}x{}, {} JPEG bytes)",
                    reference.index,
                    optimized.payload.len(),
                    optimized.width,
                    optimized.height,
                    optimized.byte_len
                );
                OptimizationResult::Optimized(optimized)
            }
            Err(e) => {
                warn!("Keeping original image #{}: {}", reference.index, e);
                OptimizationResult::KeepOriginal { reason: e.to_string() }
            }
        }
    }

    /// Runs the full decode → normalize → resize → encode pipeline on a payload.
    ///
    /// `subtype` is the declared type from the data URI; it is only used for
    /// logging since the container is sniffed from the bytes themselves.
    pub fn transcode(&self, payload: &str, subtype: &str) -> Result<OptimizedImage, OptimizeError> {
        let raw = decode_payload(payload)?;
        let (image, model) = decode_image(&raw)?;
        debug!(
            "Decoded declared {} as {}x{} {:?}",
            subtype,
            image.width(),
            image.height(),
            model
        );

        let rgb = color::normalize(image, model);
        let rgb = resize::resize_to_max_width(rgb, self.max_width, self.algorithm);
        let (width, height) = rgb.dimensions();

        let jpeg = encode_jpeg(&rgb, self.jpeg_quality)?;

        Ok(OptimizedImage {
            payload: STANDARD.encode(&jpeg),
            byte_len: jpeg.len(),
            width,
            height,
            source_model: model,
        })
    }
}

/// Decodes a base64 payload, skipping ASCII whitespace
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, OptimizeError> {
    let compact: Cow<'_, str> = if payload.bytes().any(|b| b.is_ascii_whitespace()) {
        Cow::Owned(payload.chars().filter(|c| !c.is_ascii_whitespace()).collect())
    } else {
        Cow::Borrowed(payload)
    };

    if compact.is_empty() {
        return Err(OptimizeError::Decode("empty payload".to_string()));
    }

    Ok(LENIENT_BASE64.decode(compact.as_bytes())?)
}

/// Decodes an image container and classifies its color model
pub fn decode_image(raw: &[u8]) -> Result<(DynamicImage, ColorModel), OptimizeError> {
    let format = image::guess_format(raw).ok();
    let image = image::load_from_memory(raw)?;

    if image.width() == 0 || image.height() == 0 {
        return Err(OptimizeError::Decode(format!(
            "zero-area image ({}x{})",
            image.width(),
            image.height()
        )));
    }

    let model = ColorModel::detect(raw, format, &image);
    Ok((image, model))
}

/// Encodes an opaque RGB buffer as JPEG with optimized Huffman tables
pub fn encode_jpeg(rgb: &RgbImage, quality: u8) -> Result<Vec<u8>, OptimizeError> {
    let (width, height) = rgb.dimensions();
    let too_large = || OptimizeError::Encode(format!("{}x{} exceeds JPEG dimension limit", width, height));
    let width16 = u16::try_from(width).map_err(|_| too_large())?;
    let height16 = u16::try_from(height).map_err(|_| too_large())?;

    let mut jpeg = Vec::new();
    let mut encoder = Encoder::new(&mut jpeg, quality);
    encoder.set_sampling_factor(SamplingFactor::R_4_2_0);
    encoder.set_optimized_huffman_tables(true);
    encoder
        .encode(rgb.as_raw(), width16, height16, ColorType::Rgb)
        .map_err(|e| OptimizeError::Encode(e.to_string()))?;

    Ok(jpeg)
}
