//! # Image Resize Module
//!
//! Questo modulo gestisce il ridimensionamento in memoria delle immagini embedded
//! prima della ricompressione.
//!
//! ## Caratteristiche
//! - **Solo downscaling**: le immagini più strette di `max_width` non vengono toccate
//! - **Aspect ratio preservato**: l'altezza è ricalcolata come `round(h * W / w)`
//! - **Altezza mai limitata**: solo la larghezza ha un tetto
//! - **Filtro Lanczos di default**: nessun aliasing sui dettagli fini (testo, loghi)
//!
//! ## Algoritmi
//! | Algoritmo   | Filtro `image`              | Uso                          |
//! |-------------|-----------------------------|------------------------------|
//! | Lanczos     | `FilterType::Lanczos3`      | Default, migliore qualità    |
//! | CatmullRom  | `FilterType::CatmullRom`    | Buon bilanciamento           |
//! | Triangle    | `FilterType::Triangle`      | Veloce, anteprime            |
//! | Nearest     | `FilterType::Nearest`       | Pixel art                    |

use image::imageops::{self, FilterType};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Algoritmi di resize disponibili
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResizeAlgorithm {
    /// Lanczos - Migliore qualità per downscaling (default)
    #[default]
    Lanczos,
    /// Catmull-Rom, buona qualità generale
    #[serde(alias = "catrom")]
    #[value(alias = "catrom")]
    CatmullRom,
    /// Triangle - Veloce, qualità accettabile
    Triangle,
    /// Nearest - Pixel perfetto
    Nearest,
}

impl ResizeAlgorithm {
    /// Converte l'algoritmo nel filtro del crate `image`
    pub fn to_filter_type(self) -> FilterType {
        match self {
            ResizeAlgorithm::Lanczos => FilterType::Lanczos3,
            ResizeAlgorithm::CatmullRom => FilterType::CatmullRom,
            ResizeAlgorithm::Triangle => FilterType::Triangle,
            ResizeAlgorithm::Nearest => FilterType::Nearest,
        }
    }
}

/// Computes the output size for an image of `width x height`.
///
/// Returns `None` when `width <= max_width` (no resize needed). Otherwise the
/// width becomes exactly `max_width` and the height is scaled by the same ratio,
/// rounded to the nearest pixel and never below 1.
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> Option<(u32, u32)> {
    if width <= max_width {
        return None;
    }

    let scaled = (height as f64 * max_width as f64 / width as f64).round() as u32;
    Some((max_width, scaled.max(1)))
}

/// Downscales `image` to `max_width` if it is wider, otherwise returns it unchanged
pub fn resize_to_max_width(image: RgbImage, max_width: u32, algorithm: ResizeAlgorithm) -> RgbImage {
    let (width, height) = image.dimensions();

    match target_dimensions(width, height, max_width) {
        Some((new_width, new_height)) => {
            debug!(
                "Resizing {}x{} -> {}x{} using {:?}",
                width, height, new_width, new_height, algorithm
            );
            imageops::resize(&image, new_width, new_height, algorithm.to_filter_type())
        }
        None => image,
    }
}
