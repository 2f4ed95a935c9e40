//! # Color Normalization Module
//!
//! Porta ogni immagine decodificata a RGB 8-bit opaco, l'unico modello che il
//! JPEG in uscita sa rappresentare.
//!
//! ## Regole per modello colore:
//! | Modello                        | Azione                                   |
//! |--------------------------------|------------------------------------------|
//! | `TrueColor` (8-bit)            | Invariato                                |
//! | `TrueColor` (16-bit / float)   | Conversione a RGB 8-bit                  |
//! | `TrueColorAlpha`               | Flatten su sfondo bianco                 |
//! | `Gray`                         | Conversione a RGB                        |
//! | `GrayAlpha`                    | Flatten su sfondo bianco                 |
//! | `Indexed { transparent: true }`| Flatten su sfondo bianco                 |
//! | `Indexed { transparent: false }`| Conversione a RGB                       |
//!
//! Il flatten calcola per ogni canale `bg * (1 - a) + fg * a` in aritmetica intera:
//! un pixel completamente trasparente diventa esattamente il colore di sfondo.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tracing::debug;

/// Opaque white, the background transparent pixels are composited onto
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Color representation of a decoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    TrueColor,
    TrueColorAlpha,
    Gray,
    GrayAlpha,
    /// Palette image; `transparent` is set when the palette carries a tRNS chunk
    Indexed { transparent: bool },
}

impl ColorModel {
    /// Classifies a decoded image.
    ///
    /// `image` expands palettes while decoding, so the palette case is recovered
    /// from the PNG header in `raw` when the container is PNG.
    pub fn detect(raw: &[u8], format: Option<ImageFormat>, image: &DynamicImage) -> Self {
        if format == Some(ImageFormat::Png) {
            if let Some(model) = png_palette_model(raw) {
                return model;
            }
        }

        match image {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageLuma16(_) => ColorModel::Gray,
            DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLumaA16(_) => ColorModel::GrayAlpha,
            DynamicImage::ImageRgba8(_)
            | DynamicImage::ImageRgba16(_)
            | DynamicImage::ImageRgba32F(_) => ColorModel::TrueColorAlpha,
            _ => ColorModel::TrueColor,
        }
    }

    /// Whether pixels must be composited onto the background
    pub fn has_transparency(self) -> bool {
        matches!(
            self,
            ColorModel::TrueColorAlpha | ColorModel::GrayAlpha | ColorModel::Indexed { transparent: true }
        )
    }
}

/// Reads IHDR/tRNS of a PNG stream; `Some` only for indexed-color images
fn png_palette_model(raw: &[u8]) -> Option<ColorModel> {
    let decoder = png::Decoder::new(raw);
    let reader = decoder.read_info().ok()?;
    let info = reader.info();

    if info.color_type == png::ColorType::Indexed {
        Some(ColorModel::Indexed {
            transparent: info.trns.is_some(),
        })
    } else {
        None
    }
}

/// Applies the normalization rule for `model`, producing opaque 8-bit RGB
pub fn normalize(image: DynamicImage, model: ColorModel) -> RgbImage {
    if model.has_transparency() {
        debug!("Flattening {:?} image onto white background", model);
        return flatten_onto(&image, BACKGROUND);
    }

    match image {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => {
            debug!("Converting {:?} image to RGB", model);
            other.to_rgb8()
        }
    }
}

/// Composites every pixel of `image` over an opaque `background`
pub fn flatten_onto(image: &DynamicImage, background: Rgb<u8>) -> RgbImage {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut out = RgbImage::new(width, height);
    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let alpha = src[3] as u32;
        for channel in 0..3 {
            dst[channel] = blend(src[channel], background[channel], alpha);
        }
    }
    out
}

/// `bg * (1 - a) + fg * a` with `a` in 0..=255, rounded to nearest
fn blend(foreground: u8, background: u8, alpha: u32) -> u8 {
    let value = foreground as u32 * alpha + background as u32 * (255 - alpha);
    ((value + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, GrayImage, LumaA, Luma, Rgba, RgbaImage};

    fn indexed_png(with_trns: bool) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, 2, 1);
            encoder.set_color(png::ColorType::Indexed);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_palette(vec![255, 0, 0, 0, 0, 255]);
            if with_trns {
                encoder.set_trns(vec![0u8, 255]);
            }
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0, 1]).unwrap();
        }
        bytes
    }

    #[test]
    fn test_blend_endpoints() {
        assert_eq!(blend(0, 255, 0), 255);
        assert_eq!(blend(0, 255, 255), 0);
        assert_eq!(blend(200, 255, 255), 200);
        // Half coverage of black over white lands in the middle
        assert_eq!(blend(0, 255, 128), 127);
    }

    #[test]
    fn test_detect_from_dynamic_variants() {
        let rgb = DynamicImage::ImageRgb8(RgbImage::new(1, 1));
        let rgba = DynamicImage::ImageRgba8(RgbaImage::new(1, 1));
        let gray = DynamicImage::ImageLuma8(GrayImage::new(1, 1));
        let gray_alpha = DynamicImage::ImageLumaA8(GrayAlphaImage::new(1, 1));

        assert_eq!(ColorModel::detect(&[], None, &rgb), ColorModel::TrueColor);
        assert_eq!(ColorModel::detect(&[], None, &rgba), ColorModel::TrueColorAlpha);
        assert_eq!(ColorModel::detect(&[], None, &gray), ColorModel::Gray);
        assert_eq!(ColorModel::detect(&[], None, &gray_alpha), ColorModel::GrayAlpha);
    }

    #[test]
    fn test_detect_indexed_png() {
        let opaque = indexed_png(false);
        let decoded = image::load_from_memory(&opaque).unwrap();
        assert_eq!(
            ColorModel::detect(&opaque, Some(ImageFormat::Png), &decoded),
            ColorModel::Indexed { transparent: false }
        );

        let transparent = indexed_png(true);
        let decoded = image::load_from_memory(&transparent).unwrap();
        assert_eq!(
            ColorModel::detect(&transparent, Some(ImageFormat::Png), &decoded),
            ColorModel::Indexed { transparent: true }
        );
    }

    #[test]
    fn test_indexed_with_transparency_is_flattened() {
        let raw = indexed_png(true);
        let decoded = image::load_from_memory(&raw).unwrap();
        let model = ColorModel::detect(&raw, Some(ImageFormat::Png), &decoded);

        let rgb = normalize(decoded, model);
        // Palette entry 0 is fully transparent red, entry 1 opaque blue
        assert_eq!(rgb.get_pixel(0, 0), &BACKGROUND);
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([0, 0, 255]));
    }

    #[test]
    fn test_truecolor_alpha_is_flattened() {
        let mut rgba = RgbaImage::new(3, 1);
        rgba.put_pixel(0, 0, Rgba([12, 34, 56, 0]));
        rgba.put_pixel(1, 0, Rgba([12, 34, 56, 255]));
        rgba.put_pixel(2, 0, Rgba([0, 0, 0, 51]));

        let rgb = normalize(DynamicImage::ImageRgba8(rgba), ColorModel::TrueColorAlpha);
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([12, 34, 56]));
        // 255 * (1 - 0.2) = 204
        assert_eq!(rgb.get_pixel(2, 0), &Rgb([204, 204, 204]));
    }

    #[test]
    fn test_gray_alpha_is_flattened() {
        let mut la = GrayAlphaImage::new(2, 1);
        la.put_pixel(0, 0, LumaA([0, 0]));
        la.put_pixel(1, 0, LumaA([80, 255]));

        let rgb = normalize(DynamicImage::ImageLumaA8(la), ColorModel::GrayAlpha);
        assert_eq!(rgb.get_pixel(0, 0), &BACKGROUND);
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([80, 80, 80]));
    }

    #[test]
    fn test_gray_is_converted() {
        let gray = GrayImage::from_pixel(2, 2, Luma([90]));
        let rgb = normalize(DynamicImage::ImageLuma8(gray), ColorModel::Gray);
        assert_eq!(rgb.dimensions(), (2, 2));
        assert_eq!(rgb.get_pixel(1, 1), &Rgb([90, 90, 90]));
    }

    #[test]
    fn test_truecolor_passes_through() {
        let original = RgbImage::from_pixel(4, 3, Rgb([7, 8, 9]));
        let rgb = normalize(DynamicImage::ImageRgb8(original.clone()), ColorModel::TrueColor);
        assert_eq!(rgb, original);
    }
}
