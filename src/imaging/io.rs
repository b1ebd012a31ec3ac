//! Reading and writing images on disk.
//!
//! | Extension (any case) | Written as |
//! |---|---|
//! | `png` | PNG |
//! | `jpg`, `jpeg` | JPEG |
//! | anything else, or none | JPEG |
//!
//! Decoding accepts whatever the compiled-in decoders recognize (PNG, JPEG),
//! sniffed from the file contents rather than the name.

use super::color::{self, convert_to};
use super::error::Result;
use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Output container selected from a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    /// Map a path's extension to an output format, defaulting to JPEG.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "png" => OutputFormat::Png,
            "jpg" | "jpeg" => OutputFormat::Jpeg,
            _ => OutputFormat::Jpeg,
        }
    }
}

/// Load and decode an image, returning the failure as a value.
pub fn try_load(path: &Path) -> Result<DynamicImage> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(image)
}

/// Load and decode an image; any failure yields `None`.
///
/// The cause is logged at `warn` so it is not lost.
pub fn load(path: &Path) -> Option<DynamicImage> {
    match try_load(path) {
        Ok(image) => {
            tracing::debug!(
                path = %path.display(),
                width = image.width(),
                height = image.height(),
                color = ?image.color(),
                "image loaded"
            );
            Some(image)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to load image");
            None
        }
    }
}

/// Save an image, choosing the format from the file extension.
pub fn save(image: &DynamicImage, path: &Path) -> Result<()> {
    save_with_quality(image, path, Quality::default())
}

/// Save an image with an explicit JPEG quality (ignored for PNG).
///
/// The image is encoded in memory first, so a codec failure leaves nothing
/// at `path`.
pub fn save_with_quality(image: &DynamicImage, path: &Path, quality: Quality) -> Result<()> {
    let format = OutputFormat::from_path(path);
    let mut encoded = Cursor::new(Vec::new());

    match format {
        OutputFormat::Png => {
            let encodable = png_compatible(image)?;
            encodable.write_with_encoder(PngEncoder::new(&mut encoded))?;
        }
        OutputFormat::Jpeg => {
            let encodable = jpeg_compatible(image)?;
            let encoder = JpegEncoder::new_with_quality(&mut encoded, quality.value() as u8);
            encodable.write_with_encoder(encoder)?;
        }
    }
    std::fs::write(path, encoded.into_inner())?;

    tracing::debug!(path = %path.display(), ?format, "image saved");
    Ok(())
}

/// JPEG stores 8-bit gray or RGB only.
fn jpeg_compatible(image: &DynamicImage) -> Result<DynamicImage> {
    match image.color() {
        ColorType::L8 | ColorType::Rgb8 => Ok(image.clone()),
        c if color::is_gray(c) => convert_to(image, ColorType::L8),
        _ => convert_to(image, ColorType::Rgb8),
    }
}

/// PNG has no float samples; widen-to-16-bit is the closest lossless-ish form.
fn png_compatible(image: &DynamicImage) -> Result<DynamicImage> {
    match image.color() {
        ColorType::Rgb32F => convert_to(image, ColorType::Rgb16),
        ColorType::Rgba32F => convert_to(image, ColorType::Rgba16),
        _ => Ok(image.clone()),
    }
}
