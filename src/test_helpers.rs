//! Shared test utilities: synthetic images and format sniffing.
//!
//! Every image is generated in memory so tests need no fixture files.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

/// RGB image whose channels vary with x and y, so flips and crops are
/// observable.
pub fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 17 % 256) as u8, (y * 29 % 256) as u8, 128])
    }))
}

/// RGBA variant of [`gradient_rgb`] with varying alpha.
pub fn gradient_rgba(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 17 % 256) as u8,
            (y * 29 % 256) as u8,
            ((x + y) * 7 % 256) as u8,
            (255 - (x * 3 % 128)) as u8,
        ])
    }))
}

/// Uniform RGB image.
pub fn solid_rgb(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

/// Detect the container format of a written file from its magic bytes.
pub fn sniff_format(path: &Path) -> ImageFormat {
    let bytes = std::fs::read(path).unwrap();
    image::guess_format(&bytes)
        .unwrap_or_else(|e| panic!("unrecognized image data in {}: {e}", path.display()))
}
