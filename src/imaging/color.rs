//! Color-model conversion and buffer allocation.
//!
//! A color model is an [`image::ColorType`]: channel layout plus bit depth.
//! Converting between models goes through the `image` crate's `to_*`
//! conversions, which are lossless when widening and clamp when narrowing.

use super::error::{FilterError, Result};
use image::{ColorType, DynamicImage};

/// Convert `image` into `color`, or copy it when it already uses that model.
pub fn convert_to(image: &DynamicImage, color: ColorType) -> Result<DynamicImage> {
    if image.color() == color {
        return Ok(image.clone());
    }
    let converted = match color {
        ColorType::L8 => DynamicImage::ImageLuma8(image.to_luma8()),
        ColorType::La8 => DynamicImage::ImageLumaA8(image.to_luma_alpha8()),
        ColorType::Rgb8 => DynamicImage::ImageRgb8(image.to_rgb8()),
        ColorType::Rgba8 => DynamicImage::ImageRgba8(image.to_rgba8()),
        ColorType::L16 => DynamicImage::ImageLuma16(image.to_luma16()),
        ColorType::La16 => DynamicImage::ImageLumaA16(image.to_luma_alpha16()),
        ColorType::Rgb16 => DynamicImage::ImageRgb16(image.to_rgb16()),
        ColorType::Rgba16 => DynamicImage::ImageRgba16(image.to_rgba16()),
        ColorType::Rgb32F => DynamicImage::ImageRgb32F(image.to_rgb32f()),
        ColorType::Rgba32F => DynamicImage::ImageRgba32F(image.to_rgba32f()),
        other => {
            return Err(FilterError::Unsupported(format!(
                "conversion to color model {other:?}"
            )));
        }
    };
    Ok(converted)
}

/// Allocate a zero-filled buffer of the given model and size.
pub fn blank(color: ColorType, width: u32, height: u32) -> Result<DynamicImage> {
    let image = match color {
        ColorType::L8 => DynamicImage::new_luma8(width, height),
        ColorType::La8 => DynamicImage::new_luma_a8(width, height),
        ColorType::Rgb8 => DynamicImage::new_rgb8(width, height),
        ColorType::Rgba8 => DynamicImage::new_rgba8(width, height),
        ColorType::L16 => DynamicImage::new_luma16(width, height),
        ColorType::La16 => DynamicImage::new_luma_a16(width, height),
        ColorType::Rgb16 => DynamicImage::new_rgb16(width, height),
        ColorType::Rgba16 => DynamicImage::new_rgba16(width, height),
        ColorType::Rgb32F => DynamicImage::new_rgb32f(width, height),
        ColorType::Rgba32F => DynamicImage::new_rgba32f(width, height),
        other => {
            return Err(FilterError::Unsupported(format!(
                "allocation of color model {other:?}"
            )));
        }
    };
    Ok(image)
}

/// Whether the model carries a single luminance channel (with or without alpha).
pub fn is_gray(color: ColorType) -> bool {
    matches!(
        color,
        ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16
    )
}
