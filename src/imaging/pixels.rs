//! Direct pixel operations.
//!
//! Every function takes its inputs by reference and returns a fresh buffer;
//! nothing here keeps a reference to an input past the call.

use super::calculations::scaled_dimensions;
use super::color::{blank, convert_to};
use super::error::{FilterError, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageBuffer, Pixel};

/// Resampling filter used by every resize.
pub const DEFAULT_FILTER: FilterType = FilterType::Triangle;

/// Exact copy backed by an independent buffer.
pub fn copy_image(src: &DynamicImage) -> DynamicImage {
    src.clone()
}

/// Mirror left-to-right.
pub fn flip_horizontal(src: &DynamicImage) -> DynamicImage {
    src.fliph()
}

/// Mirror top-to-bottom.
pub fn flip_vertical(src: &DynamicImage) -> DynamicImage {
    src.flipv()
}

/// Resize by a factor; each axis becomes `floor(len * scale)`.
pub fn resize_by(src: &DynamicImage, scale: f64) -> Result<DynamicImage> {
    let (width, height) = scaled_dimensions((src.width(), src.height()), scale).ok_or_else(|| {
        FilterError::InvalidArgument(format!(
            "scale must be a non-negative number within range, got {scale}"
        ))
    })?;
    resize_to(src, width, height)
}

/// Resize to exact dimensions, keeping the source color model.
pub fn resize_to(src: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage> {
    if width == 0 || height == 0 {
        return blank(src.color(), width, height);
    }
    if (width, height) == (src.width(), src.height()) {
        return Ok(src.clone());
    }
    Ok(src.resize_exact(width, height, DEFAULT_FILTER))
}

/// Copy of `image` converted into `template`'s color model.
pub fn recolor_to(template: &DynamicImage, image: &DynamicImage) -> Result<DynamicImage> {
    convert_to(image, template.color())
}

/// Per-component geometric mean of `a` and `b`.
///
/// `b` is first resized to `a`'s dimensions and converted to `a`'s color
/// model. Every raw channel, alpha included, becomes `sqrt(a * b)`.
pub fn geometric_blend(a: &DynamicImage, b: &DynamicImage) -> Result<DynamicImage> {
    let resized = resize_to(b, a.width(), a.height())?;
    let aligned = recolor_to(a, &resized)?;

    use DynamicImage::*;
    let blended = match (a, &aligned) {
        (ImageLuma8(x), ImageLuma8(y)) => ImageLuma8(zip_components(x, y, mean_u8)?),
        (ImageLumaA8(x), ImageLumaA8(y)) => ImageLumaA8(zip_components(x, y, mean_u8)?),
        (ImageRgb8(x), ImageRgb8(y)) => ImageRgb8(zip_components(x, y, mean_u8)?),
        (ImageRgba8(x), ImageRgba8(y)) => ImageRgba8(zip_components(x, y, mean_u8)?),
        (ImageLuma16(x), ImageLuma16(y)) => ImageLuma16(zip_components(x, y, mean_u16)?),
        (ImageLumaA16(x), ImageLumaA16(y)) => ImageLumaA16(zip_components(x, y, mean_u16)?),
        (ImageRgb16(x), ImageRgb16(y)) => ImageRgb16(zip_components(x, y, mean_u16)?),
        (ImageRgba16(x), ImageRgba16(y)) => ImageRgba16(zip_components(x, y, mean_u16)?),
        (ImageRgb32F(x), ImageRgb32F(y)) => ImageRgb32F(zip_components(x, y, mean_f32)?),
        (ImageRgba32F(x), ImageRgba32F(y)) => ImageRgba32F(zip_components(x, y, mean_f32)?),
        _ => {
            return Err(FilterError::Unsupported(format!(
                "geometric blend of color model {:?}",
                a.color()
            )));
        }
    };
    Ok(blended)
}

fn mean_u8(x: u8, y: u8) -> u8 {
    (x as f64 * y as f64).sqrt() as u8
}

fn mean_u16(x: u16, y: u16) -> u16 {
    (x as f64 * y as f64).sqrt() as u16
}

fn mean_f32(x: f32, y: f32) -> f32 {
    (x as f64 * y as f64).sqrt() as f32
}

/// Combine two equally shaped buffers component by component.
fn zip_components<P, F>(
    a: &ImageBuffer<P, Vec<P::Subpixel>>,
    b: &ImageBuffer<P, Vec<P::Subpixel>>,
    combine: F,
) -> Result<ImageBuffer<P, Vec<P::Subpixel>>>
where
    P: Pixel,
    F: Fn(P::Subpixel, P::Subpixel) -> P::Subpixel,
{
    if a.dimensions() != b.dimensions() {
        return Err(FilterError::InvalidArgument(format!(
            "image dimensions do not match: {:?} vs {:?}",
            a.dimensions(),
            b.dimensions()
        )));
    }
    let raw: Vec<P::Subpixel> = a
        .as_raw()
        .iter()
        .zip(b.as_raw().iter())
        .map(|(&x, &y)| combine(x, y))
        .collect();
    ImageBuffer::from_raw(a.width(), a.height(), raw).ok_or_else(|| {
        FilterError::InvalidArgument("component buffer does not fit image dimensions".into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_rgb, gradient_rgba, solid_rgb};
    use image::{ColorType, GenericImageView, Rgb};

    // =========================================================================
    // copy and flips
    // =========================================================================

    #[test]
    fn copy_is_independent() {
        let original = gradient_rgb(5, 4);
        let mut copy = copy_image(&original);
        assert_eq!(copy, original);

        if let DynamicImage::ImageRgb8(buf) = &mut copy {
            buf.put_pixel(0, 0, Rgb([1, 2, 3]));
        }
        assert_ne!(copy, original);
        assert_ne!(original.get_pixel(0, 0).0[..3], [1, 2, 3]);
    }

    #[test]
    fn flip_horizontal_mirrors_columns() {
        let img = gradient_rgb(6, 3);
        let flipped = flip_horizontal(&img);
        for y in 0..3 {
            for x in 0..6 {
                assert_eq!(flipped.get_pixel(x, y), img.get_pixel(5 - x, y));
            }
        }
    }

    #[test]
    fn flip_vertical_mirrors_rows() {
        let img = gradient_rgb(3, 6);
        let flipped = flip_vertical(&img);
        for y in 0..6 {
            for x in 0..3 {
                assert_eq!(flipped.get_pixel(x, y), img.get_pixel(x, 5 - y));
            }
        }
    }

    #[test]
    fn flips_are_involutions() {
        let img = gradient_rgba(9, 7);
        assert_eq!(flip_horizontal(&flip_horizontal(&img)), img);
        assert_eq!(flip_vertical(&flip_vertical(&img)), img);
    }

    #[test]
    fn flips_keep_color_model() {
        let img = DynamicImage::ImageLuma16(gradient_rgb(4, 4).to_luma16());
        assert_eq!(flip_horizontal(&img).color(), ColorType::L16);
        assert_eq!(flip_vertical(&img).color(), ColorType::L16);
    }

    // =========================================================================
    // resize
    // =========================================================================

    #[test]
    fn resize_by_floors_dimensions() {
        let img = gradient_rgb(101, 51);
        let out = resize_by(&img, 0.5).unwrap();
        assert_eq!((out.width(), out.height()), (50, 25));

        let out = resize_by(&img, 1.7).unwrap();
        assert_eq!((out.width(), out.height()), (171, 86));
    }

    #[test]
    fn resize_by_zero_is_empty() {
        let out = resize_by(&gradient_rgb(10, 10), 0.0).unwrap();
        assert_eq!((out.width(), out.height()), (0, 0));
        assert_eq!(out.color(), ColorType::Rgb8);
    }

    #[test]
    fn resize_by_negative_fails() {
        let err = resize_by(&gradient_rgb(10, 10), -1.0).unwrap_err();
        assert!(matches!(err, FilterError::InvalidArgument(_)));
    }

    #[test]
    fn resize_to_keeps_color_model() {
        let img = gradient_rgba(20, 10);
        let out = resize_to(&img, 7, 3).unwrap();
        assert_eq!((out.width(), out.height()), (7, 3));
        assert_eq!(out.color(), ColorType::Rgba8);
    }

    #[test]
    fn resize_to_single_axis_zero() {
        let out = resize_to(&gradient_rgb(10, 10), 0, 4).unwrap();
        assert_eq!((out.width(), out.height()), (0, 4));
    }

    #[test]
    fn resize_solid_stays_solid() {
        let img = solid_rgb(16, 16, [200, 100, 50]);
        let out = resize_to(&img, 40, 9).unwrap().to_rgb8();
        assert!(out.pixels().all(|p| p.0 == [200, 100, 50]));
    }

    // =========================================================================
    // recolor and blend
    // =========================================================================

    #[test]
    fn recolor_uses_template_model_and_image_size() {
        let template = DynamicImage::new_luma8(1, 1);
        let out = recolor_to(&template, &gradient_rgb(12, 5)).unwrap();
        assert_eq!(out.color(), ColorType::L8);
        assert_eq!((out.width(), out.height()), (12, 5));
    }

    #[test]
    fn blend_with_itself_is_identity() {
        let img = gradient_rgba(11, 8);
        assert_eq!(geometric_blend(&img, &img).unwrap(), img);

        let deep = DynamicImage::ImageRgb16(gradient_rgb(5, 5).to_rgb16());
        assert_eq!(geometric_blend(&deep, &deep).unwrap(), deep);
    }

    #[test]
    fn blend_is_geometric_mean() {
        let a = solid_rgb(4, 4, [100, 4, 0]);
        let b = solid_rgb(4, 4, [25, 9, 255]);
        let out = geometric_blend(&a, &b).unwrap().to_rgb8();
        assert!(out.pixels().all(|p| p.0 == [50, 6, 0]));
    }

    #[test]
    fn blend_aligns_size_and_model() {
        let a = solid_rgb(8, 6, [64, 64, 64]);
        let b = DynamicImage::ImageLuma8(solid_rgb(3, 2, [64, 64, 64]).to_luma8());
        let out = geometric_blend(&a, &b).unwrap();
        assert_eq!(out.color(), ColorType::Rgb8);
        assert_eq!((out.width(), out.height()), (8, 6));
        assert!(out.to_rgb8().pixels().all(|p| p.0 == [64, 64, 64]));
    }

    #[test]
    fn blend_with_black_is_black() {
        let a = gradient_rgb(6, 6);
        let b = solid_rgb(6, 6, [0, 0, 0]);
        let out = geometric_blend(&a, &b).unwrap().to_rgb8();
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0]));
    }
}
