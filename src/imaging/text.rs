//! Text overlays anchored to an image corner.
//!
//! Glyphs are laid out and rasterized with `ab_glyph`. Measuring and drawing
//! share one layout, and placement coordinates name the top-left corner of
//! the text's ink box: the union of the rasterized glyph bounds. A text
//! measured as `w × h` and drawn at `(x, y)` touches only pixels in
//! `x..x + w` and `y..y + h`.

use super::calculations::bottom_right_anchor;
use super::error::{FilterError, Result};
use super::pixels::copy_image;
use ab_glyph::{Font as _, FontArc, GlyphId, OutlinedGlyph, PxScale, Rect, ScaleFont, point};
use image::{DynamicImage, GenericImage, GenericImageView, Rgba};
use std::fmt;
use std::path::Path;

/// A font face at a fixed pixel size.
#[derive(Clone)]
pub struct Font {
    face: FontArc,
    scale: PxScale,
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("size", &self.scale.y)
            .finish_non_exhaustive()
    }
}

impl Font {
    /// Parse TrueType/OpenType data.
    pub fn from_bytes(data: Vec<u8>, size: f32) -> Result<Self> {
        if !size.is_finite() || size <= 0.0 {
            return Err(FilterError::InvalidArgument(format!(
                "font size must be positive, got {size}"
            )));
        }
        let face = FontArc::try_from_vec(data).map_err(|e| FilterError::Font(e.to_string()))?;
        Ok(Self {
            face,
            scale: PxScale::from(size),
        })
    }

    pub fn from_file(path: &Path, size: f32) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data, size)
    }

    pub fn size(&self) -> f32 {
        self.scale.y
    }

    /// Width and height of the ink box of `text`; `(0, 0)` when nothing
    /// would be drawn.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        self.layout(text).size()
    }

    /// One line of glyphs, pen starting at `(0, ascent)`.
    fn layout(&self, text: &str) -> Layout {
        let scaled = self.face.as_scaled(self.scale);
        let mut caret = 0.0_f32;
        let mut previous: Option<GlyphId> = None;
        let mut glyphs = Vec::new();

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(self.scale, point(caret, scaled.ascent()));
            caret += scaled.h_advance(id);
            previous = Some(id);
            if let Some(outlined) = self.face.outline_glyph(glyph) {
                glyphs.push(outlined);
            }
        }

        let ink = glyphs
            .iter()
            .map(OutlinedGlyph::px_bounds)
            .reduce(|a, b| Rect {
                min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
                max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
            });
        Layout { glyphs, ink }
    }
}

struct Layout {
    glyphs: Vec<OutlinedGlyph>,
    /// Union of the glyph pixel bounds, in layout space.
    ink: Option<Rect>,
}

impl Layout {
    fn size(&self) -> (u32, u32) {
        self.ink.map_or((0, 0), |ink| {
            (ink.width().round() as u32, ink.height().round() as u32)
        })
    }

    /// Rasterize onto `canvas` with the ink box's top-left at `(x, y)`.
    /// Pixels past the right or bottom edge are dropped.
    fn draw(&self, canvas: &mut DynamicImage, color: Rgba<u8>, x: u32, y: u32) {
        let Some(ink) = self.ink else {
            return;
        };
        let (width, height) = canvas.dimensions();
        for glyph in &self.glyphs {
            let bounds = glyph.px_bounds();
            let left = u64::from(x) + (bounds.min.x - ink.min.x).round() as u64;
            let top = u64::from(y) + (bounds.min.y - ink.min.y).round() as u64;
            glyph.draw(|gx, gy, coverage| {
                let px = left + u64::from(gx);
                let py = top + u64::from(gy);
                if coverage <= 0.0 || px >= u64::from(width) || py >= u64::from(height) {
                    return;
                }
                let (px, py) = (px as u32, py as u32);
                let blended = blend(canvas.get_pixel(px, py), color, coverage);
                canvas.put_pixel(px, py, blended);
            });
        }
    }
}

/// Weighted sum of every channel, alpha included.
fn blend(under: Rgba<u8>, over: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let a = coverage.min(1.0);
    Rgba(std::array::from_fn(|i| {
        (f32::from(under.0[i]) * (1.0 - a) + f32::from(over.0[i]) * a).round() as u8
    }))
}

/// Parse `#rrggbb` or `#rrggbbaa` (the `#` is optional).
pub fn parse_color(hex: &str) -> Result<Rgba<u8>> {
    let digits = hex.trim().trim_start_matches('#');
    let invalid = || FilterError::InvalidArgument(format!("invalid color: {hex:?}"));
    if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    let alpha = if digits.len() == 8 { channel(6)? } else { 255 };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

/// Copy `image` and draw `text` with its ink box's top-left corner at the
/// given offset.
pub fn overlay_text_top_left(
    image: &DynamicImage,
    text: &str,
    font: &Font,
    color: Rgba<u8>,
    x_from_left: u32,
    y_from_top: u32,
) -> DynamicImage {
    let mut canvas = copy_image(image);
    font.layout(text)
        .draw(&mut canvas, color, x_from_left, y_from_top);
    canvas
}

/// Copy `image` and draw `text` so its ink box ends `x_from_right` pixels
/// from the right edge and `y_from_bottom` pixels from the bottom edge.
///
/// When the text does not fit, the corresponding axis is pinned to 0.
pub fn overlay_text_bottom_right(
    image: &DynamicImage,
    text: &str,
    font: &Font,
    color: Rgba<u8>,
    x_from_right: u32,
    y_from_bottom: u32,
) -> DynamicImage {
    let layout = font.layout(text);
    let (x, y) = bottom_right_anchor(
        (image.width(), image.height()),
        layout.size(),
        (x_from_right, y_from_bottom),
    );
    let mut canvas = copy_image(image);
    layout.draw(&mut canvas, color, x, y);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    const DEJAVU: &[u8] = include_bytes!("../../tests/fonts/DejaVuSans.ttf");
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn dejavu(size: f32) -> Font {
        Font::from_bytes(DEJAVU.to_vec(), size).unwrap()
    }

    fn black(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
    }

    /// Bounding box `(min_x, min_y, max_x, max_y)` of non-black pixels.
    fn lit_bounds(image: &DynamicImage) -> Option<(u32, u32, u32, u32)> {
        image
            .to_rgb8()
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [0, 0, 0])
            .fold(None, |acc, (x, y, _)| match acc {
                None => Some((x, y, x, y)),
                Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
            })
    }

    #[test]
    fn measure_is_nonempty_for_ink() {
        let (w, h) = dejavu(20.0).measure("Hi");
        assert!(w > 0 && h > 0);
        assert_eq!(dejavu(20.0).measure(""), (0, 0));
    }

    #[test]
    fn top_left_ink_stays_in_measured_box() {
        let font = dejavu(20.0);
        let (w, h) = font.measure("Hi");
        let out = overlay_text_top_left(&black(120, 60), "Hi", &font, WHITE, 30, 20);

        let (x0, y0, x1, y1) = lit_bounds(&out).unwrap();
        assert!(x0 >= 30 && y0 >= 20, "ink starts at ({x0}, {y0})");
        assert!(x1 < 30 + w && y1 < 20 + h, "ink ends at ({x1}, {y1})");
        // the box is tight, not just an upper bound
        assert!(x0 <= 31 && y0 <= 21);
        assert!(x1 + 2 >= 30 + w && y1 + 2 >= 20 + h);
    }

    #[test]
    fn bottom_right_ink_respects_margins() {
        let font = dejavu(20.0);
        let (w, h) = font.measure("Hi");
        let out = overlay_text_bottom_right(&black(120, 60), "Hi", &font, WHITE, 10, 10);

        let (x0, y0, x1, y1) = lit_bounds(&out).unwrap();
        assert!(x1 < 110 && y1 < 50, "ink ends at ({x1}, {y1})");
        assert!(x0 >= 110 - w && y0 >= 50 - h);
    }

    #[test]
    fn oversized_text_is_pinned_to_origin() {
        let font = dejavu(40.0);
        let src = black(12, 10);
        let out = overlay_text_bottom_right(&src, "Wide text", &font, WHITE, 5, 5);
        assert_eq!(out.dimensions(), (12, 10));
        let (x0, y0, _, _) = lit_bounds(&out).unwrap();
        assert!(x0 <= 1 && y0 <= 1);
    }

    #[test]
    fn overlay_leaves_source_untouched() {
        let src = black(40, 20);
        let out = overlay_text_top_left(&src, "A", &dejavu(12.0), WHITE, 2, 2);
        assert!(lit_bounds(&out).is_some());
        assert!(lit_bounds(&src).is_none());
    }

    #[test]
    fn empty_text_draws_nothing() {
        let src = black(20, 20);
        let out = overlay_text_bottom_right(&src, "", &dejavu(12.0), WHITE, 0, 0);
        assert_eq!(out, src);
    }

    #[test]
    fn blend_weights_by_coverage() {
        let under = Rgba([0, 100, 200, 255]);
        assert_eq!(blend(under, WHITE, 0.0), under);
        assert_eq!(blend(under, WHITE, 1.0), WHITE);
        assert_eq!(blend(under, WHITE, 0.5), Rgba([128, 178, 228, 255]));
    }

    #[test]
    fn parse_color_rgb() {
        assert_eq!(parse_color("#ff8000").unwrap(), Rgba([255, 128, 0, 255]));
        assert_eq!(parse_color("00ff00").unwrap(), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn parse_color_rgba() {
        assert_eq!(parse_color("#11223344").unwrap(), Rgba([0x11, 0x22, 0x33, 0x44]));
    }

    #[test]
    fn parse_color_rejects_garbage() {
        assert!(parse_color("#fff").is_err());
        assert!(parse_color("#gggggg").is_err());
        assert!(parse_color("").is_err());
        assert!(parse_color("#ééé").is_err());
    }

    #[test]
    fn font_rejects_invalid_data() {
        let err = Font::from_bytes(b"not a font".to_vec(), 12.0).unwrap_err();
        assert!(matches!(err, FilterError::Font(_)));
    }

    #[test]
    fn font_rejects_bad_size() {
        let err = Font::from_bytes(Vec::new(), 0.0).unwrap_err();
        assert!(matches!(err, FilterError::InvalidArgument(_)));
        let err = Font::from_bytes(Vec::new(), f32::NAN).unwrap_err();
        assert!(matches!(err, FilterError::InvalidArgument(_)));
    }

    #[test]
    fn font_from_missing_file_is_io_error() {
        let err = Font::from_file(Path::new("/nonexistent/font.ttf"), 12.0).unwrap_err();
        assert!(matches!(err, FilterError::Io(_)));
    }
}
