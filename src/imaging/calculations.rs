//! Pure calculation functions for image dimensions and placement.
//!
//! All functions here are pure and testable without any I/O or images.

/// Scale image dimensions by a factor, flooring each axis.
///
/// Returns `None` when the factor is negative or not finite, or when the
/// scaled size does not fit in `u32`.
///
/// # Examples
/// ```text
/// scaled_dimensions((101, 50), 0.5) == Some((50, 25))
/// scaled_dimensions((10, 10), -1.0) == None
/// ```
pub fn scaled_dimensions(source: (u32, u32), scale: f64) -> Option<(u32, u32)> {
    if !scale.is_finite() || scale < 0.0 {
        return None;
    }
    let scale_axis = |len: u32| {
        let scaled = (len as f64 * scale).floor();
        (scaled <= u32::MAX as f64).then_some(scaled as u32)
    };
    Some((scale_axis(source.0)?, scale_axis(source.1)?))
}

/// Top-left corner for a box anchored to the bottom-right of an image.
///
/// The margins are measured inward from the right and bottom edges. Each
/// axis is clamped at zero when the box does not fit.
pub fn bottom_right_anchor(image: (u32, u32), text: (u32, u32), margin: (u32, u32)) -> (u32, u32) {
    let (img_w, img_h) = image;
    let (text_w, text_h) = text;
    let (from_right, from_bottom) = margin;

    let x = img_w.saturating_sub(from_right).saturating_sub(text_w);
    let y = img_h.saturating_sub(from_bottom).saturating_sub(text_h);
    (x, y)
}

/// Output size for the shear `(x + shx·y, shy·x + y)` of a `width × height`
/// rectangle.
///
/// The output spans from the origin to the farthest sheared corner; parts
/// that land at negative coordinates are clipped.
pub fn sheared_extent(source: (u32, u32), shx: f64, shy: f64) -> (u32, u32) {
    let (w, h) = (source.0 as f64, source.1 as f64);
    let corners = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)];

    let (max_x, max_y) = corners
        .iter()
        .map(|&(x, y)| (x + shx * y, shy * x + y))
        .fold((0.0_f64, 0.0_f64), |(mx, my), (sx, sy)| (mx.max(sx), my.max(sy)));

    let to_len = |v: f64| v.ceil().min(u32::MAX as f64) as u32;
    (to_len(max_x), to_len(max_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // scaled_dimensions
    // =========================================================================

    #[test]
    fn scaled_dimensions_floors_each_axis() {
        assert_eq!(scaled_dimensions((101, 51), 0.5), Some((50, 25)));
        assert_eq!(scaled_dimensions((3, 7), 1.5), Some((4, 10)));
    }

    #[test]
    fn scaled_dimensions_identity() {
        assert_eq!(scaled_dimensions((640, 480), 1.0), Some((640, 480)));
    }

    #[test]
    fn scaled_dimensions_zero_scale_is_empty() {
        assert_eq!(scaled_dimensions((640, 480), 0.0), Some((0, 0)));
    }

    #[test]
    fn scaled_dimensions_rejects_negative_and_nan() {
        assert_eq!(scaled_dimensions((10, 10), -1.0), None);
        assert_eq!(scaled_dimensions((10, 10), f64::NAN), None);
        assert_eq!(scaled_dimensions((10, 10), f64::INFINITY), None);
    }

    #[test]
    fn scaled_dimensions_rejects_overflow() {
        assert_eq!(scaled_dimensions((u32::MAX, 1), 2.0), None);
    }

    // =========================================================================
    // bottom_right_anchor
    // =========================================================================

    #[test]
    fn bottom_right_anchor_inside_image() {
        // 200x100 image, 50x20 text, 10px margins → (140, 70)
        assert_eq!(bottom_right_anchor((200, 100), (50, 20), (10, 10)), (140, 70));
    }

    #[test]
    fn bottom_right_anchor_clamps_to_zero() {
        assert_eq!(bottom_right_anchor((40, 30), (50, 20), (10, 20)), (0, 0));
    }

    #[test]
    fn bottom_right_anchor_clamps_each_axis_independently() {
        assert_eq!(bottom_right_anchor((40, 100), (50, 20), (0, 0)), (0, 80));
    }

    // =========================================================================
    // sheared_extent
    // =========================================================================

    #[test]
    fn sheared_extent_identity() {
        assert_eq!(sheared_extent((30, 20), 0.0, 0.0), (30, 20));
    }

    #[test]
    fn sheared_extent_positive_shear_grows_output() {
        // x' = x + 2y reaches 10 + 2·10, y' = 2x + y reaches 2·10 + 10
        assert_eq!(sheared_extent((10, 10), 2.0, 2.0), (30, 30));
    }

    #[test]
    fn sheared_extent_negative_shear_clips() {
        // x' = x - y peaks at the top-right corner
        assert_eq!(sheared_extent((10, 10), -1.0, 0.0), (10, 10));
        assert_eq!(sheared_extent((10, 4), 0.0, 0.5), (10, 9));
    }
}
