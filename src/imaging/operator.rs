//! The image operator trait and shared geometry types.
//!
//! An [`ImageOperator`] is a single-input/single-output transform. Each
//! implementation supplies four things: a name, its output bounds, its
//! forward point mapping and the transform itself. Destination allocation
//! and the "write into a caller buffer" contract are provided here once so
//! every operator behaves the same way:
//!
//! 1. a caller-supplied destination must match [`output_bounds`] exactly,
//!    checked before any pixel work;
//! 2. the transformed pixels are converted into the destination's color
//!    model;
//! 3. the destination is only overwritten once the result is complete.
//!
//! [`output_bounds`]: ImageOperator::output_bounds

use super::color::{blank, convert_to};
use super::error::{FilterError, Result};
use image::{ColorType, DynamicImage};
use serde::Serialize;
use std::fmt;

/// Output size of an operator. The origin is always (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A point in continuous image space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A reusable single-input/single-output image transform.
///
/// Implementations hold only their construction-time parameters, so one
/// instance can be applied any number of times from any thread.
pub trait ImageOperator: fmt::Debug + Send + Sync {
    /// Short stable label, used in logs and output file names.
    fn name(&self) -> &str;

    /// Size of the image [`apply`](Self::apply) produces for `src`.
    fn output_bounds(&self, src: &DynamicImage) -> Dimensions;

    /// Where a source point lands in the output.
    fn map_point(&self, src: Point) -> Result<Point>;

    /// The operator's natural output for `src`.
    fn transform(&self, src: &DynamicImage) -> Result<DynamicImage>;

    /// Zero-filled buffer sized to [`output_bounds`](Self::output_bounds),
    /// in `color` or, when `None`, in `src`'s color model.
    fn create_compatible_destination(
        &self,
        src: &DynamicImage,
        color: Option<ColorType>,
    ) -> Result<DynamicImage> {
        let bounds = self.output_bounds(src);
        blank(color.unwrap_or_else(|| src.color()), bounds.width, bounds.height)
    }

    /// Transform `src` into `dest`, converting to `dest`'s color model.
    ///
    /// Fails without touching `dest` if its size differs from the output bounds.
    fn apply_into(&self, src: &DynamicImage, dest: &mut DynamicImage) -> Result<()> {
        let expected = self.output_bounds(src);
        let actual = Dimensions::of(dest);
        if expected != actual {
            return Err(FilterError::InvalidArgument(format!(
                "destination is {actual}, {} produces {expected}",
                self.name()
            )));
        }
        let result = self.transform(src)?;
        *dest = convert_to(&result, dest.color())?;
        Ok(())
    }

    /// Transform `src`, writing into `dest` or into a freshly allocated
    /// compatible destination when `dest` is `None`.
    fn apply(&self, src: &DynamicImage, dest: Option<DynamicImage>) -> Result<DynamicImage> {
        let mut dest = match dest {
            Some(dest) => dest,
            None => self.create_compatible_destination(src, None)?,
        };
        self.apply_into(src, &mut dest)?;
        Ok(dest)
    }
}
