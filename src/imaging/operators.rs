//! Built-in operators: resize and the two flips.
//!
//! Instances are normally obtained through the [`factory`](super::factory).

use super::calculations::scaled_dimensions;
use super::color::blank;
use super::error::{FilterError, Result};
use super::operator::{Dimensions, ImageOperator, Point};
use super::params::{FlipAxis, ResizeOptions};
use super::pixels;
use image::{ColorType, DynamicImage};

/// Scales by a fixed factor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeOperator {
    scale: f64,
}

impl ResizeOperator {
    pub fn new(options: ResizeOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            scale: options.scale,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl ImageOperator for ResizeOperator {
    fn name(&self) -> &str {
        "resize"
    }

    fn output_bounds(&self, src: &DynamicImage) -> Dimensions {
        // Only a u32 overflow can fail here; the scale is validated on construction.
        let (width, height) = scaled_dimensions((src.width(), src.height()), self.scale)
            .unwrap_or((u32::MAX, u32::MAX));
        Dimensions { width, height }
    }

    fn create_compatible_destination(
        &self,
        src: &DynamicImage,
        color: Option<ColorType>,
    ) -> Result<DynamicImage> {
        let (width, height) = scaled_dimensions((src.width(), src.height()), self.scale)
            .ok_or_else(|| {
                FilterError::InvalidArgument(format!(
                    "scaling {}x{} by {} overflows",
                    src.width(),
                    src.height(),
                    self.scale
                ))
            })?;
        blank(color.unwrap_or_else(|| src.color()), width, height)
    }

    fn map_point(&self, src: Point) -> Result<Point> {
        Ok(Point::new(src.x * self.scale, src.y * self.scale))
    }

    fn transform(&self, src: &DynamicImage) -> Result<DynamicImage> {
        pixels::resize_by(src, self.scale)
    }
}

/// Mirrors along one axis. Stateless apart from the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipOperator {
    axis: FlipAxis,
}

impl FlipOperator {
    pub fn new(axis: FlipAxis) -> Self {
        Self { axis }
    }

    pub fn axis(&self) -> FlipAxis {
        self.axis
    }
}

impl ImageOperator for FlipOperator {
    fn name(&self) -> &str {
        match self.axis {
            FlipAxis::Horizontal => "flip_horizontal",
            FlipAxis::Vertical => "flip_vertical",
        }
    }

    fn output_bounds(&self, src: &DynamicImage) -> Dimensions {
        Dimensions::of(src)
    }

    /// Always fails: mirroring a point needs the source size, which the
    /// operator is not bound to.
    fn map_point(&self, _src: Point) -> Result<Point> {
        Err(FilterError::Unsupported(format!(
            "destination point cannot be determined for {}",
            self.name()
        )))
    }

    fn transform(&self, src: &DynamicImage) -> Result<DynamicImage> {
        Ok(match self.axis {
            FlipAxis::Horizontal => pixels::flip_horizontal(src),
            FlipAxis::Vertical => pixels::flip_vertical(src),
        })
    }
}
