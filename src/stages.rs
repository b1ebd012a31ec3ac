//! Pipeline stages as image operators.
//!
//! Flips and resize come from the [factory](crate::imaging::factory); the
//! smoothing and shear stages are defined here on top of `image` and
//! `imageproc`, behind the same [`ImageOperator`] trait.

use crate::config::{StageConfig, StageKind};
use crate::imaging::calculations::sheared_extent;
use crate::imaging::color::convert_to;
use crate::imaging::{
    Dimensions, FilterError, FlipAxis, ImageOperator, Point, ResizeOptions, Result,
    SharedOperator, factory,
};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use std::sync::Arc;

/// A named operator ready to run.
#[derive(Debug, Clone)]
pub struct Stage {
    pub name: String,
    pub operator: SharedOperator,
}

impl Stage {
    pub fn from_config(config: &StageConfig) -> Result<Self> {
        Ok(Self {
            name: config.name().to_string(),
            operator: build_operator(&config.kind)?,
        })
    }
}

/// Build every configured stage, failing on the first invalid one.
pub fn build_stages(configs: &[StageConfig]) -> Result<Vec<Stage>> {
    configs.iter().map(Stage::from_config).collect()
}

pub fn build_operator(kind: &StageKind) -> Result<SharedOperator> {
    match *kind {
        StageKind::Smooth => Ok(Arc::new(SmoothOperator)),
        StageKind::Shear { x_shear, y_shear } => Ok(Arc::new(ShearOperator::new(x_shear, y_shear)?)),
        StageKind::FlipVertical => Ok(factory::flip(FlipAxis::Vertical)),
        StageKind::FlipHorizontal => Ok(factory::flip(FlipAxis::Horizontal)),
        StageKind::Resize { scale } => factory::create_resize(ResizeOptions::new(scale)?),
    }
}

/// 3×3 box blur. The one-pixel border has no full neighborhood and is
/// zero-filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothOperator;

const BOX_KERNEL: [f32; 9] = [1.0 / 9.0; 9];

impl ImageOperator for SmoothOperator {
    fn name(&self) -> &str {
        "smooth"
    }

    fn output_bounds(&self, src: &DynamicImage) -> Dimensions {
        Dimensions::of(src)
    }

    fn map_point(&self, src: Point) -> Result<Point> {
        Ok(src)
    }

    fn transform(&self, src: &DynamicImage) -> Result<DynamicImage> {
        if src.width() == 0 || src.height() == 0 {
            return Ok(src.clone());
        }
        Ok(src.filter3x3(&BOX_KERNEL))
    }
}

/// Affine shear `(x, y) → (x + x_shear·y, y_shear·x + y)`.
///
/// The output is large enough for every sheared corner with a non-negative
/// coordinate; uncovered pixels are transparent black before conversion back
/// to the source color model.
#[derive(Debug, Clone, Copy)]
pub struct ShearOperator {
    x_shear: f64,
    y_shear: f64,
    projection: Projection,
}

impl ShearOperator {
    pub fn new(x_shear: f64, y_shear: f64) -> Result<Self> {
        let matrix = [
            1.0,
            x_shear as f32,
            0.0,
            y_shear as f32,
            1.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ];
        let projection = Projection::from_matrix(matrix)
            .filter(|_| x_shear.is_finite() && y_shear.is_finite())
            .ok_or_else(|| {
                FilterError::InvalidArgument(format!(
                    "shear ({x_shear}, {y_shear}) is not invertible"
                ))
            })?;
        Ok(Self {
            x_shear,
            y_shear,
            projection,
        })
    }
}

impl ImageOperator for ShearOperator {
    fn name(&self) -> &str {
        "shear"
    }

    fn output_bounds(&self, src: &DynamicImage) -> Dimensions {
        let (width, height) = sheared_extent((src.width(), src.height()), self.x_shear, self.y_shear);
        Dimensions { width, height }
    }

    fn map_point(&self, src: Point) -> Result<Point> {
        Ok(Point::new(
            src.x + self.x_shear * src.y,
            self.y_shear * src.x + src.y,
        ))
    }

    fn transform(&self, src: &DynamicImage) -> Result<DynamicImage> {
        let bounds = self.output_bounds(src);
        let rgba = src.to_rgba8();
        let mut out = RgbaImage::new(bounds.width, bounds.height);
        if bounds.width > 0 && bounds.height > 0 && src.width() > 0 && src.height() > 0 {
            warp_into(
                &rgba,
                &self.projection,
                Interpolation::Bilinear,
                Rgba([0, 0, 0, 0]),
                &mut out,
            );
        }
        convert_to(&DynamicImage::ImageRgba8(out), src.color())
    }
}
