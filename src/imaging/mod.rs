//! Image processing over the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Load / save** | `image::ImageReader`, `PngEncoder`, `JpegEncoder` |
//! | **Flip** | `DynamicImage::fliph` / `flipv` |
//! | **Resize** | `DynamicImage::resize_exact` with `Triangle` |
//! | **Color model conversion** | `DynamicImage::to_*` |
//! | **Geometric blend** | per-component `sqrt(a * b)` over the raw buffers |
//! | **Text overlay** | `ab_glyph` outlines, coverage-blended into the pixels |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and anchor math (unit testable)
//! - **Parameters**: Operator kinds, typed options, encode quality
//! - **Pixels / Text / IO**: Direct operations on `DynamicImage`
//! - **Operator**: [`ImageOperator`] trait + the built-in [`operators`]
//! - **Factory**: [`create`] and the shared flip cache

pub mod calculations;
pub mod color;
mod error;
pub mod factory;
pub mod io;
pub mod operator;
pub mod operators;
mod params;
pub mod pixels;
pub mod text;

pub use error::{FilterError, Result};
pub use factory::{OperatorSpec, SharedOperator, create, create_by_name, create_resize};
pub use io::{load, save, save_with_quality, try_load};
pub use operator::{Dimensions, ImageOperator, Point};
pub use params::{FlipAxis, OperatorKind, OperatorParams, Quality, ResizeOptions};
pub use pixels::{
    copy_image, flip_horizontal, flip_vertical, geometric_blend, recolor_to, resize_by, resize_to,
};
pub use text::{Font, overlay_text_bottom_right, overlay_text_top_left, parse_color};
