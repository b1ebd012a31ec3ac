//! Parameter types for image operations.
//!
//! These types describe *what* to build or write, not *how*. The operator
//! factory turns them into [`ImageOperator`](super::operator::ImageOperator)
//! instances and the I/O layer reads [`Quality`] when encoding.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 90). Clamped on construction.
//! - [`OperatorKind`]: which operator the factory should build.
//! - [`OperatorParams`]: string-keyed parameters, the loose external form.
//! - [`ResizeOptions`]: the typed, validated form of the Resize parameters.
//! - [`FlipAxis`]: mirror direction for the flip operators.

use super::error::{FilterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

impl From<u32> for Quality {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Quality> for u32 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// String-keyed operator parameters.
///
/// Recognized keys per kind: Resize → `scale`. Other kinds take none.
pub type OperatorParams = HashMap<String, String>;

/// Operators the factory can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    Resize,
    FlipHorizontal,
    FlipVertical,
}

impl OperatorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperatorKind::Resize => "resize",
            OperatorKind::FlipHorizontal => "flip_horizontal",
            OperatorKind::FlipVertical => "flip_vertical",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatorKind {
    type Err = FilterError;

    /// Case-insensitive; `-` and `_` are interchangeable.
    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "resize" => Ok(OperatorKind::Resize),
            "flip_horizontal" => Ok(OperatorKind::FlipHorizontal),
            "flip_vertical" => Ok(OperatorKind::FlipVertical),
            _ => Err(FilterError::InvalidArgument(format!(
                "operator kind not available: {name}"
            ))),
        }
    }
}

/// Mirror direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlipAxis {
    /// Left-right mirror: `out(x, y) = in(w-1-x, y)`.
    Horizontal,
    /// Top-bottom mirror: `out(x, y) = in(x, h-1-y)`.
    Vertical,
}

/// Typed parameters for the Resize operator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeOptions {
    pub scale: f64,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl ResizeOptions {
    /// Validated construction.
    pub fn new(scale: f64) -> Result<Self> {
        let options = Self { scale };
        options.validate()?;
        Ok(options)
    }

    /// Parse the `scale` key. A missing map or key yields the default 1.0;
    /// a present value that is not a float is rejected.
    pub fn from_params(params: Option<&OperatorParams>) -> Result<Self> {
        let Some(raw) = params.and_then(|p| p.get("scale")) else {
            return Ok(Self::default());
        };
        let scale = raw.trim().parse::<f64>().map_err(|_| {
            FilterError::InvalidArgument(format!("malformed scale parameter: {raw:?}"))
        })?;
        Self::new(scale)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale < 0.0 {
            return Err(FilterError::InvalidArgument(format!(
                "scale must be a non-negative number, got {}",
                self.scale
            )));
        }
        Ok(())
    }
}
