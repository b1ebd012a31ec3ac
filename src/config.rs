//! Pipeline configuration.
//!
//! The demonstration pipeline reads an optional TOML file. Every key has a
//! default, so a config file only needs the values it overrides, and the
//! stock configuration reproduces the classic stage sequence:
//!
//! ```toml
//! input = "obrazek.png"
//! output_dir = "."
//!
//! [output]
//! quality = 90
//! extension = "jpg"
//!
//! [processing]
//! # max_processes = 4
//!
//! [[stages]]
//! name = "smoothing"
//! kind = "smooth"
//!
//! [[stages]]
//! name = "distortion"
//! kind = "shear"
//! x = 2.0
//! y = 2.0
//! ```
//!
//! Unknown keys are rejected to catch typos early, including keys inside a
//! `[[stages]]` table that its kind does not take.

use crate::imaging::{FilterError, Quality, parse_color};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pipeline configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Image used when none is given on the command line.
    pub input: String,
    /// Directory receiving every output file.
    pub output_dir: String,
    pub output: OutputConfig,
    pub processing: ProcessingConfig,
    /// Stages in application order.
    pub stages: Vec<StageConfig>,
    /// Caption stamped bottom-right on the cumulative outputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: "obrazek.png".to_string(),
            output_dir: ".".to_string(),
            output: OutputConfig::default(),
            processing: ProcessingConfig::default(),
            stages: default_stages(),
            label: None,
        }
    }
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stages.is_empty() {
            return Err(ConfigError::Validation("stages must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for stage in &self.stages {
            if !seen.insert(stage.name()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate stage name '{}': give one of them a distinct `name`",
                    stage.name()
                )));
            }
            stage.kind.validate().map_err(|e| {
                ConfigError::Validation(format!("stage '{}': {e}", stage.name()))
            })?;
        }
        if self.output.extension.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.extension must not be empty".into(),
            ));
        }
        if let Some(label) = &self.label {
            label.validate()?;
        }
        Ok(())
    }
}

/// Output encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG quality (1-100, clamped).
    pub quality: Quality,
    /// Extension of every output file; selects the format (`png`, `jpg`, ...).
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
            extension: "jpg".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers for the per-stage variants.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// One pipeline stage: an optional display name plus the operator to run.
///
/// Deserialized by hand: the name and the kind's fields share one table,
/// and keys that belong to neither are rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageConfig {
    /// Label used in output file names. Defaults to the kind's name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub kind: StageKind,
}

impl<'de> Deserialize<'de> for StageConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut table = toml::Table::deserialize(deserializer)?;
        let name = match table.remove("name") {
            None => None,
            Some(toml::Value::String(name)) => Some(name),
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "stage name must be a string, found {}",
                    other.type_str()
                )));
            }
        };
        let kind =
            StageKind::deserialize(toml::Value::Table(table.clone())).map_err(D::Error::custom)?;
        let allowed = kind.keys();
        if let Some(unknown) = table.keys().find(|k| !allowed.contains(&k.as_str())) {
            return Err(D::Error::custom(format!(
                "unknown key `{unknown}` in {} stage, expected one of: name, {}",
                kind.as_str(),
                allowed.join(", ")
            )));
        }
        Ok(Self { name, kind })
    }
}

impl StageConfig {
    pub fn new(name: &str, kind: StageKind) -> Self {
        Self {
            name: Some(name.to_string()),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.kind.as_str())
    }
}

/// Operators available to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageKind {
    /// 3×3 box blur.
    Smooth,
    /// Affine shear `(x + x_shear·y, y_shear·x + y)`.
    Shear {
        #[serde(rename = "x")]
        x_shear: f64,
        #[serde(rename = "y")]
        y_shear: f64,
    },
    FlipVertical,
    FlipHorizontal,
    Resize {
        #[serde(default = "unit_scale")]
        scale: f64,
    },
}

fn unit_scale() -> f64 {
    1.0
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Smooth => "smooth",
            StageKind::Shear { .. } => "shear",
            StageKind::FlipVertical => "flip_vertical",
            StageKind::FlipHorizontal => "flip_horizontal",
            StageKind::Resize { .. } => "resize",
        }
    }

    /// Table keys the kind accepts, `kind` included.
    fn keys(&self) -> &'static [&'static str] {
        match self {
            StageKind::Shear { .. } => &["kind", "x", "y"],
            StageKind::Resize { .. } => &["kind", "scale"],
            StageKind::Smooth | StageKind::FlipVertical | StageKind::FlipHorizontal => &["kind"],
        }
    }

    fn validate(&self) -> Result<(), String> {
        match *self {
            StageKind::Shear { x_shear, y_shear } => {
                if !x_shear.is_finite() || !y_shear.is_finite() {
                    return Err("shear factors must be finite".into());
                }
                if (1.0 - x_shear * y_shear).abs() < f64::EPSILON {
                    return Err("shear with x·y = 1 is not invertible".into());
                }
                Ok(())
            }
            StageKind::Resize { scale } if !scale.is_finite() || scale < 0.0 => {
                Err(format!("scale must be a non-negative number, got {scale}"))
            }
            _ => Ok(()),
        }
    }
}

/// The classic sequence: smoothing, shear distortion, both reflections, half scale.
pub fn default_stages() -> Vec<StageConfig> {
    vec![
        StageConfig::new("smoothing", StageKind::Smooth),
        StageConfig::new(
            "distortion",
            StageKind::Shear {
                x_shear: 2.0,
                y_shear: 2.0,
            },
        ),
        StageConfig::new("reflection_v", StageKind::FlipVertical),
        StageConfig::new("reflection_h", StageKind::FlipHorizontal),
        StageConfig::new("scale", StageKind::Resize { scale: 0.5 }),
    ]
}

/// Text stamped onto the cumulative outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelConfig {
    pub text: String,
    /// Path to a TrueType/OpenType font file.
    pub font: String,
    #[serde(default = "default_label_size")]
    pub size: f32,
    /// `#rrggbb` or `#rrggbbaa`.
    #[serde(default = "default_label_color")]
    pub color: String,
    /// Distance from the right edge, in pixels.
    #[serde(default = "default_label_margin")]
    pub margin_x: u32,
    /// Distance from the bottom edge, in pixels.
    #[serde(default = "default_label_margin")]
    pub margin_y: u32,
}

fn default_label_size() -> f32 {
    24.0
}

fn default_label_color() -> String {
    "#ffffff".to_string()
}

fn default_label_margin() -> u32 {
    10
}

impl LabelConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(ConfigError::Validation(
                "label.size must be a positive number".into(),
            ));
        }
        parse_color(&self.color).map_err(|e: FilterError| {
            ConfigError::Validation(format!("label.color: {e}"))
        })?;
        Ok(())
    }
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: PipelineConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load `path` when given, otherwise the stock defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<PipelineConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(PipelineConfig::default()),
    }
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# simple-filters pipeline configuration
# =====================================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Image read when no path is given on the command line.
input = "obrazek.png"

# Directory receiving every output file.
output_dir = "."

# ---------------------------------------------------------------------------
# Output encoding
# ---------------------------------------------------------------------------
[output]
# JPEG quality (1 = worst, 100 = best). Ignored for PNG.
quality = 90

# Extension of every output file. "png" writes PNG; "jpg", "jpeg" and
# anything else write JPEG.
extension = "jpg"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for the per-stage outputs.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Stages, applied in order
# ---------------------------------------------------------------------------
# kind: smooth | shear | flip_vertical | flip_horizontal | resize
# name: label used in output file names (defaults to the kind); must be unique.

[[stages]]
name = "smoothing"
kind = "smooth"

[[stages]]
name = "distortion"
kind = "shear"
x = 2.0
y = 2.0

[[stages]]
name = "reflection_v"
kind = "flip_vertical"

[[stages]]
name = "reflection_h"
kind = "flip_horizontal"

[[stages]]
name = "scale"
kind = "resize"
scale = 0.5

# ---------------------------------------------------------------------------
# Label (optional): text stamped bottom-right on the cumulative outputs
# ---------------------------------------------------------------------------
# [label]
# text = "simple-filters"
# font = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
# size = 24.0
# color = "#ffffff"
# margin_x = 10
# margin_y = 10
"##
}
