//! The demonstration run: every configured stage applied to one image.
//!
//! For each stage, in configuration order, three files are written into the
//! output directory:
//!
//! ```text
//! _<name>p1.<ext>          stage applied to the original, no destination
//! _<name>p2.<ext>          stage applied into a pre-allocated destination,
//!                          then geometric-blended with the original
//! _<i>_-<a>-<b>....<ext>   cumulative result of stages 0..=i
//! ```
//!
//! The `p1`/`p2` variants of all stages are independent and are rendered in
//! parallel on the global rayon pool. The cumulative sequence feeds each
//! result into the next stage and runs sequentially afterwards.
//!
//! Failures of individual outputs (a transform error, an unwritable file)
//! are recorded in the [`RunReport`] and never abort the run. A failed
//! sequence step leaves the running image unchanged.

use crate::config::{LabelConfig, PipelineConfig};
use crate::imaging::{
    Dimensions, FilterError, Font, Quality, geometric_blend, overlay_text_bottom_right, parse_color,
    save_with_quality,
};
use crate::stages::{Stage, build_stages};
use image::{DynamicImage, Rgba};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage setup failed: {0}")]
    Setup(#[from] FilterError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which of the three per-stage outputs a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// `p1`: the stage applied with no destination.
    Direct,
    /// `p2`: applied into a compatible destination, blended with the original.
    Blended,
    /// Cumulative result of this and all previous stages.
    Sequence,
}

/// One output file, written or not.
#[derive(Debug, Clone, Serialize)]
pub struct OutputRecord {
    pub kind: OutputKind,
    pub path: PathBuf,
    /// Size of the written image; absent on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OutputRecord {
    pub fn is_written(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub index: usize,
    pub name: String,
    pub operator: String,
    pub outputs: Vec<OutputRecord>,
}

/// Everything a run produced, in stage order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub dimensions: Dimensions,
    pub output_dir: PathBuf,
    pub stages: Vec<StageReport>,
}

impl RunReport {
    pub fn outputs(&self) -> impl Iterator<Item = &OutputRecord> {
        self.stages.iter().flat_map(|s| s.outputs.iter())
    }

    pub fn written_count(&self) -> usize {
        self.outputs().filter(|o| o.is_written()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outputs().filter(|o| !o.is_written()).count()
    }
}

/// File name of the `p1`/`p2` variant of a stage.
pub fn variant_file_name(stage: &str, variant: u8, extension: &str) -> String {
    format!("_{stage}p{variant}.{extension}")
}

/// File name of the `index`-th cumulative output. `sequence` is the
/// accumulated `-name` chain, e.g. `-smoothing-distortion`.
pub fn sequence_file_name(index: usize, sequence: &str, extension: &str) -> String {
    format!("_{index}_{sequence}.{extension}")
}

/// A resolved label: font loaded, color parsed.
struct Label {
    text: String,
    font: Font,
    color: Rgba<u8>,
    margin: (u32, u32),
}

impl Label {
    fn load(config: &LabelConfig) -> Result<Self, FilterError> {
        Ok(Self {
            text: config.text.clone(),
            font: Font::from_file(Path::new(&config.font), config.size)?,
            color: parse_color(&config.color)?,
            margin: (config.margin_x, config.margin_y),
        })
    }

    fn stamp(&self, image: &DynamicImage) -> DynamicImage {
        overlay_text_bottom_right(
            image,
            &self.text,
            &self.font,
            self.color,
            self.margin.0,
            self.margin.1,
        )
    }
}

/// Run every configured stage over `image`, writing into `output_dir`.
///
/// Setup problems (an invalid stage, an unreadable label font, an output
/// directory that cannot be created) fail the whole run before any file is
/// written. `input` is only used for the report.
pub fn run(
    image: &DynamicImage,
    input: &Path,
    config: &PipelineConfig,
    output_dir: &Path,
) -> Result<RunReport, PipelineError> {
    let stages = build_stages(&config.stages)?;
    let label = config.label.as_ref().map(Label::load).transpose()?;
    std::fs::create_dir_all(output_dir)?;

    let writer = Writer {
        dir: output_dir,
        extension: config.output.extension.trim(),
        quality: config.output.quality,
    };

    let mut reports: Vec<StageReport> = stages
        .par_iter()
        .enumerate()
        .map(|(index, stage)| {
            tracing::info!(stage = %stage.name, "Applying stage");
            StageReport {
                index,
                name: stage.name.clone(),
                operator: stage.operator.name().to_string(),
                outputs: vec![
                    writer.write(
                        OutputKind::Direct,
                        &variant_file_name(&stage.name, 1, writer.extension),
                        render_direct(stage, image),
                    ),
                    writer.write(
                        OutputKind::Blended,
                        &variant_file_name(&stage.name, 2, writer.extension),
                        render_blended(stage, image),
                    ),
                ],
            }
        })
        .collect();

    let mut current = image.clone();
    let mut sequence = String::new();
    for (stage, report) in stages.iter().zip(reports.iter_mut()) {
        sequence.push('-');
        sequence.push_str(&stage.name);
        let file_name = sequence_file_name(report.index, &sequence, writer.extension);

        let rendered = stage.operator.apply(&current, None).map(|next| {
            current = next;
            match &label {
                Some(label) => label.stamp(&current),
                None => current.clone(),
            }
        });
        report
            .outputs
            .push(writer.write(OutputKind::Sequence, &file_name, rendered));
    }

    Ok(RunReport {
        input: input.to_path_buf(),
        dimensions: Dimensions::of(image),
        output_dir: output_dir.to_path_buf(),
        stages: reports,
    })
}

fn render_direct(stage: &Stage, image: &DynamicImage) -> Result<DynamicImage, FilterError> {
    stage.operator.apply(image, None)
}

fn render_blended(stage: &Stage, image: &DynamicImage) -> Result<DynamicImage, FilterError> {
    let dest = stage.operator.create_compatible_destination(image, None)?;
    let filtered = stage.operator.apply(image, Some(dest))?;
    geometric_blend(image, &filtered)
}

struct Writer<'a> {
    dir: &'a Path,
    extension: &'a str,
    quality: Quality,
}

impl Writer<'_> {
    fn write(
        &self,
        kind: OutputKind,
        file_name: &str,
        rendered: Result<DynamicImage, FilterError>,
    ) -> OutputRecord {
        let path = self.dir.join(file_name);
        let result = rendered
            .and_then(|img| save_with_quality(&img, &path, self.quality).map(|()| img));
        match result {
            Ok(img) => {
                tracing::info!(path = %path.display(), size = %Dimensions::of(&img), "Wrote output");
                OutputRecord {
                    kind,
                    path,
                    dimensions: Some(Dimensions::of(&img)),
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Output not written");
                OutputRecord {
                    kind,
                    path,
                    dimensions: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
