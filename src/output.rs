//! CLI output formatting for the demonstration run.
//!
//! # Output Format
//!
//! ```text
//! obrazek.png (640x480)
//! 000 smoothing (smooth)
//!     p1: _smoothingp1.jpg (640x480)
//!     p2: _smoothingp2.jpg (640x480)
//!     sequence: _0_-smoothing.jpg (640x480)
//! 001 distortion (shear)
//!     p1: _distortionp1.jpg (1600x1760)
//!     p2: _distortionp2.jpg FAILED: IO error: Permission denied
//!     ...
//!
//! Wrote 14 files, 1 failed → out/
//! ```
//!
//! Each stage has a header line (index, name, operator) followed by one
//! indented line per output, in the order they are produced.
//!
//! # Architecture
//!
//! `format_*` functions return `Vec<String>` for testability; the `print_*`
//! wrappers write to stdout. Format functions are pure.

use crate::pipeline::{OutputKind, OutputRecord, RunReport, StageReport};
use std::path::Path;

/// Format a 0-based stage index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn kind_label(kind: OutputKind) -> &'static str {
    match kind {
        OutputKind::Direct => "p1",
        OutputKind::Blended => "p2",
        OutputKind::Sequence => "sequence",
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One line per output: kind, file name, then the size or the failure.
fn output_line(record: &OutputRecord) -> String {
    let name = file_name(&record.path);
    match (&record.error, record.dimensions) {
        (Some(error), _) => format!("{}: {} FAILED: {}", kind_label(record.kind), name, error),
        (None, Some(dims)) => format!("{}: {} ({})", kind_label(record.kind), name, dims),
        (None, None) => format!("{}: {}", kind_label(record.kind), name),
    }
}

fn stage_header(stage: &StageReport) -> String {
    format!(
        "{} {} ({})",
        format_index(stage.index),
        stage.name,
        stage.operator
    )
}

/// Format the full run report.
pub fn format_run_report(report: &RunReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({})",
        report.input.display(),
        report.dimensions
    )];

    for stage in &report.stages {
        lines.push(stage_header(stage));
        for record in &stage.outputs {
            lines.push(format!("{}{}", indent(1), output_line(record)));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Wrote {} files, {} failed \u{2192} {}",
        report.written_count(),
        report.failed_count(),
        report.output_dir.display()
    ));
    lines
}

/// Print the run report to stdout.
pub fn print_run_report(report: &RunReport) {
    for line in format_run_report(report) {
        println!("{}", line);
    }
}

/// Format the `check` command's summary of a valid config.
pub fn format_config_summary(config: &crate::config::PipelineConfig) -> Vec<String> {
    let mut lines = vec![format!("Stages ({})", config.stages.len())];
    for (i, stage) in config.stages.iter().enumerate() {
        lines.push(format!(
            "{}{} {} ({})",
            indent(1),
            format_index(i),
            stage.name(),
            stage.kind.as_str()
        ));
    }
    lines.push(format!(
        "Output: *.{} (quality {})",
        config.output.extension,
        config.output.quality.value()
    ));
    if let Some(label) = &config.label {
        lines.push(format!("Label: \"{}\" ({})", label.text, label.font));
    }
    lines
}

/// Print the config summary to stdout.
pub fn print_config_summary(config: &crate::config::PipelineConfig) {
    for line in format_config_summary(config) {
        println!("{}", line);
    }
}
