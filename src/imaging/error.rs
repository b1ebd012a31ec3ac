//! Error type shared by every imaging operation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Font error: {0}")]
    Font(String),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, FilterError>;
