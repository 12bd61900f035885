// ABOUTME: Error types for the slider-export application
// ABOUTME: Provides structured error handling for each stage of the export pipeline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SliderError {
    #[error("File operation failed: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Nothing to export: the slide list is empty")]
    NothingToExport,

    #[error("Nothing to preview: the slide list is empty")]
    NothingToPreview,

    #[error("Malformed embedded image in slide {slide_id}: {reason}")]
    MalformedEmbeddedReference { slide_id: String, reason: String },

    #[error("Failed to decode embedded image payload: {0}")]
    PayloadDecodeError(#[from] base64::DecodeError),

    #[error("Archive error: {0}")]
    ArchiveError(String),

    #[error("Delivery error: {0}")]
    DeliveryError(String),

    #[error("Preview surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Deck parse error: {0}")]
    DeckParseError(#[from] serde_json::Error),

    #[error("Invalid image URL: {0}")]
    InvalidImageUrl(String),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SliderError {
    /// Whether this error is an empty-input condition rather than a failure
    pub fn is_empty_input(&self) -> bool {
        matches!(
            self,
            SliderError::NothingToExport | SliderError::NothingToPreview
        )
    }
}

// Implement conversion from zip errors
impl From<zip::result::ZipError> for SliderError {
    fn from(err: zip::result::ZipError) -> Self {
        SliderError::ArchiveError(format!("ZIP operation failed: {}", err))
    }
}

impl From<url::ParseError> for SliderError {
    fn from(err: url::ParseError) -> Self {
        SliderError::InvalidImageUrl(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SliderError>;
