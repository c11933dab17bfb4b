use std::io;
use thiserror::Error;

/// Application-wide error type for the surfaces around the classifier.
///
/// The classification engine itself is total and never fails; these errors
/// come from reading transcripts, configuration and output encoding.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents a transcript file whose text could not be extracted.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Represents a transcript file with an extension we cannot read.
    #[error("Unsupported file extension: {0}")]
    UnsupportedFormat(String),

    /// Represents data validation errors (e.g., invalid input format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., bad environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents JSON encoding errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for AppError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        AppError::Extraction(format!("Invalid UTF-8 content: {}", err))
    }
}
