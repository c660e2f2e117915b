use thiserror::Error;

/// Top-level error type for the MittiScan pipeline.
///
/// Only structurally invalid input is an error. Missing labels, unknown crops
/// and missing prices are handled by omission in the stages themselves.
#[derive(Debug, Error)]
pub enum MittiError {
    #[error("invalid input for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    #[error("soil pH must be between {min} and {max}, got {value}")]
    PhOutOfRange { value: f64, min: f64, max: f64 },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("OCR error: {0}")]
    OcrError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MittiError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MittiError>;
