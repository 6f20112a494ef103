//! Error handling for domain verification runs.
//!
//! Only run-level failures live here: unreadable input, bad configuration
//! and output writes. An unreadable system DNS configuration is not one of
//! them; the resolver falls back to defaults. Per-domain DNS failures are not errors
//! at this level; they are captured in [`CheckResult::error`](crate::CheckResult).

use thiserror::Error;

/// Main error type for domain verification operations.
#[derive(Debug, Error)]
pub enum DomainVerifyError {
    /// The input file is malformed or lacks the required column
    #[error("Invalid input '{path}': {message}")]
    InputParse { path: String, message: String },

    /// File I/O errors when reading inputs or writing outputs
    #[error("File error at '{path}': {message}")]
    FileError { path: String, message: String },

    /// Configuration errors (invalid settings, unparsable TOML, etc.)
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// CSV encoding/decoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Raw I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DomainVerifyError {
    /// Create a new input parse error.
    pub fn input_parse<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::InputParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Whether this error happened while reading the input, before any
    /// domain was checked.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InputParse { .. } | Self::Csv(_))
    }
}
