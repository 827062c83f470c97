// src/error.rs

//! Unified error handling for the gradelink tools.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias for gradelink operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV reading or writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required input file does not exist
    #[error("{role} file '{path}' does not exist")]
    MissingInput { role: String, path: String },

    /// Mapping tables could not be built
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Fetching a single profile failed
    #[error("Fetch error for UID {uid}: {message}")]
    Fetch { uid: String, message: String },

    /// Parsing failed
    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },

    /// No supported text encoding could decode a file
    #[error("Could not decode '{path}' with any supported encoding")]
    Encoding { path: String },

    /// The matcher found nothing to write
    #[error("No students matched any grade row")]
    NoMatches,
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a missing-input error for the file playing `role`.
    pub fn missing_input(role: impl Into<String>, path: &Path) -> Self {
        Self::MissingInput {
            role: role.into(),
            path: path.display().to_string(),
        }
    }

    /// Create a mapping error.
    pub fn mapping(message: impl Into<String>) -> Self {
        Self::Mapping(message.into())
    }

    /// Create a fetch error for a UID.
    pub fn fetch(uid: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            uid: uid.into(),
            message: message.to_string(),
        }
    }

    /// Create a parse error with context.
    pub fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Log the readable message at `error` level and hand the error back.
    ///
    /// Binaries return errors from `main`, which prints only the `Debug` form.
    pub fn logged(self) -> Self {
        log::error!("{}", self);
        self
    }

    /// Create an encoding error for a file.
    pub fn encoding(path: &Path) -> Self {
        Self::Encoding {
            path: path.display().to_string(),
        }
    }
}
