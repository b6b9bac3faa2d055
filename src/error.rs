//! Centralized error types for mailpost.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors produced by the mailpost library.
///
/// Advisory conditions (unreadable or oversized attachment, failed side
/// copy) are not errors: they are logged and the pipeline continues.
#[derive(Error, Debug)]
pub enum MailpostError {
    /// I/O error with the associated file path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No configuration file was found in the search locations.
    #[error("configuration file not found (searched {0})")]
    ConfigNotFound(String),

    /// The configuration file is not valid TOML or does not fit the profile.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// One or more profile fields failed validation.
    #[error("configuration validation failed: {0}")]
    Validation(String),

    /// A `match_name`/`skip_name` pattern does not compile.
    #[error("invalid {field} pattern '{pattern}': {reason}")]
    BadPattern {
        field: &'static str,
        pattern: String,
        reason: String,
    },

    /// The outgoing message could not be assembled.
    #[error("failed to assemble message: {0}")]
    Message(String),

    /// The mail transport rejected or failed the delivery.
    #[error("failed to send message: {0}")]
    Transport(String),
}

/// Convenience alias for `Result<T, MailpostError>`.
pub type Result<T> = std::result::Result<T, MailpostError>;

impl MailpostError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
