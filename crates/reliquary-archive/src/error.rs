//! Error types for archive reading and writing.

use thiserror::Error;

/// Errors that can occur when reading or writing an archive.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] reliquary_common::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// XML parsing or writing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// A parameter was present but its text could not be converted.
    #[error("invalid value for parameter '{param}': {value:?}")]
    InvalidValue { param: String, value: String },

    /// A required parameter was absent.
    #[error("missing required parameter '{0}'")]
    MissingParameter(String),

    /// `end_param` was called without a matching `begin_param`.
    #[error("unbalanced parameter scope")]
    UnbalancedScope,
}

/// Result type for archive operations.
pub type Result<T> = std::result::Result<T, Error>;
