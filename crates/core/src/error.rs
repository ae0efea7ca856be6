//! Error model for OSM records and record sources.

use thiserror::Error;

/// Result type used across the record layer.
pub type OsmResult<T> = Result<T, OsmError>;

/// Record-level error.
///
/// Covers malformed values, bad identifiers and failures while reading records
/// from a source. Failures raised by consumers are never translated into this
/// type; they travel back to the caller untouched.
#[derive(Debug, Error)]
pub enum OsmError {
    /// A value failed validation (e.g. a coordinate out of range).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A record could not be decoded.
    #[error("decode error on line {line}: {message}")]
    Decode { line: usize, message: String },

    /// The underlying reader failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl OsmError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn decode(line: usize, msg: impl Into<String>) -> Self {
        Self::Decode {
            line,
            message: msg.into(),
        }
    }
}
