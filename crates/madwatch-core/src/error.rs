//! Detector error types.

use thiserror::Error;

/// Errors surfaced while configuring or constructing a detector.
///
/// A zero MAD is not an error: it is resolved by
/// [`ZeroMadPolicy`](crate::config::ZeroMadPolicy).
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Invalid configuration: {name} - {reason}")]
    InvalidConfiguration { name: &'static str, reason: String },

    #[error("Stream exhausted: required {required} readings, got {got}")]
    StreamExhausted { required: usize, got: usize },

    #[error("Non-finite reading {value} at position {position} while filling the window")]
    NonFiniteReading { position: usize, value: f64 },

    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type for detector operations.
pub type Result<T> = std::result::Result<T, DetectorError>;
