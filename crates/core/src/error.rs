//! Application-level error type.
//!
//! Index and data errors from `bus-assistant-transit` pass through unchanged
//! as [`CoreError::Transit`].

use thiserror::Error;

use crate::transit::TransitError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Transit(#[from] TransitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `bus-assistant-core`.
pub type CoreResult<T> = Result<T, CoreError>;
