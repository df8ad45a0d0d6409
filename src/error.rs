//! Error types for grimoire operations.
//!
//! The rendering core is total: malformed records degrade to partial or
//! empty output instead of failing. These errors cover the I/O layer
//! (reading corpus files, loading configuration, writing documents).

use thiserror::Error;

/// Errors that can occur while reading input or writing output.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
