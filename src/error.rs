//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror.
//! Provider backends log the detailed error and hand the caller a
//! [`Error::Generation`] carrying a message fit for display.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Decode error: {0}")]
    Decode(String),

    /// The provider answered but produced nothing usable.
    #[error("{0}")]
    Refused(String),

    /// Sanitized, user-facing failure.
    #[error("{0}")]
    Generation(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
