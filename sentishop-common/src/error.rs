//! Common error types for SentiShop

use thiserror::Error;

/// Common result type for SentiShop operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across SentiShop services
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Image classification adapter failed
    #[error("Classification failed: {0}")]
    Classification(String),

    /// Sentiment analysis adapter failed
    #[error("Sentiment analysis failed: {0}")]
    Sentiment(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
