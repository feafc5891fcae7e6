//! Registry error types
//!
//! Error types for stream registry operations.

use thiserror::Error;

/// Error type for relay operations
///
/// None of these are fatal. Publish and subscribe rejections map directly
/// onto a denied publish or play request at the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// A publisher is already live under this name
    #[error("Stream already exists: {0}")]
    StreamAlreadyExists(String),

    /// No publisher is live under this name
    #[error("Stream does not exist: {0}")]
    StreamNotExisting(String),

    /// The stream's driver is gone; only returned by `Publisher::send`
    #[error("Stream closed: {0}")]
    StreamClosed(String),
}

/// Result alias for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;
