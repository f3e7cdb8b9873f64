//! Error types for cryptnote core operations.
//!
//! Every fallible operation in the core returns one of these variants as an
//! explicit value. The CLI layer maps them to user-facing messages and exit
//! codes.

use thiserror::Error;

/// Result type alias for cryptnote operations.
pub type Result<T> = std::result::Result<T, CryptnoteError>;

/// Core error type for cryptnote operations.
#[derive(Debug, Error)]
pub enum CryptnoteError {
    /// Password mismatch, or a blob that does not open under the presented key.
    ///
    /// The two cases are deliberately not distinguished.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Input rejected by a policy check (empty body, short password, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing credential or entry
    #[error("Not found: {0}")]
    NotFound(String),

    /// Durable read or write failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// The user aborted an interactive flow
    #[error("Cancelled by user")]
    Cancelled,

    /// A cryptographic primitive rejected its parameters
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Invalid vault configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CryptnoteError {
    /// True for wrong-password / wrong-key / tampered-blob failures.
    pub fn is_authentication(&self) -> bool {
        matches!(self, CryptnoteError::Authentication(_))
    }

    /// True when the requested credential or entry does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CryptnoteError::NotFound(_))
    }
}

impl From<std::io::Error> for CryptnoteError {
    fn from(err: std::io::Error) -> Self {
        CryptnoteError::Storage(err.to_string())
    }
}
