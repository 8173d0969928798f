//! Error types for the cafe console.
//!
//! This module defines the centralized error type [`ConsoleError`] and a type alias
//! [`Result`] used throughout the crate. The first four variants form the
//! user-facing taxonomy (network, HTTP, validation, missing credentials); the rest
//! cover local failures such as storage, theme loading and malformed payloads.
//!
//! The `Display` output of each variant is what ends up on screen, so the messages
//! are phrased for the user rather than for a log file.

use thiserror::Error;

/// The main error type for cafe console operations.
///
/// # Examples
///
/// ```
/// use cafe_console::ConsoleError;
///
/// let err = ConsoleError::Http { status: 409, detail: "Cafe already exists".to_string() };
/// assert_eq!(err.to_string(), "Cafe already exists");
///
/// let err = ConsoleError::Network("connection refused".to_string());
/// assert_eq!(err.to_string(), "Network error: connection refused");
/// ```
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The request never produced an HTTP response (DNS, refused connection, TLS).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    ///
    /// `detail` carries the backend-supplied message, or the per-operation
    /// fallback when the body had none.
    #[error("{detail}")]
    Http {
        /// HTTP status code of the response.
        status: u16,
        /// Message shown to the user.
        detail: String,
    },

    /// A submitted form failed client-side checks. The message names the
    /// offending field or value.
    #[error("{0}")]
    Validation(String),

    /// A write was attempted without an auth token.
    #[error("Please login first")]
    AuthRequired,

    /// A record from the backend did not have the expected shape.
    #[error("{0}")]
    InvalidRecord(String),

    /// Response body could not be parsed as JSON.
    #[error("Invalid response: {0}")]
    Json(#[from] serde_json::Error),

    /// Key-value storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configured API base could not be turned into a URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// A specialized `Result` type for cafe console operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;
