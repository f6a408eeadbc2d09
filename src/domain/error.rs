//! Error types for the Movie Mania client.
//!
//! This module defines the centralized error type [`MovieManiaError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! The coordinator never lets these errors reach the view directly: search and
//! favourites failures are mapped to fixed user-facing messages, while toggle and
//! login failures are only logged.

use thiserror::Error;

/// The main error type for Movie Mania operations.
///
/// Most variants wrap underlying errors from external crates using `#[from]` for
/// automatic conversion.
///
/// # Examples
///
/// ```
/// use movie_mania::MovieManiaError;
///
/// fn validate_config() -> Result<(), MovieManiaError> {
///     Err(MovieManiaError::Config("missing OAuth client id".to_string()))
/// }
///
/// assert!(validate_config().is_err());
/// ```
#[derive(Debug, Error)]
pub enum MovieManiaError {
    /// Transport-level HTTP failure (connection refused, timeout, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status code.
    #[error("API error ({status_code}): {message}")]
    Api {
        /// HTTP status code returned by the backend.
        status_code: u16,
        /// Response body or a short description of the failure.
        message: String,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Local client storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or missing.
    ///
    /// A missing OAuth client id when login is required is reported here and is
    /// fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The OAuth callback did not produce a usable session.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A background request task could not be completed or reported.
    #[error("Worker error: {0}")]
    Worker(String),

    /// The configured base URL or a derived endpoint is not a valid URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// A specialized `Result` type for Movie Mania operations.
pub type Result<T> = std::result::Result<T, MovieManiaError>;
