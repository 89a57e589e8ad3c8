//! Notification error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    /// The selected channel needs a credential that is not configured.
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    /// No delivery method is configured.
    #[error("No push method configured")]
    NoMethod,

    /// The HTTP client could not be built.
    #[error("Push client setup failed: {0}")]
    ClientSetup(String),

    /// Unknown delivery method name.
    #[error("Unknown push method: {0}")]
    UnknownMethod(String),

    /// The push service answered with a non-success status.
    #[error("Push rejected with HTTP {0}")]
    Rejected(u16),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias using NotifyError.
pub type NotifyResult<T> = Result<T, NotifyError>;
