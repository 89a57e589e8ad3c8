//! Session renewal error types.

use thiserror::Error;

/// Session renewal error type.
#[derive(Error, Debug)]
pub enum RenewalError {
    /// The renewal response carried no usable `wr_skey`.
    #[error("Renewal response had no session key (HTTP {status}, {body_summary})")]
    TokenNotFound { status: u16, body_summary: String },

    /// A token was offered but it was empty.
    #[error("Refusing to store an empty session key")]
    EmptyToken,

    /// A configured header could not be used.
    #[error("Invalid header `{0}`")]
    InvalidHeader(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl RenewalError {
    /// Returns true for failures caused by the network rather than the reply.
    pub fn is_transient(&self) -> bool {
        match self {
            RenewalError::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

/// Result type alias using RenewalError.
pub type RenewalResult<T> = Result<T, RenewalError>;
