//! Signing error types.

use thiserror::Error;

/// Errors raised while sealing a payload.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SignatureError {
    /// A field the signature depends on was never set.
    #[error("Payload is missing required field `{0}`")]
    MissingField(&'static str),

    /// JSON encoding of the payload failed.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for SignatureError {
    fn from(err: serde_json::Error) -> Self {
        SignatureError::Json(err.to_string())
    }
}

/// Result type alias using SignatureError.
pub type SignatureResult<T> = Result<T, SignatureError>;
