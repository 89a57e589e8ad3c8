//! Read loop error types.

use thiserror::Error;

/// Errors that end a reading run.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// The session could not be renewed; the run cannot continue.
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// A read submission failed at the transport or decoding level.
    #[error("Read submission failed: {0}")]
    Submission(String),

    /// A book or chapter pool was empty.
    #[error("No {0} configured")]
    EmptyPool(&'static str),

    /// The payload could not be signed.
    #[error("Signature error: {0}")]
    Signature(#[from] read_signature::SignatureError),

    /// Invalid state transition in the read FSM
    #[error("Invalid read state transition: {0}")]
    InvalidTransition(String),
}

/// Result type alias using ReaderError.
pub type ReaderResult<T> = Result<T, ReaderError>;
