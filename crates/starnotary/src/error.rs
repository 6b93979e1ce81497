//! Error types for the chain engine.

use starnotary_core::CoreError;
use thiserror::Error;

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum NotaryError {
    /// The challenge message is not in `<address>:<unix_seconds>:<tag>` form.
    #[error("malformed challenge: {0}")]
    MalformedChallenge(String),

    /// The challenge is older than the configured window.
    #[error("challenge expired: {elapsed}s elapsed, window is {window}s")]
    ChallengeExpired { elapsed: u64, window: u64 },

    /// The signature did not verify (or the verifier failed).
    #[error("signature verification failed")]
    SignatureInvalid,

    /// A stored payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A payload could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// No block matched the lookup.
    #[error("block not found: {0}")]
    NotFound(String),

    /// The block cannot be appended (e.g. a second genesis).
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The existing chain failed validation; nothing was appended.
    #[error("chain corrupted at heights {heights:?}")]
    ChainCorrupted { heights: Vec<u64> },
}

impl From<CoreError> for NotaryError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Encoding(msg) => NotaryError::Encoding(msg),
            CoreError::Decode(msg) => NotaryError::Decode(msg),
        }
    }
}

/// Result type for chain operations.
pub type Result<T> = std::result::Result<T, NotaryError>;
