//! Error types for the Star Notary core.

use thiserror::Error;

/// Core errors that can occur while encoding or decoding block contents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decode(String),
}

impl From<hex::FromHexError> for CoreError {
    fn from(e: hex::FromHexError) -> Self {
        CoreError::Decode(e.to_string())
    }
}
