//! Signature verification seam.
//!
//! The engine never interprets addresses or signatures itself. It hands the
//! challenge message, the claimed address and the signature to a
//! [`SignatureVerifier`] and only accepts an explicit `Ok(true)`.

use async_trait::async_trait;
use thiserror::Error;

use starnotary_core::{Ed25519PublicKey, Ed25519Signature};

/// Errors a verifier may raise on malformed input.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),

    #[error("verifier unavailable: {0}")]
    Unavailable(String),
}

/// Verifies that `signature` over `message` was produced by `address`.
#[async_trait]
pub trait SignatureVerifier: Send + Sync {
    async fn verify(
        &self,
        message: &str,
        address: &str,
        signature: &str,
    ) -> Result<bool, VerifyError>;
}

#[async_trait]
impl<V: SignatureVerifier + ?Sized> SignatureVerifier for std::sync::Arc<V> {
    async fn verify(
        &self,
        message: &str,
        address: &str,
        signature: &str,
    ) -> Result<bool, VerifyError> {
        (**self).verify(message, address, signature).await
    }
}

/// Ed25519 verifier: the address is the hex public key, the signature is
/// 64 bytes of hex.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

#[async_trait]
impl SignatureVerifier for Ed25519Verifier {
    async fn verify(
        &self,
        message: &str,
        address: &str,
        signature: &str,
    ) -> Result<bool, VerifyError> {
        let public_key = Ed25519PublicKey::from_hex(address)
            .map_err(|e| VerifyError::InvalidAddress(e.to_string()))?;
        let signature = Ed25519Signature::from_hex(signature)
            .map_err(|e| VerifyError::InvalidSignature(e.to_string()))?;
        Ok(public_key.verify(message.as_bytes(), &signature))
    }
}
