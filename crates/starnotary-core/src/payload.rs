//! Block payloads and their storage codec.
//!
//! A payload is stored on a block as lower-case hex over its CBOR encoding.
//! The chain never interprets the stored string directly; readers decode it,
//! and a block whose body no longer decodes is treated as tampered.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Address;

/// A star being registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    /// Right ascension.
    pub ra: String,

    /// Declination.
    pub dec: String,

    /// Free-form story told by the owner.
    pub story: String,

    /// Apparent magnitude, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<String>,

    /// Constellation the star belongs to, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constellation: Option<String>,
}

impl Star {
    /// Create a star from its coordinates and story.
    pub fn new(ra: impl Into<String>, dec: impl Into<String>, story: impl Into<String>) -> Self {
        Self {
            ra: ra.into(),
            dec: dec.into(),
            story: story.into(),
            magnitude: None,
            constellation: None,
        }
    }

    /// Set the magnitude.
    pub fn with_magnitude(mut self, magnitude: impl Into<String>) -> Self {
        self.magnitude = Some(magnitude.into());
        self
    }

    /// Set the constellation.
    pub fn with_constellation(mut self, constellation: impl Into<String>) -> Self {
        self.constellation = Some(constellation.into());
        self
    }
}

/// What a block carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// The fixed sentinel carried by the first block of every chain.
    Genesis,

    /// An ownership claim over a star.
    StarClaim {
        /// The wallet address that proved ownership.
        owner: Address,
        /// The claimed star.
        star: Star,
    },
}

impl Payload {
    /// Create a star claim payload.
    pub fn star_claim(owner: Address, star: Star) -> Self {
        Payload::StarClaim { owner, star }
    }

    /// Check if this is the genesis sentinel.
    pub fn is_genesis(&self) -> bool {
        matches!(self, Payload::Genesis)
    }

    /// The owner of a star claim (None for genesis).
    pub fn owner(&self) -> Option<&Address> {
        match self {
            Payload::Genesis => None,
            Payload::StarClaim { owner, .. } => Some(owner),
        }
    }

    /// The claimed star (None for genesis).
    pub fn star(&self) -> Option<&Star> {
        match self {
            Payload::Genesis => None,
            Payload::StarClaim { star, .. } => Some(star),
        }
    }

    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf).map_err(|e| CoreError::Encoding(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        ciborium::from_reader(bytes).map_err(|e| CoreError::Decode(e.to_string()))
    }

    /// Encode into the stored text form (hex over CBOR).
    pub fn encode(&self) -> Result<String, CoreError> {
        Ok(hex::encode(self.to_bytes()?))
    }

    /// Decode the stored text form.
    pub fn decode(encoded: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(encoded)?;
        Self::from_bytes(&bytes)
    }
}
