//! Block: a single ledger entry.
//!
//! A block is created unsealed around a payload. Sealing stamps its height,
//! timestamp and back-reference, then digests those fields together with
//! the encoded payload. Once sealed a block is never edited.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canonical::digest_input;
use crate::error::CoreError;
use crate::payload::Payload;
use crate::types::BlockHash;

/// Stored body of the genesis block (hex over the CBOR of `Payload::Genesis`).
pub const GENESIS_BODY: &str = "a1646b696e646767656e65736973";

/// A ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain (0 for genesis). Assigned at sealing.
    pub height: u64,

    /// Sealing time (Unix seconds). Assigned at sealing.
    pub timestamp: u64,

    /// Hash of the preceding block (None for genesis).
    pub previous_hash: Option<BlockHash>,

    /// Digest of this block's other fields (None until sealed).
    pub hash: Option<BlockHash>,

    /// The payload in its stored form (hex over CBOR).
    pub body: String,
}

/// Why a single block failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockIssue {
    #[error("block has not been sealed")]
    Unsealed,

    #[error("hash mismatch: stored {stored}, computed {computed}")]
    HashMismatch {
        stored: BlockHash,
        computed: BlockHash,
    },

    #[error("body does not decode: {0}")]
    Undecodable(String),

    #[error("digest input could not be encoded: {0}")]
    Encoding(String),
}

impl Block {
    /// Create a new, unsealed block holding `payload`.
    pub fn new(payload: &Payload) -> Result<Self, CoreError> {
        Ok(Self::from_body(payload.encode()?))
    }

    /// Create the unsealed genesis block.
    pub fn genesis() -> Self {
        Self::from_body(GENESIS_BODY.to_owned())
    }

    fn from_body(body: String) -> Self {
        Self {
            height: 0,
            timestamp: 0,
            previous_hash: None,
            hash: None,
            body,
        }
    }

    /// Check if this block carries the genesis sentinel.
    ///
    /// Compares the stored body without decoding it.
    pub fn is_genesis(&self) -> bool {
        self.body == GENESIS_BODY
    }

    /// Check if the block has been sealed.
    pub fn is_sealed(&self) -> bool {
        self.hash.is_some()
    }

    /// Compute the digest of the block's current fields, ignoring the stored hash.
    pub fn compute_hash(&self) -> Result<BlockHash, CoreError> {
        Ok(BlockHash::digest(&digest_input(self)?))
    }

    /// Stamp position, time and back-reference, then compute and store the hash.
    ///
    /// The back-reference is dropped for genesis blocks.
    pub fn seal(
        &mut self,
        height: u64,
        timestamp: u64,
        previous_hash: Option<BlockHash>,
    ) -> Result<BlockHash, CoreError> {
        self.height = height;
        self.timestamp = timestamp;
        self.previous_hash = if self.is_genesis() { None } else { previous_hash };
        self.hash = None;

        let hash = self.compute_hash()?;
        self.hash = Some(hash);
        Ok(hash)
    }

    /// Check the block's internal consistency.
    ///
    /// False when the block is unsealed, its body does not decode, or the
    /// stored hash differs from a fresh digest of the other fields.
    pub fn validate(&self) -> bool {
        crate::validation::validate_block(self).is_ok()
    }

    /// Decode the stored body back into its payload.
    pub fn decode_payload(&self) -> Result<Payload, CoreError> {
        Payload::decode(&self.body)
    }
}
