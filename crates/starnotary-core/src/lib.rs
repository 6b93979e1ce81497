//! # Star Notary Core
//!
//! Pure primitives for the Star Notary: blocks, payloads, and canonical digests.
//!
//! This crate contains no I/O, no clocks, no async. It is pure computation
//! over the hash-chained block structure.
//!
//! ## Key Types
//!
//! - [`Block`] - A ledger entry, sealed once its hash is computed
//! - [`BlockHash`] - Content digest (Blake3 over the canonical digest input)
//! - [`Payload`] - What a block carries: the genesis sentinel or a star claim
//! - [`Address`] - The wallet address a claim is registered to
//!
//! ## Canonicalization
//!
//! Block digests are computed over deterministic CBOR. See [`canonical`] module.

pub mod block;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod payload;
pub mod types;
pub mod validation;

pub use block::{Block, BlockIssue};
pub use canonical::digest_input;
pub use crypto::{Ed25519PublicKey, Ed25519Signature, Keypair};
pub use error::CoreError;
pub use payload::{Payload, Star};
pub use types::{Address, BlockHash};
pub use validation::{chain_issues, validate_block, validate_chain, ChainIssue, ChainIssueKind};
