//! # Star Notary
//!
//! A single-node, append-only, hash-chained registry of star ownership
//! claims. Wallets prove control of an address by signing a time-boxed
//! challenge; the claim is then sealed into a new block whose hash covers
//! its predecessor's.
//!
//! ## Key Concepts
//!
//! - **Block**: Immutable once sealed. Never edited, never removed.
//! - **Genesis**: The sentinel block at height 0, sealed at construction.
//! - **Ownership challenge**: `<address>:<unix_seconds>:starRegistry`, valid
//!   for 300 seconds by default.
//! - **Validation**: Every append first re-validates the whole chain.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use starnotary::{Blockchain, Keypair, Star};
//!
//! async fn example() {
//!     let chain = Blockchain::with_defaults().unwrap();
//!     let wallet = Keypair::generate();
//!     let address = wallet.address();
//!
//!     // The wallet signs the challenge out of band.
//!     let message = chain.request_ownership_challenge(&address).unwrap();
//!     let signature = wallet.sign(message.as_bytes()).to_hex();
//!
//!     let block = chain
//!         .submit_star(&address, &message, &signature, Star::new("16h 29m", "-26° 29'", "Antares"))
//!         .await
//!         .unwrap();
//!     assert_eq!(block.height, 1);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `starnotary::core` - Core primitives (Block, BlockHash, Payload, etc.)

pub mod blockchain;
pub mod challenge;
pub mod clock;
pub mod config;
pub mod error;
pub mod verifier;

// Re-export component crates
pub use starnotary_core as core;

// Re-export main types for convenience
pub use blockchain::Blockchain;
pub use challenge::OwnershipChallenge;
pub use clock::{Clock, SystemClock};
pub use config::NotaryConfig;
pub use error::{NotaryError, Result};
pub use verifier::{Ed25519Verifier, SignatureVerifier, VerifyError};

// Re-export commonly used core types
pub use starnotary_core::{
    Address, Block, BlockHash, BlockIssue, ChainIssue, ChainIssueKind, Ed25519PublicKey,
    Ed25519Signature, Keypair, Payload, Star,
};
