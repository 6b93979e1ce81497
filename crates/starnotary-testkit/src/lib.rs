//! # Star Notary Testkit
//!
//! Testing utilities for the Star Notary.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: A chain wired to a manual clock and deterministic wallets
//! - **Generators**: Proptest strategies for stars, addresses and payloads
//! - **Tracing**: A test-writer subscriber honouring `RUST_LOG`
//!
//! ## Test Fixtures
//!
//! ```rust
//! use starnotary_testkit::fixtures::{sample_star, TestFixture};
//!
//! # async fn example() {
//! let fixture = TestFixture::at(1000);
//! let block = fixture.register(sample_star(1)).await.unwrap();
//! assert_eq!(block.height, 1);
//! # }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use starnotary_testkit::generators::payload;
//!
//! proptest! {
//!     #[test]
//!     fn payload_roundtrips(p in payload()) {
//!         prop_assert_eq!(Payload::decode(&p.encode().unwrap()).unwrap(), p);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{sample_star, wallets, ManualClock, TestChain, TestFixture};

use tracing_subscriber::EnvFilter;

/// Install a test-writer tracing subscriber (idempotent).
///
/// Defaults to `warn` when `RUST_LOG` is unset.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
