//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use starnotary::{Blockchain, Clock, Ed25519Verifier, NotaryConfig, Result};
use starnotary_core::{Address, Block, Keypair, Star};

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Create a clock reading `now`.
    pub fn new(now: u64) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    /// Jump to `now`.
    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Move forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// The chain type used by fixtures.
pub type TestChain = Blockchain<Ed25519Verifier, Arc<ManualClock>>;

/// A chain, its clock, and a wallet to submit with.
pub struct TestFixture {
    pub chain: Arc<TestChain>,
    pub clock: Arc<ManualClock>,
    pub wallet: Keypair,
}

impl TestFixture {
    /// Create a fixture whose clock starts at `now`.
    pub fn at(now: u64) -> Self {
        Self::with_config(NotaryConfig::default(), now)
    }

    /// Create a fixture with a custom configuration.
    pub fn with_config(config: NotaryConfig, now: u64) -> Self {
        let clock = Arc::new(ManualClock::new(now));
        let chain = Blockchain::new(config, Ed25519Verifier, clock.clone())
            .expect("genesis sealing cannot fail");
        Self {
            chain: Arc::new(chain),
            clock,
            wallet: Keypair::from_seed(&[0x42; 32]),
        }
    }

    /// The fixture wallet's address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Sign `message` with the fixture wallet (hex signature).
    pub fn sign(&self, message: &str) -> String {
        self.wallet.sign(message.as_bytes()).to_hex()
    }

    /// Request, sign and submit in one go with the fixture wallet.
    pub async fn register(&self, star: Star) -> Result<Block> {
        self.register_as(&self.wallet, star).await
    }

    /// Request, sign and submit in one go with `wallet`.
    pub async fn register_as(&self, wallet: &Keypair, star: Star) -> Result<Block> {
        let address = wallet.address();
        let message = self.chain.request_ownership_challenge(&address)?;
        let signature = wallet.sign(message.as_bytes()).to_hex();
        self.chain
            .submit_star(&address, &message, &signature, star)
            .await
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::at(1_000)
    }
}

/// Create deterministic wallets for multi-party tests.
pub fn wallets(count: usize) -> Vec<Keypair> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[1] = 0xa5;
            Keypair::from_seed(&seed)
        })
        .collect()
}

/// A distinct star for index `n`.
pub fn sample_star(n: u32) -> Star {
    Star::new(
        format!("{}h {}m 0.0s", n % 24, n % 60),
        format!("+{}° 0' 0.0", n % 90),
        format!("star number {n}"),
    )
}
