//! The Blockchain: owner of the ordered block sequence.
//!
//! The engine seals and appends blocks, gates star claims behind a signed
//! ownership challenge, and validates the whole chain before every append.
//!
//! All chain state sits behind a single `RwLock`. An append holds the write
//! lock for the full read-predecessor, validate, seal, push sequence, so two
//! concurrent submissions can never claim the same height. Readers clone a
//! snapshot out under the read lock and never observe a half-appended chain.

use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use starnotary_core::{
    chain_issues, validate_block, validate_chain, Address, Block, BlockHash, ChainIssue, Payload,
    Star,
};

use crate::challenge::OwnershipChallenge;
use crate::clock::{Clock, SystemClock};
use crate::config::NotaryConfig;
use crate::error::{NotaryError, Result};
use crate::verifier::{Ed25519Verifier, SignatureVerifier};

/// Mutable chain state. Height is always `blocks.len() - 1`.
#[derive(Debug, Default)]
struct ChainState {
    blocks: Vec<Block>,
}

impl ChainState {
    fn height(&self) -> Option<u64> {
        (self.blocks.len() as u64).checked_sub(1)
    }
}

/// The chain engine.
///
/// Provides:
/// - Ownership challenges and star submission
/// - Sealing and appending blocks
/// - Lookups by hash, height and owner
/// - Chain-wide validation
pub struct Blockchain<V: SignatureVerifier, C: Clock = SystemClock> {
    /// The chain itself.
    state: RwLock<ChainState>,
    /// Checks challenge signatures.
    verifier: V,
    /// Source of sealing timestamps and challenge times.
    clock: C,
    /// Configuration.
    config: NotaryConfig,
}

impl Blockchain<Ed25519Verifier, SystemClock> {
    /// Create a chain with the default configuration, the Ed25519 verifier
    /// and the system clock.
    pub fn with_defaults() -> Result<Self> {
        Self::new(NotaryConfig::default(), Ed25519Verifier, SystemClock)
    }
}

impl<V: SignatureVerifier, C: Clock> Blockchain<V, C> {
    /// Create a new chain. The genesis block is sealed before this returns.
    pub fn new(config: NotaryConfig, verifier: V, clock: C) -> Result<Self> {
        let mut chain = Self {
            state: RwLock::new(ChainState::default()),
            verifier,
            clock,
            config,
        };

        let mut state = ChainState::default();
        chain.init_genesis(&mut state)?;
        *chain.state.get_mut() = state;
        Ok(chain)
    }

    /// Get the configuration.
    pub fn config(&self) -> &NotaryConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Chain Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Seal the genesis block if the chain is empty. No-op otherwise.
    pub async fn initialize(&self) -> Result<()> {
        let mut state = self.state.write().await;
        self.init_genesis(&mut state)
    }

    fn init_genesis(&self, state: &mut ChainState) -> Result<()> {
        if state.height().is_some() {
            return Ok(());
        }
        let genesis = self.append_locked(state, Block::genesis())?;
        info!(hash = ?genesis.hash, timestamp = genesis.timestamp, "genesis block sealed");
        Ok(())
    }

    /// Seal `block` on top of the current chain and append it.
    ///
    /// Fails with [`NotaryError::ChainCorrupted`] without appending if the
    /// existing chain does not validate.
    pub async fn seal_and_append(&self, block: Block) -> Result<Block> {
        let mut state = self.state.write().await;
        self.append_locked(&mut state, block)
    }

    /// Validate, seal and push under an already-held write lock.
    fn append_locked(&self, state: &mut ChainState, mut block: Block) -> Result<Block> {
        let broken = validate_chain(&state.blocks);
        if !broken.is_empty() {
            error!(heights = ?broken, "refusing to append to a corrupted chain");
            return Err(NotaryError::ChainCorrupted { heights: broken });
        }

        let height = state.blocks.len() as u64;
        if block.is_genesis() && height > 0 {
            return Err(NotaryError::InvalidOperation(
                "genesis block can only be sealed at height 0".into(),
            ));
        }

        let previous = state.blocks.last().and_then(|b| b.hash);
        let hash = block.seal(height, self.clock.now_secs(), previous)?;

        if let Err(issue) = validate_block(&block) {
            return Err(NotaryError::InvalidOperation(format!(
                "refusing to append invalid block: {issue}"
            )));
        }

        state.blocks.push(block.clone());
        info!(height, hash = %hash, "block appended");
        Ok(block)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ownership Workflow
    // ─────────────────────────────────────────────────────────────────────────

    /// Produce the message `address` must sign to prove ownership.
    ///
    /// Format: `<address>:<unix_seconds>:<registry_tag>`. Empty addresses
    /// and addresses containing `:` cannot be parsed back and are refused.
    pub fn request_ownership_challenge(&self, address: &Address) -> Result<String> {
        let challenge = OwnershipChallenge::issue(
            address.clone(),
            self.clock.now_secs(),
            self.config.registry_tag.as_str(),
        )
        .map_err(|e| {
            warn!(%address, error = %e, "refusing ownership challenge");
            e
        })?;
        debug!(%address, requested_at = challenge.requested_at, "ownership challenge issued");
        Ok(challenge.to_string())
    }

    /// Register `star` to `address` after checking the signed challenge.
    ///
    /// Returns the sealed block. On any rejection the chain is untouched.
    pub async fn submit_star(
        &self,
        address: &Address,
        message: &str,
        signature: &str,
        star: Star,
    ) -> Result<Block> {
        let challenge = match OwnershipChallenge::parse(message, &self.config.registry_tag) {
            Ok(challenge) => challenge,
            Err(e) => {
                warn!(%address, error = %e, "malformed ownership challenge");
                return Err(e);
            }
        };

        if challenge.address != *address {
            warn!(%address, challenged = %challenge.address, "challenge issued for another address");
            return Err(NotaryError::MalformedChallenge(format!(
                "challenge was issued for {}",
                challenge.address
            )));
        }

        if let Err(e) = challenge.check_window(
            self.clock.now_secs(),
            self.config.challenge_window,
            self.config.reject_future_challenges,
        ) {
            warn!(%address, error = %e, "ownership challenge outside window");
            return Err(e);
        }

        match self
            .verifier
            .verify(message, address.as_str(), signature)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                warn!(%address, "signature does not match challenge");
                return Err(NotaryError::SignatureInvalid);
            }
            Err(e) => {
                warn!(%address, error = %e, "signature verifier failed");
                return Err(NotaryError::SignatureInvalid);
            }
        }

        let block = Block::new(&Payload::star_claim(address.clone(), star))?;
        let block = self.seal_and_append(block).await?;
        info!(%address, height = block.height, "star registered");
        Ok(block)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Current height (None until genesis has been sealed).
    pub async fn height(&self) -> Option<u64> {
        self.state.read().await.height()
    }

    /// Snapshot of every block, in chain order.
    pub async fn blocks(&self) -> Vec<Block> {
        self.state.read().await.blocks.clone()
    }

    /// Get the first block whose stored hash equals `hash`.
    pub async fn get_block_by_hash(&self, hash: &BlockHash) -> Result<Block> {
        let state = self.state.read().await;
        state
            .blocks
            .iter()
            .find(|b| b.hash.as_ref() == Some(hash))
            .cloned()
            .ok_or_else(|| NotaryError::NotFound(hash.to_hex()))
    }

    /// Get the block at `height`, if the chain is that tall.
    pub async fn get_block_by_height(&self, height: u64) -> Option<Block> {
        let state = self.state.read().await;
        usize::try_from(height)
            .ok()
            .and_then(|i| state.blocks.get(i))
            .cloned()
    }

    /// Every star claim registered to `owner`, in chain order.
    ///
    /// Blocks whose body no longer decodes are skipped.
    pub async fn get_stars_by_owner(&self, owner: &Address) -> Vec<Payload> {
        let state = self.state.read().await;
        state
            .blocks
            .iter()
            .filter(|b| !b.is_genesis())
            .filter_map(|b| match b.decode_payload() {
                Ok(payload) => Some(payload),
                Err(e) => {
                    debug!(height = b.height, error = %e, "skipping undecodable block");
                    None
                }
            })
            .filter(|p| p.owner() == Some(owner))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────────

    /// Indices at which the chain fails validation (empty when valid).
    pub async fn validate_chain(&self) -> Vec<u64> {
        validate_chain(&self.state.read().await.blocks)
    }

    /// Detailed validation report.
    pub async fn chain_issues(&self) -> Vec<ChainIssue> {
        chain_issues(&self.state.read().await.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use starnotary_core::BlockIssue;

    use crate::verifier::VerifyError;

    struct FixedClock(AtomicU64);

    impl Clock for FixedClock {
        fn now_secs(&self) -> u64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    /// Accepts exactly the signature "ok"; errors on "boom".
    struct StubVerifier;

    #[async_trait]
    impl SignatureVerifier for StubVerifier {
        async fn verify(&self, _: &str, _: &str, signature: &str) -> std::result::Result<bool, VerifyError> {
            match signature {
                "ok" => Ok(true),
                "boom" => Err(VerifyError::Unavailable("stub".into())),
                _ => Ok(false),
            }
        }
    }

    fn make_chain(now: u64) -> (Blockchain<StubVerifier, Arc<FixedClock>>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock(AtomicU64::new(now)));
        let chain = Blockchain::new(NotaryConfig::default(), StubVerifier, clock.clone()).unwrap();
        (chain, clock)
    }

    fn star(n: u32) -> Star {
        Star::new(format!("ra{n}"), format!("dec{n}"), "story")
    }

    async fn submit(chain: &Blockchain<StubVerifier, Arc<FixedClock>>, who: &str, n: u32) -> Block {
        let address = Address::from(who);
        let message = chain.request_ownership_challenge(&address).unwrap();
        chain.submit_star(&address, &message, "ok", star(n)).await.unwrap()
    }

    #[tokio::test]
    async fn test_genesis_sealed_on_construction() {
        let (chain, _) = make_chain(1000);
        assert_eq!(chain.height().await, Some(0));

        let genesis = chain.get_block_by_height(0).await.unwrap();
        assert!(genesis.is_genesis());
        assert!(genesis.previous_hash.is_none());
        assert_eq!(genesis.timestamp, 1000);
        assert!(genesis.validate());
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let (chain, _) = make_chain(1000);
        chain.initialize().await.unwrap();
        chain.initialize().await.unwrap();
        assert_eq!(chain.height().await, Some(0));
        assert_eq!(chain.blocks().await.len(), 1);
    }

    #[tokio::test]
    async fn test_initialize_seals_empty_chain() {
        let (chain, _) = make_chain(1000);
        chain.state.write().await.blocks.clear();
        assert_eq!(chain.height().await, None);

        chain.initialize().await.unwrap();
        assert_eq!(chain.height().await, Some(0));
        assert!(chain.validate_chain().await.is_empty());
    }

    #[tokio::test]
    async fn test_seal_and_append_links_blocks() {
        let (chain, clock) = make_chain(1000);
        clock.0.store(1010, Ordering::SeqCst);

        let payload = Payload::star_claim(Address::from("a"), star(1));
        let block = chain.seal_and_append(Block::new(&payload).unwrap()).await.unwrap();

        let genesis = chain.get_block_by_height(0).await.unwrap();
        assert_eq!(block.height, 1);
        assert_eq!(block.timestamp, 1010);
        assert_eq!(block.previous_hash, genesis.hash);
        assert_eq!(chain.height().await, Some(1));
    }

    #[tokio::test]
    async fn test_append_refused_on_corrupted_chain() {
        let (chain, _) = make_chain(1000);
        submit(&chain, "a", 1).await;
        submit(&chain, "a", 2).await;

        chain.state.write().await.blocks[1].timestamp += 1;

        let payload = Payload::star_claim(Address::from("a"), star(3));
        let err = chain
            .seal_and_append(Block::new(&payload).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, NotaryError::ChainCorrupted { ref heights } if heights == &vec![1]));
        assert_eq!(chain.height().await, Some(2));
    }

    #[tokio::test]
    async fn test_second_genesis_refused() {
        let (chain, _) = make_chain(1000);
        let err = chain.seal_and_append(Block::genesis()).await.unwrap_err();
        assert!(matches!(err, NotaryError::InvalidOperation(_)));
        assert_eq!(chain.height().await, Some(0));
    }

    #[tokio::test]
    async fn test_undecodable_block_refused() {
        let (chain, _) = make_chain(1000);
        let mut block = Block::genesis();
        block.body = "zz".into();
        let err = chain.seal_and_append(block).await.unwrap_err();
        assert!(matches!(err, NotaryError::InvalidOperation(_)));
        assert!(chain.validate_chain().await.is_empty());
    }

    #[tokio::test]
    async fn test_submit_star_rejections_leave_chain_untouched() {
        let (chain, clock) = make_chain(1000);
        let address = Address::from("addr1");
        let message = chain.request_ownership_challenge(&address).unwrap();

        let err = chain
            .submit_star(&address, "garbage", "ok", star(1))
            .await
            .unwrap_err();
        assert!(matches!(err, NotaryError::MalformedChallenge(_)));

        let err = chain
            .submit_star(&Address::from("addr2"), &message, "ok", star(1))
            .await
            .unwrap_err();
        assert!(matches!(err, NotaryError::MalformedChallenge(_)));

        let err = chain
            .submit_star(&address, &message, "bad", star(1))
            .await
            .unwrap_err();
        assert!(matches!(err, NotaryError::SignatureInvalid));

        let err = chain
            .submit_star(&address, &message, "boom", star(1))
            .await
            .unwrap_err();
        assert!(matches!(err, NotaryError::SignatureInvalid));

        clock.0.store(1301, Ordering::SeqCst);
        let err = chain
            .submit_star(&address, &message, "ok", star(1))
            .await
            .unwrap_err();
        assert!(matches!(err, NotaryError::ChallengeExpired { elapsed: 301, window: 300 }));

        assert_eq!(chain.height().await, Some(0));
    }

    #[tokio::test]
    async fn test_lookup_by_hash() {
        let (chain, _) = make_chain(1000);
        let block = submit(&chain, "a", 1).await;
        let hash = block.hash.unwrap();

        assert_eq!(chain.get_block_by_hash(&hash).await.unwrap(), block);

        let err = chain
            .get_block_by_hash(&BlockHash::from_bytes([0x77; 32]))
            .await
            .unwrap_err();
        assert!(matches!(err, NotaryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_lookup_by_height_out_of_range_is_none() {
        let (chain, _) = make_chain(1000);
        assert!(chain.get_block_by_height(1).await.is_none());
        assert!(chain.get_block_by_height(u64::MAX).await.is_none());
    }

    #[tokio::test]
    async fn test_stars_by_owner_skips_corrupted_blocks() {
        let (chain, _) = make_chain(1000);
        submit(&chain, "alice", 1).await;
        submit(&chain, "bob", 2).await;
        submit(&chain, "alice", 3).await;
        submit(&chain, "alice", 4).await;

        chain.state.write().await.blocks[3].body = "not hex at all".into();

        let stars: Vec<String> = chain
            .get_stars_by_owner(&Address::from("alice"))
            .await
            .iter()
            .filter_map(|p| p.star().map(|s| s.ra.clone()))
            .collect();
        assert_eq!(stars, vec!["ra1", "ra4"]);

        let issues = chain.chain_issues().await;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].index, 3);
        assert!(matches!(
            issues[0].kind,
            starnotary_core::ChainIssueKind::Block(BlockIssue::Undecodable(_))
        ));
    }
}
