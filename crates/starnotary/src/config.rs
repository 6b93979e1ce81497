//! Engine configuration.

/// Default ownership challenge window (seconds).
pub const DEFAULT_CHALLENGE_WINDOW: u64 = 300;

/// Default registry tag closing every challenge message.
pub const DEFAULT_REGISTRY_TAG: &str = "starRegistry";

/// Configuration for the chain engine.
#[derive(Debug, Clone)]
pub struct NotaryConfig {
    /// How long a challenge stays valid after it was issued (seconds).
    ///
    /// A challenge is rejected once strictly more than this many seconds
    /// have elapsed.
    pub challenge_window: u64,
    /// Tag appended to every challenge message.
    pub registry_tag: String,
    /// Reject challenges whose timestamp is ahead of the engine clock.
    ///
    /// Off by default: only the upper bound of the window is enforced.
    pub reject_future_challenges: bool,
}

impl Default for NotaryConfig {
    fn default() -> Self {
        Self {
            challenge_window: DEFAULT_CHALLENGE_WINDOW,
            registry_tag: DEFAULT_REGISTRY_TAG.to_owned(),
            reject_future_challenges: false,
        }
    }
}

impl NotaryConfig {
    /// Set the challenge window.
    pub fn with_challenge_window(mut self, secs: u64) -> Self {
        self.challenge_window = secs;
        self
    }

    /// Set the registry tag.
    pub fn with_registry_tag(mut self, tag: impl Into<String>) -> Self {
        self.registry_tag = tag.into();
        self
    }

    /// Reject challenges timestamped in the future.
    pub fn with_reject_future_challenges(mut self, reject: bool) -> Self {
        self.reject_future_challenges = reject;
        self
    }
}
