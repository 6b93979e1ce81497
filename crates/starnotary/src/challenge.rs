//! Ownership challenges: the time-stamped message a wallet signs.
//!
//! Wire form: `<address>:<unix_seconds>:<registry_tag>`.

use std::fmt;

use starnotary_core::Address;

use crate::error::{NotaryError, Result};

/// A parsed ownership challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipChallenge {
    /// The address the challenge was issued for.
    pub address: Address,
    /// When the challenge was issued (Unix seconds).
    pub requested_at: u64,
    /// The registry tag closing the message.
    pub tag: String,
}

impl OwnershipChallenge {
    /// Create a challenge for `address` issued at `requested_at`.
    pub fn new(address: Address, requested_at: u64, tag: impl Into<String>) -> Self {
        Self {
            address,
            requested_at,
            tag: tag.into(),
        }
    }

    /// Create a challenge whose wire form parses back to the same value.
    ///
    /// Fails with `MalformedChallenge` for an empty address or one that
    /// contains the `:` separator.
    pub fn issue(address: Address, requested_at: u64, tag: impl Into<String>) -> Result<Self> {
        if address.is_empty() {
            return Err(NotaryError::MalformedChallenge("empty address".into()));
        }
        if address.as_str().contains(':') {
            return Err(NotaryError::MalformedChallenge(format!(
                "address {address} contains ':'"
            )));
        }
        Ok(Self::new(address, requested_at, tag))
    }

    /// Parse a challenge message, requiring the given registry tag.
    pub fn parse(message: &str, tag: &str) -> Result<Self> {
        let parts: Vec<&str> = message.split(':').collect();
        let [address, time, found_tag] = parts.as_slice() else {
            return Err(NotaryError::MalformedChallenge(format!(
                "expected 3 ':'-separated parts, found {}",
                parts.len()
            )));
        };

        if address.is_empty() {
            return Err(NotaryError::MalformedChallenge("empty address".into()));
        }
        if *found_tag != tag {
            return Err(NotaryError::MalformedChallenge(format!(
                "unexpected registry tag {found_tag:?}"
            )));
        }
        let requested_at = time.parse::<u64>().map_err(|_| {
            NotaryError::MalformedChallenge(format!("invalid timestamp {time:?}"))
        })?;

        Ok(Self::new(Address::from(*address), requested_at, *found_tag))
    }

    /// Seconds between issue and `now`. Negative when issued in the future.
    pub fn elapsed(&self, now: u64) -> i128 {
        i128::from(now) - i128::from(self.requested_at)
    }

    /// Check the challenge against the validity window.
    ///
    /// Only the upper bound is enforced unless `reject_future` is set.
    pub fn check_window(&self, now: u64, window: u64, reject_future: bool) -> Result<()> {
        match now.checked_sub(self.requested_at) {
            Some(elapsed) if elapsed > window => {
                Err(NotaryError::ChallengeExpired { elapsed, window })
            }
            Some(_) => Ok(()),
            None if reject_future => Err(NotaryError::MalformedChallenge(format!(
                "timestamp is {}s in the future",
                self.requested_at - now
            ))),
            None => Ok(()),
        }
    }
}

impl fmt::Display for OwnershipChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.address, self.requested_at, self.tag)
    }
}
