//! Property tests for challenge parsing and the validity window.

use proptest::prelude::*;

use starnotary::config::DEFAULT_REGISTRY_TAG;
use starnotary::{NotaryError, OwnershipChallenge};
use starnotary_testkit::generators::address;

proptest! {
    #[test]
    fn issued_challenges_parse_back(addr in address(), at in any::<u64>()) {
        let issued = OwnershipChallenge::issue(addr, at, DEFAULT_REGISTRY_TAG).unwrap();
        let parsed = OwnershipChallenge::parse(&issued.to_string(), DEFAULT_REGISTRY_TAG).unwrap();
        prop_assert_eq!(parsed, issued);
    }

    #[test]
    fn window_classifies_every_timestamp(
        addr in address(),
        at in any::<u64>(),
        now in any::<u64>(),
        window in any::<u64>(),
        reject_future in any::<bool>(),
    ) {
        let challenge = OwnershipChallenge::new(addr, at, DEFAULT_REGISTRY_TAG);
        let elapsed = challenge.elapsed(now);
        prop_assert_eq!(elapsed, i128::from(now) - i128::from(at));

        let result = challenge.check_window(now, window, reject_future);
        if elapsed > i128::from(window) {
            let expired = matches!(
                result,
                Err(NotaryError::ChallengeExpired { elapsed: e, window: w })
                    if i128::from(e) == elapsed && w == window
            );
            prop_assert!(expired);
        } else if elapsed < 0 && reject_future {
            let malformed = matches!(result, Err(NotaryError::MalformedChallenge(_)));
            prop_assert!(malformed);
        } else {
            prop_assert!(result.is_ok());
        }
    }

    #[test]
    fn window_upper_bound_is_inclusive(
        addr in address(),
        at in 0u64..u64::MAX / 2,
        window in 0u64..10_000,
        offset in 0u64..20_000,
    ) {
        let challenge = OwnershipChallenge::new(addr, at, DEFAULT_REGISTRY_TAG);
        let result = challenge.check_window(at + offset, window, false);
        if offset <= window {
            prop_assert!(result.is_ok());
        } else {
            let expired = matches!(result, Err(NotaryError::ChallengeExpired { .. }));
            prop_assert!(expired);
        }
    }

    #[test]
    fn future_challenges_only_rejected_on_request(
        addr in address(),
        now in any::<u64>(),
        ahead in 1u64..=u64::MAX,
    ) {
        let at = now.saturating_add(ahead);
        prop_assume!(at > now);
        let challenge = OwnershipChallenge::new(addr, at, DEFAULT_REGISTRY_TAG);
        prop_assert!(challenge.check_window(now, 300, false).is_ok());
        let rejected = matches!(
            challenge.check_window(now, 300, true),
            Err(NotaryError::MalformedChallenge(_))
        );
        prop_assert!(rejected);
    }

    #[test]
    fn foreign_tags_rejected(addr in address(), at in any::<u64>(), tag in "[a-z]{1,12}") {
        let message = format!("{addr}:{at}:{tag}");
        let malformed = matches!(
            OwnershipChallenge::parse(&message, DEFAULT_REGISTRY_TAG),
            Err(NotaryError::MalformedChallenge(_))
        );
        prop_assert!(malformed);
    }
}
