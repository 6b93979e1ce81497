//! Proptest generators for property-based testing.

use proptest::prelude::*;

use starnotary_core::{Address, Keypair, Payload, Star};

/// Generate a wallet keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate an address (colon-free, non-empty).
pub fn address() -> impl Strategy<Value = Address> {
    "[a-zA-Z0-9]{1,64}".prop_map(Address::new)
}

/// Generate a star with optional fields sometimes set.
pub fn star() -> impl Strategy<Value = Star> {
    (
        ".{0,24}",
        ".{0,24}",
        ".{0,200}",
        proptest::option::of("[0-9.-]{1,6}"),
        proptest::option::of("[A-Z][a-z]{2,12}"),
    )
        .prop_map(|(ra, dec, story, magnitude, constellation)| Star {
            ra,
            dec,
            story,
            magnitude,
            constellation,
        })
}

/// Generate any payload, genesis included.
pub fn payload() -> impl Strategy<Value = Payload> {
    prop_oneof![
        1 => Just(Payload::Genesis),
        9 => (address(), star()).prop_map(|(owner, star)| Payload::star_claim(owner, star)),
    ]
}
