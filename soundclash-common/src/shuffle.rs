//! Deterministic shuffles.
//!
//! Two separate randomization needs, kept apart on purpose:
//! - [`shuffle_tied`] breaks ties inside a placement group with a fixed
//!   internal seed, so results pages are stable across calls and restarts
//!   without being biased by id or insertion order.
//! - [`shuffle_seeded`] orders the voting display from a caller-supplied
//!   seed string, so one voter sees a consistent order across reloads while
//!   different voters see different orders.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sha2::{Digest, Sha256};

/// Seed string used when a caller supplies none.
pub const DEFAULT_DISPLAY_SEED: &str = "default shuffle order";

/// Fixed internal seed for tie-group ordering. Never request-derived.
const TIE_SHUFFLE_SEED: [u8; 32] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2,
];

/// Shuffle a tie group with the fixed internal seed.
pub fn shuffle_tied<T>(items: &mut [T]) {
    let mut rng = StdRng::from_seed(TIE_SHUFFLE_SEED);
    items.shuffle(&mut rng);
}

/// Shuffle for display, seeded from a caller-supplied string.
///
/// The seed string is hashed into the RNG seed, so any string works and the
/// same string always produces the same order.
pub fn shuffle_seeded<T>(items: &mut [T], seed: &str) {
    let mut rng = StdRng::from_seed(seed_bytes(seed));
    items.shuffle(&mut rng);
}

fn seed_bytes(seed: &str) -> [u8; 32] {
    let digest = Sha256::digest(seed.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}
