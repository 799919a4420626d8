//! Per-trial seed derivation.
//!
//! Each Monte Carlo trial gets its own RNG stream derived from the user
//! seed and the run index, so trials are independent, reorderable, and
//! reproducible from a single seed.

use hmac::{Hmac, Mac};
use sha2::Sha256;

const TRIAL_DOMAIN_TAG: &[u8] = b"trial";

/// Derive the RNG seed for one trial from the user seed and run index.
#[must_use]
pub fn derive_trial_seed(user_seed: u64, run_id: u32) -> u64 {
    let mut mac = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes())
        .expect("64-bit seed is valid key");
    mac.update(TRIAL_DOMAIN_TAG);
    mac.update(&run_id.to_le_bytes());
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}
