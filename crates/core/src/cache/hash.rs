//! Memo cache key generation.

use sha2::{Digest, Sha256};

/// Compute the cache key for one memoized call.
///
/// `args_json` is the serde encoding of the positional argument tuple, so two
/// calls share a key exactly when their arguments are structurally equal.
pub fn compute_cache_key(function: &str, args_json: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(function.as_bytes());
    hasher.update(b"\n");
    hasher.update(args_json.as_bytes());
    hex::encode(hasher.finalize())
}
