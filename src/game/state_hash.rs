//! Deterministic state hashing for debugging
//!
//! Serializes a snapshot to a canonical JSON value and hashes the string
//! form. The database, registry and logger are not serialized, so two
//! snapshots that compare equal hash equal. Useful for finding exactly
//! which action makes two runs of the same game diverge.

use crate::game::GameState;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Compute a deterministic hash of a game snapshot
///
/// Going through `serde_json::Value` sorts every object by key, which
/// removes any dependence on hash map iteration order.
pub fn compute_state_hash(game: &GameState) -> u64 {
    let canonical = serde_json::to_value(game).and_then(|value| serde_json::to_string(&value));
    let canonical = match canonical {
        Ok(s) => s,
        Err(e) => {
            game.logger
                .internal_error(&format!("Failed to serialize game state for hashing: {e}"));
            return 0;
        }
    };

    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    hasher.finish()
}

/// Format a hash for display (shows first 8 hex digits)
pub fn format_hash(hash: u64) -> String {
    format!("{:08x}", (hash >> 32) as u32)
}
