//! Recent-consensus-hash binding (§4.4).
//!
//! `NAME_UPDATE` and `NAME_TRANSFER` embed `name_consensus_hash(name,
//! consensus_hash)` for some consensus hash within the trailing
//! `valid_tx_window` blocks, rather than the current block's — the sender
//! built the transaction before knowing which block it would land in.
//! Validating the op means brute-forcing that window: try every block's
//! consensus hash as the candidate until one reproduces the embedded
//! value, or the window is exhausted.

use crate::types::ConsensusHash;

use super::hashing::name_consensus_hash;

/// Read-only access to historical consensus hashes, implemented by
/// whatever component owns the snapshot/store (kept as a narrow trait so
/// `validate_binding` doesn't need to know about storage at all).
pub trait ConsensusHashHistory {
    fn consensus_hash_at(&self, block_number: u64) -> Option<ConsensusHash>;
}

/// Searches the trailing `window` blocks before `current_block` (plus
/// `current_block` itself, for ops that land in the same block whose hash
/// they bind to) for a consensus hash that reproduces `embedded` when
/// combined with `name`. Returns the block number it matched, if any.
pub fn validate_binding(
    history: &impl ConsensusHashHistory,
    name: &str,
    embedded: &ConsensusHash,
    current_block: u64,
    window: u64,
) -> Option<u64> {
    let earliest = current_block.saturating_sub(window);
    for candidate_block in (earliest..=current_block).rev() {
        if let Some(candidate_hash) = history.consensus_hash_at(candidate_block) {
            if &name_consensus_hash(name, &candidate_hash) == embedded {
                return Some(candidate_block);
            }
        }
    }
    None
}
