//! Consensus hashing (§4.1 step 6, §6).
//!
//! `ops_hash = SHA256(canonical bytes of every accepted op, in order)`.
//! `consensus_hash = truncSHA256_128(ops_hash || geometric schedule of
//! prior consensus hashes)`: the hash doesn't just commit to this block's
//! ops, it binds transitively back through history via a sparse,
//! logarithmically-spaced sample of ancestor consensus hashes, so a
//! single hash lets a verifier who holds only a handful of prior hashes
//! detect any divergence in the full history.

use bincode::serde::encode_to_vec;

use crate::types::{ConsensusHash, Op, Sha256Digest};

fn bincode_config() -> impl bincode::config::Config {
    bincode::config::standard()
}

/// Computes the per-block ops-hash from the accepted ops, in commit order.
/// Each op's consensus-field subset is serialized via `bincode` (matching
/// the teacher's `Block::canonical_bytes` approach) and concatenated.
pub fn ops_hash(accepted: &[Op]) -> Sha256Digest {
    let mut buf = Vec::new();
    for op in accepted {
        let encoded = encode_to_vec(op, bincode_config()).expect("Op always encodes");
        buf.extend_from_slice(&encoded);
    }
    Sha256Digest::compute(&buf)
}

/// Block offsets sampled into the consensus hash, growing geometrically
/// (1, 2, 4, 8, ...) back from the current block, capped at `genesis`.
/// Mirrors the "geometric schedule of prior consensus hashes" design
/// named in `spec.md` §6.
pub fn geometric_schedule(current_block: u64, genesis: u64) -> Vec<u64> {
    let mut offsets = Vec::new();
    let mut step = 1u64;
    loop {
        if step > current_block.saturating_sub(genesis) {
            break;
        }
        offsets.push(current_block - step);
        let Some(next) = step.checked_mul(2) else {
            break;
        };
        step = next;
    }
    offsets
}

/// Computes the consensus hash for a block given its ops-hash and the
/// consensus hashes of the blocks named by [`geometric_schedule`] (already
/// resolved by the caller from its snapshot/store).
pub fn consensus_hash(ops_hash: &Sha256Digest, schedule_hashes: &[ConsensusHash]) -> ConsensusHash {
    let mut buf = Vec::new();
    buf.extend_from_slice(ops_hash.as_bytes());
    for ch in schedule_hashes {
        buf.extend_from_slice(ch.as_bytes());
    }
    ConsensusHash::truncated_sha256(&buf)
}

/// The value embedded on-chain by `NAME_UPDATE`/`NAME_TRANSFER` to bind
/// the operation to a specific, recent chain state (§4.4, §6):
/// `truncSHA256_128(name || consensus_hash)`.
pub fn name_consensus_hash(name: &str, consensus_hash: &ConsensusHash) -> ConsensusHash {
    let mut buf = Vec::new();
    buf.extend_from_slice(name.as_bytes());
    buf.extend_from_slice(consensus_hash.as_bytes());
    ConsensusHash::truncated_sha256(&buf)
}
