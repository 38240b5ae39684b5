//! Engine-level resource limits, distinct from the protocol's epoch rules
//! ([`crate::epoch::EpochConfig`]). These are implementation safety
//! valves, not consensus parameters: changing them cannot change which
//! blocks are valid, only how much a single process is willing to hold in
//! memory while processing one.

/// Soft limits applied while parsing a block's raw transactions, before
/// any op reaches validation. Exceeding them does not reject the block —
/// it only bounds how many candidate ops the engine extracts per block,
/// matching the teacher's `max_block_txs`-style safety valve.
#[derive(Clone, Debug)]
pub struct EngineLimits {
    /// Maximum candidate ops extracted from a single block.
    pub max_ops_per_block: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self { max_ops_per_block: 10_000 }
    }
}
