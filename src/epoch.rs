//! Epoch-scoped protocol parameters (§6 environment toggles).
//!
//! The naming layer's pricing and lifetime rules are not constant for all
//! time: they are versioned by block-height epoch, the same way Bitcoin's
//! own consensus rules are periodically adjusted by soft fork. `EpochRules`
//! captures one epoch's parameters; `EpochConfig` resolves the rules that
//! apply at a given block height.

use serde::{Deserialize, Serialize};

/// Parameters that apply for the blocks up to (and including) `end_block`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpochRules {
    pub end_block: u64,
    /// Multiplies a namespace's declared `lifetime` to get the number of
    /// blocks a name stays valid after its last renewal.
    pub namespace_lifetime_multiplier: u32,
    /// Blocks past expiry during which the name cannot be registered by
    /// anyone else, but also answers no queries for its old owner.
    pub namespace_lifetime_grace_period: u32,
    /// Max blocks between a `NAME_PREORDER`/`NAMESPACE_PREORDER` and its
    /// matching creation op before the preorder goes stale.
    pub preorder_deadline_blocks: u64,
    /// Max blocks between `NAMESPACE_PREORDER` and `NAMESPACE_REVEAL`.
    pub reveal_deadline_blocks: u64,
    /// Max blocks between `NAMESPACE_REVEAL` and `NAMESPACE_READY`.
    pub ready_deadline_blocks: u64,
}

/// Versioned protocol parameters plus the recent-consensus-hash binding
/// window `W` used by §4.4.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpochConfig {
    /// Ascending by `end_block`; the last entry's `end_block` is treated as
    /// unbounded (applies to every block height past it).
    pub epochs: Vec<EpochRules>,
    /// Number of trailing blocks whose consensus hash an update/transfer
    /// may legally bind against (§4.4).
    pub valid_tx_window: u64,
}

impl EpochConfig {
    /// Resolves the rules in effect at `block_number`.
    pub fn rules_at(&self, block_number: u64) -> &EpochRules {
        self.epochs
            .iter()
            .find(|e| block_number <= e.end_block)
            .unwrap_or_else(|| self.epochs.last().expect("at least one epoch configured"))
    }
}

impl Default for EpochConfig {
    fn default() -> Self {
        Self {
            epochs: vec![
                EpochRules {
                    end_block: 373_601,
                    namespace_lifetime_multiplier: 2,
                    namespace_lifetime_grace_period: 5_000,
                    preorder_deadline_blocks: 144,
                    reveal_deadline_blocks: 52_595,
                    ready_deadline_blocks: 52_595,
                },
                EpochRules {
                    end_block: 451_500,
                    namespace_lifetime_multiplier: 1,
                    namespace_lifetime_grace_period: 5_000,
                    preorder_deadline_blocks: 144,
                    reveal_deadline_blocks: 52_595,
                    ready_deadline_blocks: 52_595,
                },
                EpochRules {
                    end_block: u64::MAX,
                    namespace_lifetime_multiplier: 1,
                    namespace_lifetime_grace_period: 5_000,
                    preorder_deadline_blocks: 144,
                    reveal_deadline_blocks: 52_595,
                    ready_deadline_blocks: 52_595,
                },
            ],
            valid_tx_window: 16,
        }
    }
}

/// Namespace IDs are lowercase alphanumeric plus `-`/`_`, 1 to 19 bytes
/// (§3 Data Model).
pub fn is_valid_namespace_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 19
        && id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

/// Fully-qualified names are `label.namespace_id`, with the label subject
/// to the same character rules and a combined length cap (§3).
pub fn is_valid_name(name: &str) -> bool {
    let Some((label, namespace_id)) = name.rsplit_once('.') else {
        return false;
    };
    if name.len() > 37 || label.is_empty() {
        return false;
    }
    is_valid_namespace_id(namespace_id)
        && label
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_' || b == b'+')
}
