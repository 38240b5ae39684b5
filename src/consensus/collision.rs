//! Per-block collision detection (§4.1 step 3, `SPEC_FULL` §E).
//!
//! Grounded on `namedb.py`'s `check_collision_state` /
//! `check_preorder_collision` / `check_name_collision` /
//! `check_namespace_collision`: collisions are scoped to a single block,
//! keyed by `(history_id_key, history_id)`, and never persisted — the
//! scratch set is rebuilt from scratch at the start of every
//! `Engine::process_block` call.

use std::collections::HashMap;

use crate::types::{Op, Opcode};

/// Identifies which namespace of history keys an op's collision check
/// falls into, mirroring the three `history_id_key` strings in the
/// original source (`"preorder_hash"`, `"name"`, `"namespace_id"`).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum CollisionKey {
    PreorderHash(String),
    Name(String),
    NamespaceId(String),
}

impl CollisionKey {
    /// Returns `None` for opcodes exempt from collision checking
    /// (`NAME_IMPORT` and `ANNOUNCE`, per §4.3 — imports bypass the
    /// preorder/collision pipeline entirely, and announcements touch no
    /// shared keyspace).
    pub fn for_op(op: &Op) -> Option<CollisionKey> {
        match op {
            Op::NamePreorder(f) => Some(CollisionKey::PreorderHash(f.preorder_hash.to_hex())),
            Op::NamespacePreorder(f) => Some(CollisionKey::PreorderHash(f.preorder_hash.to_hex())),
            Op::NameRegistration(f) => Some(CollisionKey::Name(f.name.clone())),
            Op::NamespaceReveal(f) => Some(CollisionKey::NamespaceId(f.namespace_id.clone())),
            Op::NameImport(_) | Op::Announce(_) => None,
            Op::NameRenewal(_)
            | Op::NameUpdate(_)
            | Op::NameTransfer(_)
            | Op::NameRevoke(_)
            | Op::NamespaceReady(_) => None,
        }
    }
}

/// One entry in the collision set: the index of the op within the block's
/// checked-ops list and its opcode (for logging).
#[derive(Clone, Copy, Debug)]
struct Claim {
    op_index: usize,
    opcode: Opcode,
}

/// A key's state within the block: either held by exactly one claimant so
/// far, or already poisoned by a prior collision. Once poisoned, a key
/// stays poisoned for the rest of the block — every later claimant on it
/// collides too, not just the pair that first collided.
#[derive(Clone, Copy, Debug)]
enum Entry {
    Claimed(Claim),
    Poisoned,
}

/// Per-block collision scratch space. Dropped at the end of every block.
#[derive(Default)]
pub struct CollisionSet {
    claims: HashMap<CollisionKey, Entry>,
    /// Indices of ops that lost a collision this block, in the order they
    /// were discovered.
    collided: Vec<usize>,
}

impl CollisionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `op_index`'s claim to `key`. If another op already holds
    /// that key this block, both the existing holder and the new claimant
    /// are marked collided and the key is poisoned — every subsequent
    /// claimant on the same key collides too, matching the spec's
    /// "collisions drop all contending ops" rule, not a first-writer-wins
    /// or pairwise-only rule.
    pub fn claim(&mut self, key: CollisionKey, op_index: usize, opcode: Opcode) {
        match self.claims.insert(key.clone(), Entry::Poisoned) {
            Some(Entry::Claimed(existing)) => {
                self.collided.push(existing.op_index);
                self.collided.push(op_index);
                tracing::warn!(
                    history_key = ?key,
                    first_op = existing.op_index,
                    first_opcode = %existing.opcode,
                    second_op = op_index,
                    second_opcode = %opcode,
                    "in-block collision"
                );
            }
            Some(Entry::Poisoned) => {
                self.collided.push(op_index);
                tracing::warn!(
                    history_key = ?key,
                    op = op_index,
                    opcode = %opcode,
                    "in-block collision on already-poisoned key"
                );
            }
            None => {
                self.claims.insert(key, Entry::Claimed(Claim { op_index, opcode }));
            }
        }
    }

    pub fn is_collided(&self, op_index: usize) -> bool {
        self.collided.contains(&op_index)
    }

    pub fn collided_indices(&self) -> &[usize] {
        &self.collided
    }
}
