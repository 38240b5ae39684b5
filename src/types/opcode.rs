//! The eleven consensus opcodes and the wire-format marker they are
//! recognized from.
//!
//! Opcode bytes are a stable part of the consensus protocol (§6) and MUST
//! NOT change once assigned.

use serde::{Deserialize, Serialize};

/// 3-byte magic prefix that marks a transaction's data output as carrying
/// a naming-layer operation.
pub const MAGIC_BYTES: [u8; 3] = *b"id#";

/// Every consensus opcode, in the order §4.2 lists them.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    NamePreorder,
    NameRegistration,
    NameRenewal,
    NameUpdate,
    NameTransfer,
    NameRevoke,
    NameImport,
    NamespacePreorder,
    NamespaceReveal,
    NamespaceReady,
    Announce,
}

impl Opcode {
    /// All eleven opcodes, used by static-invariant checks and tests that
    /// must iterate the full table.
    pub const ALL: [Opcode; 11] = [
        Opcode::NamePreorder,
        Opcode::NameRegistration,
        Opcode::NameRenewal,
        Opcode::NameUpdate,
        Opcode::NameTransfer,
        Opcode::NameRevoke,
        Opcode::NameImport,
        Opcode::NamespacePreorder,
        Opcode::NamespaceReveal,
        Opcode::NamespaceReady,
        Opcode::Announce,
    ];

    /// The one-byte opcode tag following [`MAGIC_BYTES`] in the data
    /// output. Stable; never renumber an existing opcode.
    pub const fn byte_tag(self) -> u8 {
        match self {
            Opcode::NamePreorder => 0x3f,
            Opcode::NameRegistration => 0x3a,
            Opcode::NameRenewal => 0x3a, // shares the register byte; disambiguated by state, not wire format
            Opcode::NameUpdate => 0x3d,
            Opcode::NameTransfer => 0x3e,
            Opcode::NameRevoke => 0x7e,
            Opcode::NameImport => 0x3b,
            Opcode::NamespacePreorder => 0x2a,
            Opcode::NamespaceReveal => 0x2c,
            Opcode::NamespaceReady => 0x21,
            Opcode::Announce => 0x23,
        }
    }

    /// Resolves a wire byte tag to an opcode. `NAME_RENEWAL` is never
    /// returned here: the parser always extracts a `NAME_REGISTRATION`
    /// candidate, and the type-cast to renewal happens inside
    /// `check_register` (§4.1.c, §4.3) once the store confirms the
    /// sender already owns the name.
    pub fn from_byte_tag(tag: u8) -> Option<Opcode> {
        Opcode::ALL
            .into_iter()
            .filter(|op| !matches!(op, Opcode::NameRenewal))
            .find(|op| op.byte_tag() == tag)
    }

    /// Human-readable name matching the spec's uppercase identifiers,
    /// used in log lines and the `op` field persisted on records.
    pub const fn as_str(self) -> &'static str {
        match self {
            Opcode::NamePreorder => "NAME_PREORDER",
            Opcode::NameRegistration => "NAME_REGISTRATION",
            Opcode::NameRenewal => "NAME_RENEWAL",
            Opcode::NameUpdate => "NAME_UPDATE",
            Opcode::NameTransfer => "NAME_TRANSFER",
            Opcode::NameRevoke => "NAME_REVOKE",
            Opcode::NameImport => "NAME_IMPORT",
            Opcode::NamespacePreorder => "NAMESPACE_PREORDER",
            Opcode::NamespaceReveal => "NAMESPACE_REVEAL",
            Opcode::NamespaceReady => "NAMESPACE_READY",
            Opcode::Announce => "ANNOUNCE",
        }
    }

    /// `true` for the three opcodes whose commit category is
    /// `state_preorder` (§4.1 step 4).
    pub const fn is_preorder(self) -> bool {
        matches!(self, Opcode::NamePreorder | Opcode::NamespacePreorder)
    }

    /// `true` for opcodes whose commit category is `state_create`: they
    /// insert a brand-new name/namespace record rather than mutating an
    /// existing one.
    pub const fn is_creation(self) -> bool {
        matches!(
            self,
            Opcode::NameRegistration
                | Opcode::NameImport
                | Opcode::NamespaceReveal
        )
    }

    /// `true` for opcodes whose commit category is `state_transition`:
    /// they mutate an existing record and append a history row.
    pub const fn is_transition(self) -> bool {
        matches!(
            self,
            Opcode::NameRenewal
                | Opcode::NameUpdate
                | Opcode::NameTransfer
                | Opcode::NameRevoke
                | Opcode::NamespaceReady
        )
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
