//! The two disjoint error families used throughout the engine (`SPEC_FULL`
//! §B): [`RejectReason`] for ordinary per-op validation failures, and
//! [`FatalError`] for the invariant violations that `spec.md` §7 says must
//! abort the process.

use std::fmt;

use crate::types::Opcode;

/// Why a single operation was rejected during validation. Never stops
/// block processing: the engine logs this at `debug` and moves to the next
/// candidate op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// No matching live preorder for this creation op's computed
    /// preorder hash.
    NoMatchingPreorder,
    /// A preorder already exists for this hash and has not yet expired.
    PreorderAlreadyLive,
    /// The creation/transition op arrived after its deadline window.
    DeadlineExpired { opcode: Opcode, deadline_block: u64 },
    /// The name/namespace this op targets does not exist.
    UnknownSubject,
    /// The namespace has not yet completed `NAMESPACE_READY`.
    NamespaceNotReady,
    /// The sender is not the name's current owner.
    NotOwner,
    /// The embedded `name_consensus_hash` does not match any consensus
    /// hash within the valid transaction window (§4.4).
    StaleConsensusHash,
    /// The name has been revoked and accepts no further operations.
    NameRevoked,
    /// The name has expired past its grace period.
    NameExpired,
    /// The namespace/name already exists (duplicate creation attempt).
    AlreadyExists,
    /// Malformed or out-of-range field value.
    MalformedField { field: &'static str },
    /// The op lost a same-block collision (another op claimed the same
    /// history key first).
    Collided,
    /// Catch-all for an opcode-specific condition not covered above.
    Other(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NoMatchingPreorder => write!(f, "no matching live preorder"),
            RejectReason::PreorderAlreadyLive => write!(f, "preorder hash already live"),
            RejectReason::DeadlineExpired { opcode, deadline_block } => {
                write!(f, "{opcode} arrived past its deadline at block {deadline_block}")
            }
            RejectReason::UnknownSubject => write!(f, "unknown name or namespace"),
            RejectReason::NamespaceNotReady => write!(f, "namespace is not ready"),
            RejectReason::NotOwner => write!(f, "sender is not the current owner"),
            RejectReason::StaleConsensusHash => {
                write!(f, "embedded consensus hash is outside the valid transaction window")
            }
            RejectReason::NameRevoked => write!(f, "name has been revoked"),
            RejectReason::NameExpired => write!(f, "name has expired past its grace period"),
            RejectReason::AlreadyExists => write!(f, "name or namespace already exists"),
            RejectReason::MalformedField { field } => write!(f, "malformed field '{field}'"),
            RejectReason::Collided => write!(f, "lost an in-block collision"),
            RejectReason::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for RejectReason {}

/// An invariant violation serious enough that §7 requires the process to
/// abort rather than continue with possibly-corrupted consensus state.
#[derive(Debug)]
pub enum FatalError {
    /// `op_check`'s type-cast loop re-interpreted an op's opcode more than
    /// once (§4.1.c caps this at one rewrite).
    MultipleTypeCasts { opcode: Opcode },
    /// The dispatch table for an opcode is missing a required consensus or
    /// mutate field (`static_assert_op_table`, `SPEC_FULL` §E).
    OpTableInvariantViolated { opcode: Opcode, detail: &'static str },
    /// The store was asked to commit while not holding write disposition
    /// (§5's single-writer assertion).
    WriteWithoutDisposition,
    /// An opcode reached commit dispatch with no recognized commit
    /// category — a bug in the validator, not a consensus-data problem.
    UnknownCommitCategory { opcode: Opcode },
    /// The append-only consensus snapshot file could not be extended.
    SnapshotWriteFailed { block_number: u64, detail: String },
    /// The underlying store returned an error while committing already-
    /// accepted state (corruption or I/O failure, not validation).
    StoreCorrupted { detail: String },
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalError::MultipleTypeCasts { opcode } => {
                write!(f, "multiple opcode type-casts detected starting from {opcode}")
            }
            FatalError::OpTableInvariantViolated { opcode, detail } => {
                write!(f, "op dispatch table invariant violated for {opcode}: {detail}")
            }
            FatalError::WriteWithoutDisposition => {
                write!(f, "attempted to commit state without write disposition")
            }
            FatalError::UnknownCommitCategory { opcode } => {
                write!(f, "{opcode} has no known commit category")
            }
            FatalError::SnapshotWriteFailed { block_number, detail } => {
                write!(f, "failed to append consensus snapshot for block {block_number}: {detail}")
            }
            FatalError::StoreCorrupted { detail } => write!(f, "store corrupted: {detail}"),
        }
    }
}

impl std::error::Error for FatalError {}
