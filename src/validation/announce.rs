//! `ANNOUNCE` validation (§3, §4.3).
//!
//! `ANNOUNCE` mutates no naming state at all: it's a signed pointer to an
//! off-chain message, logged for operators who subscribe to protocol
//! announcements. The only check is that the sender is one of the
//! configured announcers — an open allow-list would let anyone spam the
//! history log under the protocol's name.

use crate::consensus::error::RejectReason;
use crate::consensus::validator::{CheckOutcome, ValidationContext};
use crate::types::op::AnnounceFields;
use crate::types::Address;

pub fn check(f: &AnnounceFields, ctx: &ValidationContext) -> CheckOutcome {
    let sender_address = Address::from_script(&f.sender);
    if ctx.announcers.contains(&sender_address) {
        CheckOutcome::Accept
    } else {
        CheckOutcome::Reject(RejectReason::NotOwner)
    }
}
