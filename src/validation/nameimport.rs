//! `NAME_IMPORT` validation (§4.3, §4.6).
//!
//! Imports bypass preorder/collision entirely: the only gate is that the
//! sender is a member of the namespace's derived import keychain, and that
//! the namespace hasn't gone `NAMESPACE_READY` yet (imports are a
//! pre-launch bulk-migration mechanism, not an ongoing registration path).

use crate::consensus::error::RejectReason;
use crate::consensus::validator::{CheckOutcome, ValidationContext};
use crate::types::op::NameImportFields;
use crate::types::Address;

pub fn check(f: &NameImportFields, ctx: &mut ValidationContext) -> CheckOutcome {
    let (_, namespace_id) = match f.name.rsplit_once('.') {
        Some(parts) => parts,
        None => return CheckOutcome::Reject(RejectReason::MalformedField { field: "name" }),
    };

    let Some(namespace) = ctx.store.get_namespace(namespace_id) else {
        return CheckOutcome::Reject(RejectReason::UnknownSubject);
    };
    if namespace.is_ready() {
        return CheckOutcome::Reject(RejectReason::NamespaceNotReady);
    }

    let sender_address = Address::from_script(&f.sender);
    let keychain = ctx.keychains.get_or_derive(namespace_id, &namespace.reveal_address);
    if !keychain.authorizes(&sender_address) {
        return CheckOutcome::Reject(RejectReason::NotOwner);
    }

    if ctx.store.get_name_raw(&f.name).is_some() {
        return CheckOutcome::Reject(RejectReason::AlreadyExists);
    }

    CheckOutcome::Accept
}
