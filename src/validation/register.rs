//! `NAME_REGISTRATION` / `NAME_RENEWAL` validation (§4.1.c, §4.3).
//!
//! `check_register` is where the one legal type-cast happens: a
//! registration for a name already actively owned by its own sender isn't
//! a land-grab attempt, it's a renewal, and gets reinterpreted as one
//! rather than rejected outright.

use crate::consensus::error::RejectReason;
use crate::consensus::validator::{CheckOutcome, ValidationContext};
use crate::epoch::is_valid_name;
use crate::types::op::NameCreateFields;
use crate::types::{Address, Opcode, PreorderHash};

pub fn check_register(f: &NameCreateFields, ctx: &ValidationContext) -> CheckOutcome {
    if !is_valid_name(&f.name) {
        return CheckOutcome::Reject(RejectReason::MalformedField { field: "name" });
    }
    let (_, namespace_id) = f.name.rsplit_once('.').expect("is_valid_name guarantees a dot");

    let Some(namespace) = ctx.store.get_namespace(namespace_id) else {
        return CheckOutcome::Reject(RejectReason::UnknownSubject);
    };
    if !namespace.accepts_name_operations() {
        return CheckOutcome::Reject(RejectReason::NamespaceNotReady);
    }

    let epoch = ctx.epoch.rules_at(ctx.block_number);
    if let Some(existing) = ctx.store.get_name_raw(&f.name) {
        let expired = existing.is_expired_at(&namespace, epoch, ctx.block_number);
        let in_grace = existing.is_in_grace_at(&namespace, epoch, ctx.block_number);
        // An expired name still blocks fresh registration for the rest of
        // its grace period, so nobody can snipe it the instant it lapses.
        if existing.is_active() && (!expired || in_grace) {
            if !expired && existing.owner_address == f.recipient_address {
                return CheckOutcome::Reinterpret(Opcode::NameRenewal);
            }
            return CheckOutcome::Reject(RejectReason::AlreadyExists);
        }
        // A revoked name, or one expired past its grace period, falls
        // through to the normal preorder-matched registration path below.
    }

    let preorder_hash = PreorderHash::compute(
        &f.name,
        &f.sender,
        &f.recipient_address,
        Some(&f.burn_address),
        f.token_fee,
    );
    let deadline = ctx.epoch.rules_at(ctx.block_number).preorder_deadline_blocks;
    match ctx.store.get_preorder(&preorder_hash) {
        Some(preorder) if preorder.is_live(ctx.block_number, deadline) => CheckOutcome::Accept,
        _ => CheckOutcome::Reject(RejectReason::NoMatchingPreorder),
    }
}

pub fn check_renewal(f: &NameCreateFields, ctx: &ValidationContext) -> CheckOutcome {
    let sender_address = Address::from_script(&f.sender);
    let Some(existing) = ctx.store.get_name_raw(&f.name) else {
        return CheckOutcome::Reject(RejectReason::UnknownSubject);
    };
    if !existing.is_active() {
        return CheckOutcome::Reject(RejectReason::NameRevoked);
    }
    let Some((_, namespace_id)) = f.name.rsplit_once('.') else {
        return CheckOutcome::Reject(RejectReason::MalformedField { field: "name" });
    };
    let Some(namespace) = ctx.store.get_namespace(namespace_id) else {
        return CheckOutcome::Reject(RejectReason::UnknownSubject);
    };
    let epoch = ctx.epoch.rules_at(ctx.block_number);
    if existing.is_expired_at(&namespace, epoch, ctx.block_number) {
        return CheckOutcome::Reject(RejectReason::NameExpired);
    }
    if existing.owner_address == f.recipient_address || existing.owner_address == sender_address {
        CheckOutcome::Accept
    } else {
        CheckOutcome::Reject(RejectReason::NotOwner)
    }
}
