//! Per-opcode validation dispatch (§4.1 steps 2–3, §4.3).
//!
//! [`NamingValidator`] is the sole [`crate::consensus::validator::OpValidator`]
//! implementation: one `match` arm per opcode, delegating to the module that
//! owns that opcode's rules. Keeping each opcode's logic in its own file
//! (rather than one large function) mirrors how the preorder/create/mutate
//! families differ enough in shape that a shared signature would just be
//! noise.

pub mod announce;
pub mod nameimport;
pub mod namespace;
pub mod preorder;
pub mod register;
pub mod revoke;
pub mod transfer;
pub mod update;

use crate::consensus::validator::{CheckOutcome, OpValidator, ValidationContext};
use crate::types::Op;

#[derive(Default)]
pub struct NamingValidator;

impl OpValidator for NamingValidator {
    fn check(&self, op: &Op, ctx: &mut ValidationContext) -> CheckOutcome {
        match op {
            Op::NamePreorder(f) => preorder::check(f, false, &*ctx),
            Op::NamespacePreorder(f) => preorder::check(f, true, &*ctx),
            Op::NameRegistration(f) => register::check_register(f, &*ctx),
            Op::NameRenewal(f) => register::check_renewal(f, &*ctx),
            Op::NameUpdate(f) => update::check(f, &*ctx),
            Op::NameTransfer(f) => transfer::check(f, &*ctx),
            Op::NameRevoke(f) => revoke::check(f, &*ctx),
            Op::NameImport(f) => nameimport::check(f, ctx),
            Op::NamespaceReveal(f) => namespace::check_reveal(f, &*ctx),
            Op::NamespaceReady(f) => namespace::check_ready(f, &*ctx),
            Op::Announce(f) => announce::check(f, &*ctx),
        }
    }
}
