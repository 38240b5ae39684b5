//! Op parser and extractor (§4.2).
//!
//! `parse_marker` recognizes the `MAGIC_BYTES || opcode_byte || payload`
//! framing of a transaction's data output; `extract` decodes the
//! opcode-specific payload into a typed [`Op`], filling in the
//! transaction-context fields (`txid`, `vtxindex`, `block_number`) that
//! the wire payload itself does not carry.

use bincode::serde::decode_from_slice;
use serde::de::DeserializeOwned;

use crate::block_source::RawTx;
use crate::consensus::error::RejectReason;
use crate::types::op::*;
use crate::types::opcode::MAGIC_BYTES;
use crate::types::{Op, Opcode};

fn bincode_config() -> impl bincode::config::Config {
    bincode::config::standard()
}

/// Strips `MAGIC_BYTES` and the opcode byte from a data output, returning
/// the resolved opcode and the remaining payload. `None` if the output
/// isn't a recognized naming-layer marker at all (an ordinary payment or
/// an unrelated protocol's marker) — this is not a rejection, just "not
/// one of ours", so the caller skips the transaction silently.
pub fn parse_marker(data: &[u8]) -> Option<(Opcode, &[u8])> {
    let (magic, rest) = data.split_at_checked(MAGIC_BYTES.len())?;
    if magic != MAGIC_BYTES {
        return None;
    }
    let (&tag, payload) = rest.split_first()?;
    let opcode = Opcode::from_byte_tag(tag)?;
    Some((opcode, payload))
}

fn decode_payload<T: DeserializeOwned>(payload: &[u8]) -> Result<T, RejectReason> {
    decode_from_slice(payload, bincode_config())
        .map(|(value, _)| value)
        .map_err(|_| RejectReason::MalformedField { field: "payload" })
}

/// Decodes `payload` into opcode `opcode`'s field struct, then overwrites
/// the struct's `meta` with the real transaction context (a sender cannot
/// know its own `vtxindex`/`block_number` ahead of confirmation, so those
/// are never trusted from the wire).
pub fn extract(opcode: Opcode, payload: &[u8], tx: &RawTx, block_number: u64) -> Result<Op, RejectReason> {
    let meta = OpMeta {
        txid: tx.txid.clone(),
        vtxindex: tx.vtxindex,
        block_number,
    };

    let op = match opcode {
        Opcode::NamePreorder => {
            let mut f: PreorderFields = decode_payload(payload)?;
            f.meta = meta;
            Op::NamePreorder(f)
        }
        Opcode::NamespacePreorder => {
            let mut f: PreorderFields = decode_payload(payload)?;
            f.meta = meta;
            Op::NamespacePreorder(f)
        }
        // A wire transaction is always extracted as NAME_REGISTRATION; the
        // register → renewal type-cast happens inside validation, never
        // here (§4.1.c).
        Opcode::NameRegistration | Opcode::NameRenewal => {
            let mut f: NameCreateFields = decode_payload(payload)?;
            f.meta = meta;
            Op::NameRegistration(f)
        }
        Opcode::NameUpdate => {
            let mut f: NameUpdateFields = decode_payload(payload)?;
            f.meta = meta;
            Op::NameUpdate(f)
        }
        Opcode::NameTransfer => {
            let mut f: NameTransferFields = decode_payload(payload)?;
            f.meta = meta;
            Op::NameTransfer(f)
        }
        Opcode::NameRevoke => {
            let mut f: NameRevokeFields = decode_payload(payload)?;
            f.meta = meta;
            Op::NameRevoke(f)
        }
        Opcode::NameImport => {
            let mut f: NameImportFields = decode_payload(payload)?;
            f.meta = meta;
            Op::NameImport(f)
        }
        Opcode::NamespaceReveal => {
            let mut f: NamespaceRevealFields = decode_payload(payload)?;
            f.meta = meta;
            Op::NamespaceReveal(f)
        }
        Opcode::NamespaceReady => {
            let mut f: NamespaceReadyFields = decode_payload(payload)?;
            f.meta = meta;
            Op::NamespaceReady(f)
        }
        Opcode::Announce => {
            let mut f: AnnounceFields = decode_payload(payload)?;
            f.meta = meta;
            Op::Announce(f)
        }
    };

    Ok(op)
}

/// Parses and extracts every recognizable op from a block's transactions,
/// in on-chain order, skipping non-marker transactions and logging
/// malformed markers at `debug` without aborting the block.
pub fn extract_ops_from_block(txs: &[RawTx], block_number: u64) -> Vec<Op> {
    let mut ops = Vec::new();
    for tx in txs {
        let Some(data) = tx.data.as_deref() else { continue };
        let Some((opcode, payload)) = parse_marker(data) else { continue };
        match extract(opcode, payload, tx, block_number) {
            Ok(op) => ops.push(op),
            Err(reason) => {
                tracing::debug!(txid = %tx.txid, %opcode, %reason, "failed to extract op");
            }
        }
    }
    ops
}
