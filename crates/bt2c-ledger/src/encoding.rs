//! Canonical byte encodings used to compute transaction and block
//! hashes.
//!
//! Both encoders are deliberately simple, fixed-field layouts (no
//! varints, no field tags) so that any two implementations of this
//! format hash identically. Length-prefixed fields use a 4-byte
//! big-endian length prefix.

use bt2c_crypto::{hash, Hash};

use crate::block::Block;
use crate::transaction::Transaction;

fn push_length_prefixed(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    buf.extend_from_slice(bytes);
}

/// Canonical byte layout of a transaction, excluding its signature:
///
/// `kind(1B) ‖ sender(20B) ‖ recipient(20B) ‖ amount(8B BE) ‖ fee(8B BE)
/// ‖ nonce(len-prefixed) ‖ timestamp(8B BE) ‖ payload(len-prefixed)`
pub fn tx_bytes(tx: &Transaction) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64 + tx.payload.len());
    buf.push(tx.kind as u8);
    buf.extend_from_slice(tx.sender.as_bytes());
    buf.extend_from_slice(tx.recipient.as_bytes());
    buf.extend_from_slice(&tx.amount.units().to_be_bytes());
    buf.extend_from_slice(&tx.fee.units().to_be_bytes());
    push_length_prefixed(&mut buf, &tx.nonce.to_bytes());
    buf.extend_from_slice(&tx.timestamp.to_be_bytes());
    push_length_prefixed(&mut buf, &tx.payload);
    buf
}

/// A transaction's canonical hash: `SHA3-256(tx_bytes(tx))`.
pub fn tx_hash(tx: &Transaction) -> Hash {
    hash(&tx_bytes(tx))
}

/// Canonical byte layout of a block header (the fields that determine
/// the block's identity; `transactions` are folded in only via
/// `merkle_root`, and `signature`/`hash` are excluded as they are
/// derived from or attached to this layout):
///
/// `height(8B BE) ‖ previous_hash(32B) ‖ timestamp(8B BE) ‖
/// validator(20B) ‖ merkle_root(32B) ‖ reward(8B BE)`
pub fn block_header_bytes(block: &Block) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + 32 + 8 + 20 + 32 + 8);
    buf.extend_from_slice(&block.height.to_be_bytes());
    buf.extend_from_slice(&block.previous_hash);
    buf.extend_from_slice(&block.timestamp.to_be_bytes());
    buf.extend_from_slice(block.validator.as_bytes());
    buf.extend_from_slice(&block.merkle_root);
    buf.extend_from_slice(&block.reward.units().to_be_bytes());
    buf
}

/// A block's canonical hash: `SHA3-256(block_header_bytes(block))`.
pub fn block_hash(block: &Block) -> Hash {
    hash(&block_header_bytes(block))
}
