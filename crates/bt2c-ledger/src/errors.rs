//! Ledger-model error types.
//!
//! These are structural/invariant errors raised while constructing or
//! validating a `Block`/`Transaction` in isolation, before any state-machine
//! application is attempted.

use thiserror::Error;

/// Errors raised by the pure ledger data types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// An amount computation would overflow its representable range.
    #[error("amount overflow")]
    AmountOverflow,

    /// An amount computation would go negative.
    #[error("amount underflow")]
    AmountUnderflow,

    /// A transaction amount was not strictly positive.
    #[error("transaction amount must be > 0")]
    NonPositiveAmount,

    /// A nonce string was shorter than the minimum required length.
    #[error("nonce too short: expected >= {min} bytes, got {actual}")]
    NonceTooShort {
        /// Minimum required nonce length.
        min: usize,
        /// Actual supplied nonce length.
        actual: usize,
    },

    /// A block's `merkle_root` field did not match the recomputed root.
    #[error("merkle root mismatch")]
    MerkleRootMismatch,

    /// A block or transaction's `hash` field did not match the
    /// recomputed hash.
    #[error("hash mismatch")]
    HashMismatch,
}
