//! State-machine error taxonomy, mirroring the malformed/replay/
//! insufficient/stale-or-future/fatal categories.

use bt2c_crypto::Address;
use bt2c_ledger::LedgerError;
use thiserror::Error;

/// Errors raised while applying a block or transaction to ledger
/// state. None of these should ever panic in production code; every
/// rejection is a typed variant the caller can log or act on.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// A transaction's signature did not verify.
    #[error("bad signature for transaction {tx_hash:?}")]
    BadSignature {
        /// Hash of the offending transaction.
        tx_hash: bt2c_crypto::Hash,
    },

    /// A transaction's `nonce` had already been observed for this
    /// sender.
    #[error("replayed nonce for sender {sender}")]
    ReplayedNonce {
        /// The sender address.
        sender: Address,
    },

    /// A transaction's sequential nonce skipped ahead of the
    /// account's `next_nonce`.
    #[error("nonce gap for sender {sender}: expected {expected}, got {actual}")]
    NonceGap {
        /// The sender address.
        sender: Address,
        /// The account's expected next nonce.
        expected: u64,
        /// The nonce actually supplied.
        actual: u64,
    },

    /// A sender's balance was too low to cover `amount + fee`.
    #[error("insufficient balance for {sender}: required {required}, available {available}")]
    InsufficientBalance {
        /// The sender address.
        sender: Address,
        /// Amount plus fee required.
        required: bt2c_ledger::Amount,
        /// Balance actually available.
        available: bt2c_ledger::Amount,
    },

    /// An unstake request exceeded the validator's current stake.
    #[error("insufficient stake for {validator}: requested {requested}, available {available}")]
    InsufficientStake {
        /// The validator address.
        validator: Address,
        /// Stake requested for withdrawal.
        requested: bt2c_ledger::Amount,
        /// Stake actually held.
        available: bt2c_ledger::Amount,
    },

    /// An unstake transaction named a validator with no registry
    /// entry.
    #[error("unknown validator {0}")]
    UnknownValidator(Address),

    /// A `Reward`/`Genesis` transaction appeared outside the
    /// block-production path (e.g. was admitted from the mempool).
    #[error("system-credit transaction outside block production")]
    UnauthorizedSystemCredit,

    /// Applying this block's rewards would exceed `MAX_SUPPLY`.
    #[error("issuance would exceed max supply")]
    SupplyExceeded,

    /// A pure ledger-model invariant was violated (amount overflow,
    /// hash/merkle mismatch already caught upstream but surfaced here
    /// too for defense in depth).
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The underlying store failed to answer a read needed mid-apply.
    #[error(transparent)]
    Store(#[from] bt2c_store::StoreError),
}

impl ApplyError {
    /// True for categories the caller should treat as a disqualifying,
    /// non-retriable rejection of the block/transaction (as opposed to
    /// a transient store error, which this crate never produces).
    pub fn is_fatal(&self) -> bool {
        matches!(self, ApplyError::SupplyExceeded)
    }
}
