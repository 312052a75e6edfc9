//! Admission-rejection reasons, matching the contract's named `Reason`
//! set one-for-one.

use bt2c_crypto::{Address, Hash};
use bt2c_ledger::Amount;
use thiserror::Error;

/// Why a transaction was refused admission to the pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmitError {
    /// Signature failed to verify against `sender_public_key`.
    #[error("bad signature for transaction {tx_hash:?}")]
    BadSignature {
        /// Hash of the offending transaction.
        tx_hash: Hash,
    },

    /// A sequential nonce at or below the sender's known next nonce.
    #[error("replayed nonce for sender {sender}")]
    ReplayedNonce {
        /// The sender address.
        sender: Address,
    },

    /// `now - tx.timestamp > 24h`.
    #[error("transaction timestamp {timestamp} is stale (now={now})")]
    StaleTimestamp {
        /// The transaction's claimed timestamp.
        timestamp: u64,
        /// The pool's current time.
        now: u64,
    },

    /// `tx.timestamp > now + 300s`.
    #[error("transaction timestamp {timestamp} is in the future (now={now})")]
    FutureTimestamp {
        /// The transaction's claimed timestamp.
        timestamp: u64,
        /// The pool's current time.
        now: u64,
    },

    /// Sender's known balance can't cover `amount + fee`, accounting
    /// for other pending transactions already admitted from them.
    #[error("insufficient balance for {sender}: required {required}, available {available}")]
    InsufficientBalance {
        /// The sender address.
        sender: Address,
        /// Cumulative amount+fee required across pending transactions.
        required: Amount,
        /// Balance known to the pool for this sender.
        available: Amount,
    },

    /// `tx.fee` below the pool's current dynamic minimum fee.
    #[error("fee {fee} below the current minimum {minimum}")]
    InsufficientFee {
        /// The fee actually offered.
        fee: Amount,
        /// The minimum fee currently required.
        minimum: Amount,
    },

    /// A transaction with this hash is already admitted.
    #[error("transaction {0:?} already in mempool")]
    DuplicateInMempool(Hash),

    /// Admitting this transaction would push the sender's pending
    /// `amount + fee` total over their current balance (the
    /// per-sender aggregate cap, guarding against mempool flooding).
    #[error("sender {sender} has reached its pending-balance cap")]
    SenderPendingCap {
        /// The sender address.
        sender: Address,
    },

    /// The sender exceeded the DoS-guard port's admission rate.
    #[error("sender {sender} exceeded the admission rate limit")]
    RateLimited {
        /// The sender address.
        sender: Address,
    },

    /// Reward/Genesis transactions are only ever injected by the block
    /// producer, never admitted from the wire.
    #[error("system-credit transactions cannot be admitted to the mempool")]
    SystemCreditRejected,

    /// A structural defect caught by the ledger model itself (non-
    /// positive amount, malformed nonce shape).
    #[error(transparent)]
    Malformed(#[from] bt2c_ledger::LedgerError),
}
