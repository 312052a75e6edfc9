//! Priority-queue ordering for pending transactions.

use std::cmp::Ordering;

use bt2c_crypto::Hash;
use bt2c_ledger::Amount;

/// A transaction reference ordered for block-selection priority:
/// descending fee, then ascending timestamp, then ascending hash (the
/// contract's full tie-break chain, so selection is deterministic
/// across nodes holding the same pool contents).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedTransaction {
    /// Fee offered, higher is higher priority.
    pub fee: Amount,
    /// Submission timestamp, earlier is higher priority on a fee tie.
    pub timestamp: u64,
    /// Transaction hash, the final deterministic tie-breaker.
    pub hash: Hash,
}

impl PricedTransaction {
    /// Build a priority key for `hash`.
    pub fn new(fee: Amount, timestamp: u64, hash: Hash) -> Self {
        Self {
            fee,
            timestamp,
            hash,
        }
    }
}

impl Ord for PricedTransaction {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fee
            .cmp(&self.fee)
            .then_with(|| self.timestamp.cmp(&other.timestamp))
            .then_with(|| self.hash.cmp(&other.hash))
    }
}

impl PartialOrd for PricedTransaction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
