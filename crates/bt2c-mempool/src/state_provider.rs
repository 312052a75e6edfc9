//! Outbound port onto ledger state: the mempool never reads `Store`
//! directly, only through this narrow interface (grounded on the
//! teacher's `StateProvider` port), so it can be unit-tested without a
//! real state machine.

use bt2c_crypto::Address;
use bt2c_ledger::Amount;

/// Balance/nonce lookups the mempool needs for admission checks.
pub trait StateProvider: Send + Sync {
    /// Current spendable balance of `address` (zero if never credited).
    fn balance(&self, address: &Address) -> Amount;

    /// Minimum dynamic fee currently required, per the issuance rule
    /// `BASE_FEE * (1 + pending_count/100)`.
    fn min_fee(&self, pending_count: usize) -> Amount;
}
