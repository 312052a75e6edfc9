//! Thin `Store`-backed adapter satisfying `bt2c_mempool`'s
//! `StateProvider` port, so the mempool keeps no cache of its own and
//! never depends on `bt2c_state::StateMachine` directly.

use std::sync::Arc;

use bt2c_crypto::Address;
use bt2c_ledger::Amount;
use bt2c_mempool::StateProvider;
use bt2c_state::{issuance, StateMachine};
use bt2c_store::Store;

/// Reads balances through a fresh [`StateMachine`] view over the same
/// `Store` the Applier commits into, so admission checks always see
/// the latest committed state.
pub struct StoreStateProvider {
    machine: StateMachine,
}

impl StoreStateProvider {
    /// Build a provider reading from `store`.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            machine: StateMachine::new(store),
        }
    }
}

impl StateProvider for StoreStateProvider {
    fn balance(&self, address: &Address) -> Amount {
        // A decode failure here means corrupt on-disk state, which is
        // a fatal condition the Applier itself will surface on the
        // next commit attempt; admission can only degrade to treating
        // the sender as unfunded rather than propagating an error
        // through a port that has no room for one.
        self.machine.get_balance(address).unwrap_or(Amount::ZERO)
    }

    fn min_fee(&self, pending_count: usize) -> Amount {
        issuance::min_fee(pending_count as u64)
    }
}
