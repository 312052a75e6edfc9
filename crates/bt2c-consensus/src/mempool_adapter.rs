//! Bridges `bt2c_mempool::Mempool<S, R>` to `bt2c_applier::MempoolPort`.
//!
//! Neither type is local to this crate, so the impl can live in
//! neither `bt2c-mempool` (that would add a new, architecturally
//! backward mempool → applier dependency edge purely to satisfy a
//! marker trait) nor `bt2c-applier` (the orphan rule forbids it, since
//! `Mempool` isn't local there either). A local newtype wrapper is the
//! standard way around both.

use std::ops::{Deref, DerefMut};

use bt2c_applier::MempoolPort;
use bt2c_ledger::Block;
use bt2c_mempool::{Mempool, RateLimiter, StateProvider};

/// Wraps a `Mempool<S, R>` so it can be passed to
/// `Applier::submit_block`.
pub struct MempoolAdapter<S, R>(pub Mempool<S, R>);

impl<S, R> MempoolAdapter<S, R> {
    /// Wrap `pool`.
    pub fn new(pool: Mempool<S, R>) -> Self {
        Self(pool)
    }

    /// Unwrap back into the underlying pool.
    pub fn into_inner(self) -> Mempool<S, R> {
        self.0
    }
}

impl<S: StateProvider, R: RateLimiter> MempoolPort for MempoolAdapter<S, R> {
    fn purge_sealed(&mut self, block: &Block) {
        self.0.purge_sealed(block);
    }
}

impl<S, R> Deref for MempoolAdapter<S, R> {
    type Target = Mempool<S, R>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, R> DerefMut for MempoolAdapter<S, R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bt2c_crypto::{Address, KeyPair};
    use bt2c_ledger::transaction::Nonce;
    use bt2c_ledger::{Amount, Transaction, TransactionType};
    use bt2c_mempool::NoopLimiter;
    use bt2c_state::issuance;

    struct FixtureState;
    impl StateProvider for FixtureState {
        fn balance(&self, _address: &Address) -> Amount {
            Amount::from_whole(1_000)
        }
        fn min_fee(&self, pending_count: usize) -> Amount {
            issuance::min_fee(pending_count as u64)
        }
    }

    #[test]
    fn purge_sealed_forwards_to_the_wrapped_pool() {
        let kp = KeyPair::generate();
        let recipient = Address::from_bytes([9u8; 20]);
        let mut tx = Transaction {
            kind: TransactionType::Transfer,
            sender: kp.address(),
            recipient,
            amount: Amount::from_whole(1),
            fee: Amount::from_units(10_000),
            nonce: Nonce::Sequential(0),
            timestamp: 1_000,
            payload: vec![],
            sender_public_key: Some(kp.public_key()),
            signature: None,
        };
        tx.signature = Some(kp.sign(&tx.hash()));

        let mut adapter = MempoolAdapter::new(Mempool::new(FixtureState, NoopLimiter));
        adapter.admit(tx.clone(), 1_000).unwrap();
        assert_eq!(adapter.len(), 1);

        let block = bt2c_ledger::Block {
            height: 1,
            previous_hash: [0u8; 32],
            timestamp: 1_000,
            validator: recipient,
            transactions: vec![tx],
            merkle_root: [0u8; 32],
            reward: Amount::ZERO,
            signature: None,
            hash: [0u8; 32],
        };
        MempoolPort::purge_sealed(&mut adapter, &block);
        assert!(adapter.is_empty());
    }
}
