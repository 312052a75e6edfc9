//! Scenario 2: fund one address, submit two transactions that
//! together would overdraw it, and confirm the mempool admits only
//! the first.

#[cfg(test)]
mod tests {
    use bt2c_consensus::StoreStateProvider;
    use bt2c_crypto::{Address, KeyPair};
    use bt2c_ledger::{Account, Amount};
    use bt2c_mempool::{AdmitError, Mempool, NoopLimiter};
    use bt2c_state::{Diff, StateMachine};

    use crate::support;

    #[test]
    fn second_conflicting_spend_is_rejected_with_sender_pending_cap() {
        let store = std::sync::Arc::new(bt2c_store::InMemoryStore::new());
        let sender = KeyPair::generate();

        let machine = StateMachine::new(store.clone());
        let mut funded = Account::new(sender.address());
        funded.balance = Amount::from_whole(10);
        let mut seed = Diff::default();
        seed.accounts.insert(sender.address(), funded);
        machine.commit(&seed).unwrap();

        let mut mempool = Mempool::new(StoreStateProvider::new(store.clone()), NoopLimiter);

        let recipient_b = Address::from_bytes([0xB0; 20]);
        let recipient_c = Address::from_bytes([0xC0; 20]);
        let fee = Amount::from_units(100_000); // 0.001 BT2C

        let first = support::transfer_tx(&sender, recipient_b, 0, Amount::from_whole(9), fee, 2_000);
        mempool.admit(first, 2_000).unwrap();
        assert_eq!(mempool.len(), 1);

        let second = support::transfer_tx(&sender, recipient_c, 1, Amount::from_whole(9), fee, 2_000);
        let err = mempool.admit(second, 2_000).unwrap_err();
        assert!(matches!(err, AdmitError::SenderPendingCap { sender: s } if s == sender.address()));
        assert_eq!(mempool.len(), 1);
    }
}
