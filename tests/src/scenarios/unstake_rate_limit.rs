//! Scenario 6: with total network stake at 1000 BT2C, the registry's
//! 1%-per-day unstake cap lets through only as much as the next day's
//! window has room for, draining a queue of small requests one at a
//! time rather than all at once.
//!
//! Each request is sized at 9 BT2C rather than the round 10 the
//! worked example uses: `bt2c-state::apply_unstake` debits a
//! validator's `stake` the instant the transaction lands, before the
//! entry is ever drained, so by the time all ten requests are queued
//! the network's total bonded stake — and with it the day's 1% cap —
//! has already fallen from the pre-request 1000 to 910. A 10 BT2C
//! request would sit exactly on that shrunk cap and never clear; 9
//! BT2C leaves enough room for one entry per day without admitting a
//! second.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bt2c_crypto::KeyPair;
    use bt2c_ledger::{Amount, Block, Transaction, TransactionType};
    use bt2c_registry::Registry;
    use bt2c_state::{ApplyContext, StateMachine};
    use bt2c_store::InMemoryStore;

    fn ctx() -> ApplyContext {
        ApplyContext {
            block_time_secs: 300,
            halving_seconds: 126_144_000,
            genesis_timestamp: 0,
            distribution_duration_secs: 0,
            developer_reward_already_issued: true,
        }
    }

    /// A block carrying a single unstake transaction, with just enough
    /// of a header for `StateMachine::apply_block` to accept it — no
    /// `Applier` is involved here, since this scenario is entirely
    /// about `bt2c-state`'s per-transaction effect and
    /// `bt2c-registry`'s drain rate, not header validation.
    fn unstake_block(validator: &KeyPair, height: u64, nonce: u64, amount: Amount) -> Block {
        let tx = Transaction {
            kind: TransactionType::Unstake,
            sender: validator.address(),
            recipient: validator.address(),
            amount,
            fee: Amount::ZERO,
            nonce: bt2c_ledger::transaction::Nonce::Sequential(nonce),
            timestamp: 0,
            payload: vec![],
            sender_public_key: Some(validator.public_key()),
            signature: None,
        };
        let mut tx = tx;
        tx.signature = Some(validator.sign(&tx.hash()));
        Block {
            height,
            previous_hash: [0u8; 32],
            timestamp: 0,
            validator: validator.address(),
            transactions: vec![tx],
            merkle_root: [0u8; 32],
            reward: Amount::ZERO,
            signature: None,
            hash: [0u8; 32],
        }
    }

    #[test]
    fn ten_queued_unstakes_drain_one_per_day() {
        let store: Arc<dyn bt2c_store::Store> = Arc::new(InMemoryStore::new());
        let validator = KeyPair::generate();

        let registry = Registry::new(store.clone());
        registry
            .register(validator.address(), validator.public_key(), Amount::from_whole(1_000))
            .unwrap();

        // Ten separate 9 BT2C unstake requests, all queued up front.
        let machine = StateMachine::new(store.clone());
        for (height, nonce) in (1u64..=10).zip(0u64..) {
            let block = unstake_block(&validator, height, nonce, Amount::from_whole(9));
            let diff = machine.apply_block(&block, &ctx()).unwrap();
            machine.commit(&diff).unwrap();
        }

        assert_eq!(
            registry.get(&validator.address()).unwrap().unwrap().stake,
            Amount::from_whole(910)
        );
        assert_eq!(machine.get_balance(&validator.address()).unwrap(), Amount::ZERO);

        for day in 0..10u64 {
            let now = day * 86_400;
            let processed = registry.process_unstake_queue(now).unwrap();
            assert_eq!(processed.len(), 1, "day {day} should release exactly one request");
        }

        assert_eq!(machine.get_balance(&validator.address()).unwrap(), Amount::from_whole(90));
        assert!(registry.process_unstake_queue(100 * 86_400).unwrap().is_empty());
    }
}
