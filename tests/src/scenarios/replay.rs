//! Scenario 3: a committed transaction resubmitted byte-for-byte in a
//! later block must be rejected, with no effect on state.

#[cfg(test)]
mod tests {
    use bt2c_applier::{ApplierError, ApplyOutcome, MempoolPort};
    use bt2c_crypto::{merkle_root, Address, KeyPair};
    use bt2c_ledger::{Amount, Block, Transaction};
    use bt2c_state::{issuance, ApplyError, StateMachine};

    use crate::support;

    struct NoopMempool;
    impl MempoolPort for NoopMempool {
        fn purge_sealed(&mut self, _block: &Block) {}
    }

    fn block_with_txs(producer: &KeyPair, height: u64, previous_hash: bt2c_crypto::Hash, timestamp: u64, mut txs: Vec<Transaction>, reward: Amount) -> Block {
        txs.push(support::reward_tx(producer.address(), reward, timestamp));
        let leaves: Vec<_> = txs.iter().map(Transaction::hash).collect();
        let root = merkle_root(&leaves);
        let mut block = Block {
            height,
            previous_hash,
            timestamp,
            validator: producer.address(),
            transactions: txs,
            merkle_root: root,
            reward,
            signature: None,
            hash: [0u8; 32],
        };
        block.hash = bt2c_ledger::encoding::block_hash(&block);
        block.signature = Some(producer.sign(&block.hash));
        block
    }

    #[test]
    fn resubmitting_a_committed_transfer_is_rejected_as_a_replay() {
        let (chain, mut applier) = support::bootstrap();
        let machine = StateMachine::new(chain.store.clone());
        let sender = KeyPair::generate();
        let recipient = Address::from_bytes([0xAB; 20]);

        // Give `sender` a spendable balance the same way a prior block
        // would have: a direct commit, bypassing the transfer itself.
        let mut funded = bt2c_ledger::Account::new(sender.address());
        funded.balance = Amount::from_whole(10);
        let mut seed = bt2c_state::Diff::default();
        seed.accounts.insert(sender.address(), funded);
        machine.commit(&seed).unwrap();

        let transfer = support::transfer_tx(&sender, recipient, 0, Amount::from_whole(1), Amount::from_units(10_000), 2_000);

        let reward1 = issuance::block_reward(1, support::BLOCK_TIME_SECS, support::HALVING_SECONDS);
        let block1 = block_with_txs(&chain.developer, 1, chain.genesis.hash, 2_000, vec![transfer.clone()], reward1);

        let mut mempool = NoopMempool;
        let outcome = applier.submit_block(block1.clone(), &support::apply_ctx(), &mut mempool).unwrap();
        assert!(matches!(outcome, ApplyOutcome::Committed { height: 1 }));
        let balance_after_first = machine.get_balance(&recipient).unwrap();
        assert_eq!(balance_after_first, Amount::from_whole(1));

        // Resubmit the identical transaction, byte for byte, in the
        // next block.
        let reward2 = issuance::block_reward(2, support::BLOCK_TIME_SECS, support::HALVING_SECONDS);
        let block2 = block_with_txs(&chain.developer, 2, block1.hash, 2_300, vec![transfer], reward2);

        let err = applier.submit_block(block2, &support::apply_ctx(), &mut mempool).unwrap_err();
        assert!(matches!(err, ApplierError::Apply(ApplyError::ReplayedNonce { sender: s }) if s == sender.address()));

        // No state change: the recipient's balance is exactly what
        // the first (and only successful) transfer left it at.
        assert_eq!(machine.get_balance(&recipient).unwrap(), balance_after_first);
        assert_eq!(applier.committed_tip().unwrap().1, 1);
    }
}
