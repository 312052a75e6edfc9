//! A producer embedding a second, self- or colluder-addressed
//! `Reward` transaction alongside the one the block-production path
//! itself constructs must be rejected outright, not merely have the
//! extra credit ignored — otherwise any legitimately selected
//! producer could mint currency outside the halving schedule.

#[cfg(test)]
mod tests {
    use bt2c_applier::{ApplierError, MempoolPort};
    use bt2c_crypto::Address;
    use bt2c_ledger::{Amount, Block};
    use bt2c_state::issuance;

    use crate::support;

    struct NoopMempool;
    impl MempoolPort for NoopMempool {
        fn purge_sealed(&mut self, _block: &Block) {}
    }

    #[test]
    fn block_with_a_spurious_extra_reward_transaction_is_rejected() {
        let (chain, mut applier) = support::bootstrap();
        let mut mempool = NoopMempool;
        let ctx = support::apply_ctx();

        let reward = issuance::block_reward(1, support::BLOCK_TIME_SECS, support::HALVING_SECONDS);
        let colluder = Address::from_bytes([0xDE; 20]);
        let timestamp = support::GENESIS_TIMESTAMP + support::BLOCK_TIME_SECS;

        // `produce_block` appends the legitimate system credit on top
        // of whatever `extra_txs` the caller supplies; a second Reward
        // transaction here is exactly the colluding-producer attack.
        let block = support::produce_block(
            &chain.developer,
            1,
            chain.genesis.hash,
            timestamp,
            vec![support::reward_tx(colluder, Amount::from_whole(1_000), timestamp)],
            reward,
        );

        let err = applier.submit_block(block, &ctx, &mut mempool).unwrap_err();
        assert!(matches!(
            err,
            ApplierError::Validation(bt2c_applier::ValidationError::UnauthorizedSystemCredit)
        ));
        assert_eq!(applier.committed_tip().unwrap().1, 0);
        assert_eq!(bt2c_state::StateMachine::new(chain.store.clone()).get_balance(&colluder).unwrap(), Amount::ZERO);
    }
}
