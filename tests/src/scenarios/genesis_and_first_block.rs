//! Scenario 1: empty state, apply genesis, produce the first ordinary
//! block, and confirm the developer's credited stake and the chain's
//! height.

#[cfg(test)]
mod tests {
    use bt2c_applier::{ApplyOutcome, MempoolPort};
    use bt2c_ledger::{Amount, Block};
    use bt2c_state::{issuance, StateMachine};

    use crate::support;

    struct NoopMempool;
    impl MempoolPort for NoopMempool {
        fn purge_sealed(&mut self, _block: &Block) {}
    }

    #[test]
    fn genesis_credit_then_first_block_reaches_height_one() {
        let (chain, mut applier) = support::bootstrap();
        let machine = StateMachine::new(chain.store.clone());

        assert_eq!(machine.get_balance(&chain.developer.address()).unwrap(), Amount::ZERO);
        assert_eq!(machine.get_stake(&chain.developer.address()).unwrap(), Amount::from_whole(1001));
        assert_eq!(applier.committed_tip().unwrap().1, 0);

        let reward = issuance::block_reward(1, support::BLOCK_TIME_SECS, support::HALVING_SECONDS);
        assert_eq!(reward, Amount::from_whole(21));

        let block1 = support::produce_block(
            &chain.developer,
            1,
            chain.genesis.hash,
            support::GENESIS_TIMESTAMP + support::BLOCK_TIME_SECS,
            vec![],
            reward,
        );

        let mut mempool = NoopMempool;
        let outcome = applier
            .submit_block(block1, &support::apply_ctx(), &mut mempool)
            .unwrap();
        assert!(matches!(outcome, ApplyOutcome::Committed { height: 1 }));

        assert_eq!(applier.committed_tip().unwrap().1, 1);
        assert_eq!(machine.get_balance(&chain.developer.address()).unwrap(), Amount::ZERO);
        assert_eq!(
            machine.get_stake(&chain.developer.address()).unwrap(),
            Amount::from_whole(1001 + 21)
        );
    }
}
