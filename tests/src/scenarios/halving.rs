//! Scenario 4: at `HALVING_SECONDS = 10 * BLOCK_TIME_SECS`, the block
//! reward halves exactly between block 10 and block 11.

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
    fn reward_halves_between_block_ten_and_eleven() {
        let (chain, mut applier) = support::bootstrap();
        let machine = StateMachine::new(chain.store.clone());
        let mut mempool = NoopMempool;
        let ctx = support::apply_ctx();

        let mut previous_hash = chain.genesis.hash;
        let mut total_reward = Amount::ZERO;

        for height in 1..=21u64 {
            let reward = issuance::block_reward(height, support::BLOCK_TIME_SECS, support::HALVING_SECONDS);
            if height <= 9 {
                assert_eq!(reward, Amount::from_whole(21), "height {height} should still pay the full reward");
            } else if height == 10 {
                assert_eq!(reward, Amount::from_units(21 * 100_000_000 / 2), "height 10 is the first halved reward");
            }

            let timestamp = support::GENESIS_TIMESTAMP + height * support::BLOCK_TIME_SECS;
            let block = support::produce_block(&chain.developer, height, previous_hash, timestamp, vec![], reward);
            let outcome = applier.submit_block(block.clone(), &ctx, &mut mempool).unwrap();
            assert!(matches!(outcome, ApplyOutcome::Committed { height: h } if h == height));

            previous_hash = block.hash;
            total_reward = total_reward.checked_add(reward).unwrap();
        }

        assert_eq!(applier.committed_tip().unwrap().1, 21);
        assert_eq!(
            machine.get_stake(&chain.developer.address()).unwrap(),
            Amount::from_whole(1001).checked_add(total_reward).unwrap()
        );
    }
}
