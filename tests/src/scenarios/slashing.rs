//! Scenario 5: a validator signs two conflicting blocks at the same
//! height; the Applier records evidence and the Registry halves its
//! stake and resets its reputation.

#[cfg(test)]
mod tests {
    use bt2c_applier::{ApplyOutcome, MempoolPort};
    use bt2c_ledger::{Block, ValidatorStatus};
    use bt2c_registry::Registry;
    use bt2c_state::issuance;

    use crate::support;

    struct NoopMempool;
    impl MempoolPort for NoopMempool {
        fn purge_sealed(&mut self, _block: &Block) {}
    }

    #[test]
    fn double_signing_at_the_same_height_halves_stake_and_resets_reputation() {
        let (chain, mut applier) = support::bootstrap();
        let registry = Registry::new(chain.store.clone());
        let mut mempool = NoopMempool;
        let ctx = support::apply_ctx();

        let reward1 = issuance::block_reward(1, support::BLOCK_TIME_SECS, support::HALVING_SECONDS);
        let block1 = support::produce_block(
            &chain.developer,
            1,
            chain.genesis.hash,
            support::GENESIS_TIMESTAMP + support::BLOCK_TIME_SECS,
            vec![],
            reward1,
        );
        applier.submit_block(block1.clone(), &ctx, &mut mempool).unwrap();

        let before = registry.get(&chain.developer.address()).unwrap().unwrap();
        assert_eq!(before.reputation, 2.0); // 1.0 at registration + 1 block produced
        let stake_before = before.stake;

        let reward2 = issuance::block_reward(2, support::BLOCK_TIME_SECS, support::HALVING_SECONDS);
        let timestamp2 = support::GENESIS_TIMESTAMP + 2 * support::BLOCK_TIME_SECS;
        let block2a = support::produce_block(&chain.developer, 2, block1.hash, timestamp2, vec![], reward2);
        let outcome = applier.submit_block(block2a.clone(), &ctx, &mut mempool).unwrap();
        assert!(matches!(outcome, ApplyOutcome::Committed { height: 2 }));

        // A second, differently-timestamped block at the same height
        // from the same validator: a conflicting signature over a
        // different header hash.
        let block2b = support::produce_block(&chain.developer, 2, block1.hash, timestamp2 + 1, vec![], reward2);
        assert_ne!(block2a.hash, block2b.hash);
        let evidence_outcome = applier.submit_block(block2b, &ctx, &mut mempool).unwrap();
        let evidence = match evidence_outcome {
            ApplyOutcome::EvidenceRecorded(ev) => ev,
            other => panic!("expected evidence to be recorded, got {other:?}"),
        };
        assert_eq!(evidence.validator, chain.developer.address());

        let after = registry.get(&chain.developer.address()).unwrap().unwrap();
        assert_eq!(after.stake, stake_before.halved());
        assert_eq!(after.reputation, 0.0);
        assert_eq!(after.status, ValidatorStatus::Active);
    }
}
