//! Genesis block construction and bootstrapping.
//!
//! The genesis block credits the developer's `staked` balance with the
//! one-shot `DEVELOPER_REWARD` plus `EARLY_VALIDATOR_REWARD` (see
//! `bt2c_state::constants`) via a single `Genesis`-kind transaction.
//! Because that transaction's effect only touches `Account.staked` —
//! the generic system-credit path never constructs `Validator`
//! records, since `Reward`/`Genesis` transactions have no associated
//! public key on the sender side — [`bootstrap_genesis`] additionally
//! registers the developer as the network's first validator through
//! [`bt2c_registry::Registry`].

use std::sync::Arc;

use bt2c_crypto::{merkle_root, Address, PublicKey};
use bt2c_ledger::transaction::Nonce;
use bt2c_ledger::{Amount, Block, Transaction, TransactionType};
use bt2c_registry::Registry;
use bt2c_state::{ApplyContext, StateMachine};
use bt2c_store::Store;
use tracing::instrument;

use crate::errors::ProducerError;

/// Inputs to genesis block construction.
#[derive(Debug, Clone)]
pub struct GenesisConfig {
    /// Address of the network's first validator.
    pub developer: Address,
    /// Public key backing `developer`, needed to register the
    /// validator record (genesis transactions carry no sender key).
    pub developer_public_key: PublicKey,
    /// Unix timestamp of the genesis block; also the distribution
    /// window's start time.
    pub timestamp: u64,
    /// One-shot developer bonus, in whole BT2C.
    pub developer_reward: Amount,
    /// Early-validator bonus, in whole BT2C, folded into the same
    /// genesis credit since the developer is also the first
    /// registrant.
    pub early_validator_reward: Amount,
}

/// Assemble (but do not apply or sign) the genesis block: a single
/// `Genesis` transaction crediting `cfg.developer`'s staked balance.
pub fn build_genesis(cfg: &GenesisConfig) -> Block {
    let total = cfg
        .developer_reward
        .checked_add(cfg.early_validator_reward)
        .expect("developer + early-validator reward cannot overflow Amount");

    let tx = Transaction {
        kind: TransactionType::Genesis,
        sender: Address::system(),
        recipient: cfg.developer,
        amount: total,
        fee: Amount::ZERO,
        nonce: Nonce::Sequential(0),
        timestamp: cfg.timestamp,
        payload: vec![],
        sender_public_key: None,
        signature: None,
    };

    let leaves = vec![tx.hash()];
    let root = merkle_root(&leaves);
    let mut block = Block {
        height: 0,
        previous_hash: [0u8; 32],
        timestamp: cfg.timestamp,
        validator: cfg.developer,
        transactions: vec![tx],
        merkle_root: root,
        reward: Amount::ZERO,
        signature: None,
        hash: [0u8; 32],
    };
    block.hash = bt2c_ledger::encoding::block_hash(&block);
    block
}

/// Build, apply, commit, and register the genesis validator in one
/// step. The returned block is already written to `store` through
/// `machine` and `registry` shares the same `store` handle.
#[instrument(skip(store), fields(developer = %cfg.developer))]
pub fn bootstrap_genesis(store: Arc<dyn Store>, cfg: &GenesisConfig) -> Result<Block, ProducerError> {
    let block = build_genesis(cfg);

    let machine = StateMachine::new(store.clone());
    let ctx = ApplyContext {
        block_time_secs: 0,
        halving_seconds: 1,
        genesis_timestamp: cfg.timestamp,
        distribution_duration_secs: 0,
        developer_reward_already_issued: false,
    };
    let diff = machine.apply_block(&block, &ctx)?;
    machine.commit(&diff)?;

    let registry = Registry::new(store);
    let initial_stake = cfg.developer_reward.checked_add(cfg.early_validator_reward)?;
    registry.register(cfg.developer, cfg.developer_public_key, initial_stake)?;

    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bt2c_crypto::KeyPair;
    use bt2c_store::InMemoryStore;

    fn cfg(kp: &KeyPair) -> GenesisConfig {
        GenesisConfig {
            developer: kp.address(),
            developer_public_key: kp.public_key(),
            timestamp: 1_000,
            developer_reward: Amount::from_whole(1000),
            early_validator_reward: Amount::from_whole(1),
        }
    }

    #[test]
    fn build_genesis_is_well_formed() {
        let kp = KeyPair::generate();
        let block = build_genesis(&cfg(&kp));
        assert!(block.is_genesis());
        assert!(block.verify_merkle_root().is_ok());
        assert!(block.verify_hash().is_ok());
        assert_eq!(block.transactions[0].amount, Amount::from_whole(1001));
    }

    #[test]
    fn bootstrap_credits_stake_and_registers_validator() {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let kp = KeyPair::generate();
        bootstrap_genesis(store.clone(), &cfg(&kp)).unwrap();

        let machine = StateMachine::new(store.clone());
        assert_eq!(machine.get_balance(&kp.address()).unwrap(), Amount::ZERO);
        assert_eq!(
            machine.get_stake(&kp.address()).unwrap(),
            Amount::from_whole(1001)
        );

        let registry = Registry::new(store);
        let validator = registry.get(&kp.address()).unwrap().expect("registered");
        assert_eq!(validator.stake, Amount::from_whole(1001));
        assert!(validator.is_eligible());
    }
}
