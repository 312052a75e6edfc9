//! # BT2C State Machine
//!
//! Transitions `(state, block) -> state'`: applies transactions to the
//! account/validator tables, computes block issuance, and enforces
//! nonce/balance invariants. Never talks to Network; talks to Store
//! only through the `bt2c_store::Store` port.

#![warn(missing_docs)]

pub mod constants;
pub mod context;
pub mod diff;
pub mod errors;
pub mod issuance;
pub mod machine;

pub use context::ApplyContext;
pub use diff::Diff;
pub use errors::ApplyError;
pub use machine::StateMachine;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bt2c_crypto::KeyPair;
    use bt2c_ledger::transaction::Nonce;
    use bt2c_ledger::{Amount, Block, Transaction, TransactionType};
    use bt2c_store::InMemoryStore;

    use super::*;

    fn ctx() -> ApplyContext {
        ApplyContext {
            block_time_secs: 300,
            halving_seconds: 126_144_000,
            genesis_timestamp: 1_000,
            distribution_duration_secs: 14 * 86_400,
            developer_reward_already_issued: false,
        }
    }

    fn genesis_block(recipient: bt2c_crypto::Address, amount: Amount) -> Block {
        let tx = Transaction {
            kind: TransactionType::Genesis,
            sender: bt2c_crypto::Address::system(),
            recipient,
            amount,
            fee: Amount::ZERO,
            nonce: Nonce::Sequential(0),
            timestamp: 1_000,
            payload: vec![],
            sender_public_key: None,
            signature: None,
        };
        let leaves = vec![tx.hash()];
        let root = bt2c_crypto::merkle_root(&leaves);
        let mut block = Block {
            height: 0,
            previous_hash: [0u8; 32],
            timestamp: 1_000,
            validator: recipient,
            transactions: vec![tx],
            merkle_root: root,
            reward: Amount::ZERO,
            signature: None,
            hash: [0u8; 32],
        };
        block.hash = bt2c_ledger::encoding::block_hash(&block);
        block
    }

    #[test]
    fn genesis_credit_is_auto_staked() {
        let store: Arc<dyn bt2c_store::Store> = Arc::new(InMemoryStore::new());
        let machine = StateMachine::new(store);
        let kp = KeyPair::generate();
        let block = genesis_block(kp.address(), Amount::from_whole(1001));

        let diff = machine.apply_block(&block, &ctx()).unwrap();
        machine.commit(&diff).unwrap();

        assert_eq!(machine.get_balance(&kp.address()).unwrap(), Amount::ZERO);
        assert_eq!(
            machine.get_stake(&kp.address()).unwrap(),
            Amount::from_whole(1001)
        );
    }

    #[test]
    fn transfer_moves_balance_and_advances_nonce() {
        let store: Arc<dyn bt2c_store::Store> = Arc::new(InMemoryStore::new());
        let machine = StateMachine::new(store);
        let sender_kp = KeyPair::generate();
        let recipient_kp = KeyPair::generate();
        let producer_kp = KeyPair::generate();

        // Seed the sender with a spendable balance directly (bypassing
        // apply_block, which never credits `balance` from a system
        // transaction — only `staked`).
        let mut funded = bt2c_ledger::Account::new(sender_kp.address());
        funded.balance = Amount::from_whole(10);
        let mut seed = Diff::default();
        seed.accounts.insert(sender_kp.address(), funded);
        machine.commit(&seed).unwrap();

        let mut transfer = Transaction {
            kind: TransactionType::Transfer,
            sender: sender_kp.address(),
            recipient: recipient_kp.address(),
            amount: Amount::from_whole(1),
            fee: Amount::from_units(100),
            nonce: Nonce::Sequential(0),
            timestamp: 1_000,
            payload: vec![],
            sender_public_key: Some(sender_kp.public_key()),
            signature: None,
        };
        transfer.signature = Some(sender_kp.sign(&transfer.hash()));

        let mut block = Block {
            height: 1,
            previous_hash: [1u8; 32],
            timestamp: 1_100,
            validator: producer_kp.address(),
            transactions: vec![transfer],
            merkle_root: [0u8; 32],
            reward: Amount::ZERO,
            signature: None,
            hash: [0u8; 32],
        };
        let leaves: Vec<_> = block.transactions.iter().map(Transaction::hash).collect();
        block.merkle_root = bt2c_crypto::merkle_root(&leaves);
        block.hash = bt2c_ledger::encoding::block_hash(&block);

        let diff = machine.apply_block(&block, &ctx()).unwrap();
        machine.commit(&diff).unwrap();

        assert_eq!(
            machine.get_balance(&sender_kp.address()).unwrap(),
            Amount::from_whole(10) - Amount::from_whole(1) - Amount::from_units(100)
        );
        assert_eq!(
            machine.get_balance(&recipient_kp.address()).unwrap(),
            Amount::from_whole(1)
        );
        assert_eq!(
            machine.get_balance(&producer_kp.address()).unwrap(),
            Amount::from_units(100)
        );
        assert_eq!(machine.get_next_nonce(&sender_kp.address()).unwrap(), 1);
    }

    #[test]
    fn replayed_sequential_nonce_is_rejected() {
        let store: Arc<dyn bt2c_store::Store> = Arc::new(InMemoryStore::new());
        let machine = StateMachine::new(store);
        let sender_kp = KeyPair::generate();
        let producer_kp = KeyPair::generate();

        let mut tx = Transaction {
            kind: TransactionType::Transfer,
            sender: sender_kp.address(),
            recipient: producer_kp.address(),
            amount: Amount::from_units(1),
            fee: Amount::ZERO,
            nonce: Nonce::Sequential(0),
            timestamp: 1_000,
            payload: vec![],
            sender_public_key: Some(sender_kp.public_key()),
            signature: None,
        };
        tx.signature = Some(sender_kp.sign(&tx.hash()));

        let mut funded = bt2c_ledger::Account::new(sender_kp.address());
        funded.balance = Amount::from_whole(10);
        let mut seed = Diff::default();
        seed.accounts.insert(sender_kp.address(), funded);
        machine.commit(&seed).unwrap();

        let mut block = Block {
            height: 1,
            previous_hash: [2u8; 32],
            timestamp: 1_100,
            validator: producer_kp.address(),
            transactions: vec![tx.clone(), tx],
            merkle_root: [0u8; 32],
            reward: Amount::ZERO,
            signature: None,
            hash: [0u8; 32],
        };
        let leaves: Vec<_> = block.transactions.iter().map(Transaction::hash).collect();
        block.merkle_root = bt2c_crypto::merkle_root(&leaves);
        block.hash = bt2c_ledger::encoding::block_hash(&block);

        let err = machine.apply_block(&block, &ctx()).unwrap_err();
        assert!(matches!(err, ApplyError::ReplayedNonce { .. }));
    }

    #[test]
    fn unstake_debits_the_account_staked_figure_alongside_validator_stake() {
        let store: Arc<dyn bt2c_store::Store> = Arc::new(InMemoryStore::new());
        let machine = StateMachine::new(store);
        let validator_kp = KeyPair::generate();
        let producer_kp = KeyPair::generate();

        let mut account = bt2c_ledger::Account::new(validator_kp.address());
        account.staked = Amount::from_whole(100);
        let mut validator =
            bt2c_ledger::Validator::new(validator_kp.address(), validator_kp.public_key(), Amount::from_whole(100));
        validator.status = bt2c_ledger::ValidatorStatus::Active;
        let mut seed = Diff::default();
        seed.accounts.insert(validator_kp.address(), account);
        seed.validators.insert(validator_kp.address(), validator);
        machine.commit(&seed).unwrap();

        let mut tx = Transaction {
            kind: TransactionType::Unstake,
            sender: validator_kp.address(),
            recipient: validator_kp.address(),
            amount: Amount::from_whole(40),
            fee: Amount::ZERO,
            nonce: Nonce::Sequential(0),
            timestamp: 1_000,
            payload: vec![],
            sender_public_key: Some(validator_kp.public_key()),
            signature: None,
        };
        tx.signature = Some(validator_kp.sign(&tx.hash()));

        let mut block = Block {
            height: 1,
            previous_hash: [3u8; 32],
            timestamp: 1_100,
            validator: producer_kp.address(),
            transactions: vec![tx],
            merkle_root: [0u8; 32],
            reward: Amount::ZERO,
            signature: None,
            hash: [0u8; 32],
        };
        let leaves: Vec<_> = block.transactions.iter().map(Transaction::hash).collect();
        block.merkle_root = bt2c_crypto::merkle_root(&leaves);
        block.hash = bt2c_ledger::encoding::block_hash(&block);

        let diff = machine.apply_block(&block, &ctx()).unwrap();
        machine.commit(&diff).unwrap();

        assert_eq!(machine.get_stake(&validator_kp.address()).unwrap(), Amount::from_whole(60));
    }

    fn reward_tx(recipient: bt2c_crypto::Address, amount: Amount) -> Transaction {
        Transaction {
            kind: TransactionType::Reward,
            sender: bt2c_crypto::Address::system(),
            recipient,
            amount,
            fee: Amount::ZERO,
            nonce: Nonce::Sequential(0),
            timestamp: 1_100,
            payload: vec![],
            sender_public_key: None,
            signature: None,
        }
    }

    fn reward_block(validator: bt2c_crypto::Address, height: u64, txs: Vec<Transaction>) -> Block {
        let leaves: Vec<_> = txs.iter().map(Transaction::hash).collect();
        let mut block = Block {
            height,
            previous_hash: [1u8; 32],
            timestamp: 1_100,
            validator,
            transactions: txs,
            merkle_root: bt2c_crypto::merkle_root(&leaves),
            reward: Amount::ZERO,
            signature: None,
            hash: [0u8; 32],
        };
        block.hash = bt2c_ledger::encoding::block_hash(&block);
        block
    }

    #[test]
    fn second_reward_transaction_is_rejected_as_unauthorized() {
        let store: Arc<dyn bt2c_store::Store> = Arc::new(InMemoryStore::new());
        let machine = StateMachine::new(store);
        let producer = KeyPair::generate().address();
        let colluder = KeyPair::generate().address();

        let c = ctx();
        let expected = crate::issuance::block_reward(1, c.block_time_secs, c.halving_seconds);

        let block = reward_block(
            producer,
            1,
            vec![reward_tx(producer, expected), reward_tx(colluder, Amount::from_whole(1))],
        );

        let err = machine.apply_block(&block, &c).unwrap_err();
        assert!(matches!(err, ApplyError::UnauthorizedSystemCredit));
    }

    #[test]
    fn reward_transaction_to_a_non_producer_is_rejected() {
        let store: Arc<dyn bt2c_store::Store> = Arc::new(InMemoryStore::new());
        let machine = StateMachine::new(store);
        let producer = KeyPair::generate().address();
        let attacker = KeyPair::generate().address();
        let c = ctx();
        let expected = crate::issuance::block_reward(1, c.block_time_secs, c.halving_seconds);

        let block = reward_block(producer, 1, vec![reward_tx(attacker, expected)]);

        let err = machine.apply_block(&block, &c).unwrap_err();
        assert!(matches!(err, ApplyError::UnauthorizedSystemCredit));
    }

    #[test]
    fn genesis_kind_transaction_outside_the_genesis_block_is_rejected() {
        let store: Arc<dyn bt2c_store::Store> = Arc::new(InMemoryStore::new());
        let machine = StateMachine::new(store);
        let producer = KeyPair::generate().address();
        let c = ctx();

        let tx = Transaction {
            kind: TransactionType::Genesis,
            ..reward_tx(producer, Amount::from_whole(1_000_000))
        };
        let block = reward_block(producer, 1, vec![tx]);

        let err = machine.apply_block(&block, &c).unwrap_err();
        assert!(matches!(err, ApplyError::UnauthorizedSystemCredit));
    }
}
