//! Shared fixtures: a tiny test network configuration, a genesis
//! bootstrap helper, and transaction builders, so each scenario module
//! only has to state what differs about its scenario.

use std::sync::Arc;

use bt2c_applier::Applier;
use bt2c_crypto::{Address, Hash, KeyPair};
use bt2c_ledger::transaction::Nonce;
use bt2c_ledger::{Amount, Block, Transaction, TransactionType};
use bt2c_producer::genesis::{bootstrap_genesis, GenesisConfig};
use bt2c_state::ApplyContext;
use bt2c_store::{InMemoryStore, Store};

/// Target seconds between blocks for this test network. Chosen small
/// so halving math stays tractable without exercising huge heights.
pub const BLOCK_TIME_SECS: u64 = 300;
/// Halving period: ten blocks at `BLOCK_TIME_SECS`, matching the
/// contract's own halving-boundary worked example.
pub const HALVING_SECONDS: u64 = 10 * BLOCK_TIME_SECS;
/// Genesis timestamp used throughout; scenario timestamps count up
/// from here.
pub const GENESIS_TIMESTAMP: u64 = 1_000;
/// Length of the post-genesis distribution bonus window.
pub const DISTRIBUTION_DURATION_SECS: u64 = 14 * 86_400;

/// `ApplyContext` for every ordinary (post-genesis) block in these
/// scenarios: the developer reward was already paid out by genesis.
pub fn apply_ctx() -> ApplyContext {
    ApplyContext {
        block_time_secs: BLOCK_TIME_SECS,
        halving_seconds: HALVING_SECONDS,
        genesis_timestamp: GENESIS_TIMESTAMP,
        distribution_duration_secs: DISTRIBUTION_DURATION_SECS,
        developer_reward_already_issued: true,
    }
}

/// A freshly bootstrapped chain: an in-memory `Store`, the developer's
/// key pair (the network's first and, in most scenarios, only
/// validator), and the committed genesis block.
pub struct Chain {
    pub store: Arc<dyn Store>,
    pub developer: KeyPair,
    pub genesis: Block,
}

/// Bootstrap genesis through the real `bt2c_producer::genesis` path,
/// then seed an `Applier`'s in-memory chain view and persist its tip,
/// exactly as `bt2c-node` does on first run.
pub fn bootstrap() -> (Chain, Applier) {
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let developer = KeyPair::generate();
    let cfg = GenesisConfig {
        developer: developer.address(),
        developer_public_key: developer.public_key(),
        timestamp: GENESIS_TIMESTAMP,
        developer_reward: bt2c_state::constants::developer_reward(),
        early_validator_reward: bt2c_state::constants::early_validator_reward(),
    };
    let genesis = bootstrap_genesis(store.clone(), &cfg).expect("genesis bootstrap");

    let mut applier = Applier::new(store.clone());
    applier.seed_genesis(&genesis).expect("seed genesis");

    (
        Chain {
            store,
            developer,
            genesis,
        },
        applier,
    )
}

/// Build (but do not sign) a plain value-transfer transaction.
pub fn transfer_tx(sender: &KeyPair, recipient: Address, nonce: u64, amount: Amount, fee: Amount, timestamp: u64) -> Transaction {
    let mut tx = Transaction {
        kind: TransactionType::Transfer,
        sender: sender.address(),
        recipient,
        amount,
        fee,
        nonce: Nonce::Sequential(nonce),
        timestamp,
        payload: vec![],
        sender_public_key: Some(sender.public_key()),
        signature: None,
    };
    tx.signature = Some(sender.sign(&tx.hash()));
    tx
}

/// Build a signed unstake request transaction.
pub fn unstake_tx(validator: &KeyPair, nonce: u64, amount: Amount, fee: Amount, timestamp: u64) -> Transaction {
    let mut tx = Transaction {
        kind: TransactionType::Unstake,
        sender: validator.address(),
        recipient: validator.address(),
        amount,
        fee,
        nonce: Nonce::Sequential(nonce),
        timestamp,
        payload: vec![],
        sender_public_key: Some(validator.public_key()),
        signature: None,
    };
    tx.signature = Some(validator.sign(&tx.hash()));
    tx
}

/// Build the system `Reward` transaction a block must carry to credit
/// its producer the issuance-schedule amount.
pub fn reward_tx(recipient: Address, amount: Amount, timestamp: u64) -> Transaction {
    Transaction {
        kind: TransactionType::Reward,
        sender: Address::system(),
        recipient,
        amount,
        fee: Amount::ZERO,
        nonce: Nonce::Sequential(0),
        timestamp,
        payload: vec![],
        sender_public_key: None,
        signature: None,
    }
}

/// Assemble, hash, and sign a block at `height` extending
/// `previous_hash`, crediting `producer` the issuance reward for that
/// height on top of whatever `extra_txs` the caller supplies.
pub fn produce_block(
    producer: &KeyPair,
    height: u64,
    previous_hash: Hash,
    timestamp: u64,
    mut extra_txs: Vec<Transaction>,
    reward: Amount,
) -> Block {
    extra_txs.push(reward_tx(producer.address(), reward, timestamp));
    bt2c_producer::BlockProducer::new(clone_keypair_for_test(producer)).produce(
        height,
        previous_hash,
        timestamp,
        extra_txs,
        reward,
    )
}

/// `KeyPair` intentionally isn't `Clone` (it's zeroized on drop), but
/// these fixtures need the same validator identity on both the
/// `Applier`/`Registry` side and the `BlockProducer` side. Reconstruct
/// it deterministically from its seed rather than giving `KeyPair`
/// back a capability production code has no use for.
pub fn clone_keypair_for_test(kp: &KeyPair) -> KeyPair {
    KeyPair::from_seed(&kp.seed_bytes()).expect("seed round-trips")
}
