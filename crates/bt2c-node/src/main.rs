//! # BT2C Node
//!
//! The binary entry point: loads configuration, opens (or creates)
//! the Store, bootstraps genesis on a first run, and hands everything
//! to a [`bt2c_consensus::Driver`] until `Ctrl-C` signals a cooperative
//! shutdown.
//!
//! Grounded on the teacher's `node-runtime::main`'s overall shape
//! (load config, initialize logging, construct subsystems, run until
//! signalled), narrowed to the handful of subsystems this contract
//! names instead of its fifteen-subsystem bus architecture.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use bt2c_applier::{genesis_committed, Applier};
use bt2c_config::{init_tracing, CliArgs, ConfigError, NetworkKind, NodeConfig};
use bt2c_consensus::{inbound_channels, shutdown_channel, Context, Driver, NullNetwork, StoreStateProvider};
use bt2c_crypto::KeyPair;
use bt2c_ledger::Block;
use bt2c_mempool::{Mempool, TokenBucketLimiter};
use bt2c_producer::genesis::{bootstrap_genesis, GenesisConfig};
use bt2c_producer::BlockProducer;
use bt2c_state::constants;
use bt2c_store::{columns, InMemoryStore, RocksConfig, RocksStore, Store};
use clap::Parser;
use tracing::info;

/// Admissions per sender per window enforced by the mempool's DoS
/// guard. Not named by the contract; chosen generously enough that a
/// legitimate wallet submitting one transaction per block never trips
/// it at mainnet's 300s block time.
const MEMPOOL_RATE_LIMIT_PER_WINDOW: u32 = 32;
/// Window, in seconds, the rate limiter above measures against.
const MEMPOOL_RATE_LIMIT_WINDOW_SECS: u64 = 60;

fn load_config(args: &CliArgs) -> anyhow::Result<NodeConfig> {
    let loaded = match NodeConfig::load(&args.config) {
        Ok(cfg) => cfg,
        Err(ConfigError::Io { .. }) => {
            info!(path = %args.config.display(), "no config file found, starting from defaults");
            NodeConfig::default()
        }
        Err(err) => return Err(err).context("failed to load node config"),
    };
    Ok(args.apply(loaded))
}

fn open_store(config: &NodeConfig) -> anyhow::Result<Arc<dyn Store>> {
    if config.network_kind == NetworkKind::Devnet {
        info!("devnet: using an in-memory store, no state survives a restart");
        return Ok(Arc::new(InMemoryStore::new()));
    }
    let rocks_config = RocksConfig::new(config.data_dir.display().to_string());
    let store = RocksStore::open(rocks_config).context("failed to open the RocksDB store")?;
    Ok(Arc::new(store))
}

/// Load the validator identity from `path`, generating and persisting
/// a fresh one on first run. The on-disk format is the raw 32-byte
/// Ed25519 seed `KeyPair::from_seed` reconstructs from.
fn load_or_create_keypair(path: &Path) -> anyhow::Result<KeyPair> {
    match std::fs::read(path) {
        Ok(bytes) => KeyPair::from_seed(&bytes).context("validator keypair file is corrupt"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let keypair = KeyPair::generate();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, keypair.seed_bytes())
                .with_context(|| format!("failed to write new validator keypair to {}", path.display()))?;
            info!(path = %path.display(), "generated a new validator identity");
            Ok(keypair)
        }
        Err(err) => Err(err).with_context(|| format!("failed to read validator keypair at {}", path.display())),
    }
}

/// Load this node's validator identity, if configured. Called once
/// per identity needed, rather than cached, since `KeyPair` does not
/// implement `Clone`; `from_seed` reconstructs the same identity
/// deterministically on every call once the seed file exists.
fn validator_keypair(config: &NodeConfig) -> anyhow::Result<Option<KeyPair>> {
    match &config.validator_keypair_path {
        Some(path) => Ok(Some(load_or_create_keypair(path)?)),
        None => Ok(None),
    }
}

fn load_genesis_block(store: &dyn Store) -> anyhow::Result<Block> {
    let bytes = store
        .get(columns::CF_BLOCKS, &0u64.to_be_bytes())?
        .context("genesis_committed is true but no block at height 0 was found")?;
    bincode::deserialize(&bytes).context("stored genesis block is corrupt")
}

fn current_unix_time() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs()
}

/// Ensure genesis exists in `store`, bootstrapping it on a first run,
/// and return a fresh [`Applier`] with its in-memory chain view seeded
/// from whichever genesis block ends up committed. Returns the
/// genesis timestamp alongside, needed for `ApplyContext` on every
/// later block.
fn ensure_genesis(store: Arc<dyn Store>, config: &NodeConfig) -> anyhow::Result<(Applier, u64)> {
    let genesis = if genesis_committed(store.as_ref())? {
        info!("genesis already bootstrapped, resuming from existing store");
        load_genesis_block(store.as_ref())?
    } else {
        let developer = validator_keypair(config)?
            .context("first run requires a validator keypair to bootstrap genesis")?;
        let cfg = GenesisConfig {
            developer: developer.address(),
            developer_public_key: developer.public_key(),
            timestamp: current_unix_time(),
            developer_reward: constants::developer_reward(),
            early_validator_reward: constants::early_validator_reward(),
        };
        let genesis = bootstrap_genesis(store.clone(), &cfg).context("failed to bootstrap genesis")?;
        info!(developer = %cfg.developer, "bootstrapped genesis");
        genesis
    };

    let mut applier = Applier::new(store);
    applier.seed_genesis(&genesis).context("failed to seed the in-memory chain view")?;
    Ok((applier, genesis.timestamp))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_tracing(&config.log_filter).ok();

    info!(network = ?config.network_kind, data_dir = %config.data_dir.display(), "starting bt2c-node");

    let network_params = config.network_params();
    let store = open_store(&config)?;

    let (applier, genesis_timestamp) = ensure_genesis(store.clone(), &config)?;

    let mempool = Mempool::new(
        StoreStateProvider::new(store.clone()),
        TokenBucketLimiter::new(MEMPOOL_RATE_LIMIT_PER_WINDOW, MEMPOOL_RATE_LIMIT_WINDOW_SECS),
    );

    let context_keypair = validator_keypair(&config)?;
    let producer_keypair = validator_keypair(&config)?;
    let producer = producer_keypair.map(BlockProducer::new);
    if producer.is_none() {
        info!("no validator keypair configured; running as an observer node");
    }

    let context = Context {
        network: network_params,
        store: store.clone(),
        keypair: context_keypair,
    };
    // The sending half would be cloned out to a peer-ingress task in a
    // build that implements `Network`; this workspace only runs the
    // local producer side, so nothing currently feeds `inbound`.
    let (_handles, inbound) = inbound_channels();
    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    let driver = Driver::new(
        context,
        applier,
        mempool,
        producer,
        NullNetwork,
        inbound,
        genesis_timestamp,
        shutdown_rx,
    );

    let run_handle = tokio::spawn(driver.run());

    tokio::signal::ctrl_c().await.context("failed to listen for ctrl-c")?;
    info!("shutdown requested");
    shutdown_tx.send(true).ok();
    run_handle.await.context("consensus driver task panicked")?;

    info!("bt2c-node stopped");
    Ok(())
}
