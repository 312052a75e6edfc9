//! The Consensus Driver (§4.8): a single cooperative loop per node
//! that owns every authoritative state transition. CPU-bound work —
//! signature verification and Merkle recomputation inside
//! `Applier::submit_block` — is dispatched to `tokio`'s blocking pool
//! rather than a hand-rolled worker pool, since `Store: Send + Sync`
//! already makes `Applier` and the wrapped `Mempool` movable across
//! that boundary and back. Exactly one block is ever in flight: the
//! applier and mempool are held as `Option`s so they can be moved into
//! the blocking closure and returned, never aliased.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bt2c_applier::{Applier, ApplyOutcome};
use bt2c_crypto::{Address, Hash};
use bt2c_ledger::transaction::Nonce;
use bt2c_ledger::{Amount, Block, EvidenceKind, Transaction, TransactionType, Validator};
use bt2c_mempool::{Mempool, RateLimiter};
use bt2c_producer::{BlockProducer, SlotOutcome};
use bt2c_registry::{select_producer, Registry};
use bt2c_state::constants::{MAINTENANCE_TICK_SECS, MAX_BLOCK_BYTES, PRODUCTION_DEADLINE_SECS, TICK_SECS};
use bt2c_state::{issuance, ApplyContext};
use bt2c_store::{columns, Store};
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, error, info, instrument, warn};

use crate::context::{Context, Inbound};
use crate::errors::ConsensusError;
use crate::mempool_adapter::MempoolAdapter;
use crate::network::Network;
use crate::state_adapter::StoreStateProvider;

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs()
}

/// Every registered validator, in whatever status they currently hold
/// — `bt2c_registry::select_producer` filters to `Active` itself.
/// Duplicated from `Applier`'s identical private helper rather than
/// exposed as a port, since it is a direct Store read with no
/// business logic of its own.
fn all_validators(store: &dyn Store) -> Result<Vec<Validator>, ConsensusError> {
    Ok(store
        .prefix_scan(columns::CF_VALIDATORS, &[])?
        .into_iter()
        .map(|(_, bytes)| bincode::deserialize::<Validator>(&bytes).expect("validator record corrupt"))
        .collect())
}

/// Build a `Receiver` paired with the `Sender` `bt2c-node::main` uses
/// to request a cooperative shutdown.
pub fn shutdown_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Drives block validation, production, and validator-registry
/// maintenance for one node. Generic over the rate limiter the
/// mempool enforces and the network adapter blocks are announced
/// through; the state-reading side of the mempool is always backed by
/// [`StoreStateProvider`], since no other implementation has any use
/// in this workspace.
pub struct Driver<R: RateLimiter, N: Network> {
    ctx: Context,
    applier: Option<Applier>,
    mempool: Option<MempoolAdapter<StoreStateProvider, R>>,
    producer: Option<BlockProducer>,
    registry: Registry,
    network: N,
    inbound: Inbound,
    genesis_timestamp: u64,
    next_slot_at: u64,
    shutdown: watch::Receiver<bool>,
}

impl<R, N> Driver<R, N>
where
    R: RateLimiter + 'static,
    N: Network + 'static,
{
    /// Build a driver. `applier` must already have `seed_genesis`
    /// called on it; `producer` is `None` for an observer node that
    /// never produces blocks.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ctx: Context,
        applier: Applier,
        mempool: Mempool<StoreStateProvider, R>,
        producer: Option<BlockProducer>,
        network: N,
        inbound: Inbound,
        genesis_timestamp: u64,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let registry = Registry::new(ctx.store.clone());
        Self {
            ctx,
            applier: Some(applier),
            mempool: Some(MempoolAdapter::new(mempool)),
            producer,
            registry,
            network,
            inbound,
            genesis_timestamp,
            next_slot_at: genesis_timestamp,
            shutdown,
        }
    }

    fn apply_context(&self) -> ApplyContext {
        ApplyContext {
            block_time_secs: self.ctx.network.block_time_secs,
            halving_seconds: self.ctx.network.halving_seconds,
            genesis_timestamp: self.genesis_timestamp,
            distribution_duration_secs: self.ctx.network.distribution_duration_secs,
            // The one-shot developer bonus is always paid at genesis,
            // before the Driver ever sees a block.
            developer_reward_already_issued: true,
        }
    }

    /// Run until the shutdown channel is signalled. Cooperative: a
    /// stop request is only honored between ticks, after any
    /// in-flight block has fully committed — there is never more than
    /// one block being applied at a time, so "drain queues, commit
    /// the current batch, then return" reduces to "check the flag
    /// before starting the next tick's work."
    pub async fn run(mut self) {
        let mut ticker = interval(Duration::from_secs(TICK_SECS));
        let mut tick_count: u64 = 0;

        loop {
            ticker.tick().await;
            if *self.shutdown.borrow() {
                info!("consensus driver stopping");
                break;
            }
            tick_count += 1;
            let now = now_unix();

            // Priority order (§4.8): incoming block, evidence,
            // unstake queue, producer slot. Incoming transactions
            // ride along with incoming blocks rather than being a
            // separate priority tier of their own.
            self.drain_inbound_transactions(now);
            if let Err(err) = self.drain_inbound_blocks(now).await {
                error!(%err, "inbound block processing failed");
            }
            if tick_count % MAINTENANCE_TICK_SECS == 0 {
                self.run_periodic_maintenance(now);
            }
            if let Err(err) = self.process_unstake_queue(now) {
                error!(%err, "unstake queue processing failed");
            }
            if let Err(err) = self.maybe_produce(now).await {
                error!(%err, "block production failed");
            }
        }
    }

    fn drain_inbound_transactions(&mut self, now: u64) {
        let Some(mempool) = self.mempool.as_mut() else { return };
        while let Ok(tx) = self.inbound.transactions.try_recv() {
            if let Err(err) = mempool.admit(tx, now) {
                debug!(%err, "transaction rejected at admission");
            }
        }
    }

    async fn drain_inbound_blocks(&mut self, now: u64) -> Result<(), ConsensusError> {
        while let Ok(block) = self.inbound.blocks.try_recv() {
            self.submit(block, now).await?;
        }
        Ok(())
    }

    fn run_periodic_maintenance(&mut self, now: u64) {
        if let Some(mempool) = self.mempool.as_mut() {
            mempool.expire(now);
        }
        match self.registry.unjail(now) {
            Ok(unjailed) if !unjailed.is_empty() => {
                info!(count = unjailed.len(), "unjailed validators");
            }
            Ok(_) => {}
            Err(err) => error!(%err, "unjail pass failed"),
        }
    }

    fn process_unstake_queue(&self, now: u64) -> Result<(), ConsensusError> {
        let processed = self.registry.process_unstake_queue(now)?;
        if !processed.is_empty() {
            info!(count = processed.len(), "released unstake queue entries");
        }
        Ok(())
    }

    /// Attempt to produce a block for the current slot, if this node
    /// has a producer identity and is the one selected.
    ///
    /// Unavailability evidence is only ever self-reported here: a
    /// single node has no way to know *another* validator missed its
    /// slot without a peer telling it, so cross-validator
    /// unavailability detection is left to the network-integrated
    /// ingress path this workspace does not implement (§1, `Network`
    /// is a collaborator, not a module).
    async fn maybe_produce(&mut self, now: u64) -> Result<(), ConsensusError> {
        let Some(producer_address) = self.producer.as_ref().map(BlockProducer::address) else {
            return Ok(());
        };
        let Some((tip_hash, tip_height)) = self.applier.as_ref().and_then(Applier::committed_tip) else {
            return Ok(());
        };
        if now < self.next_slot_at {
            return Ok(());
        }

        let next_height = tip_height + 1;
        let validators = all_validators(self.ctx.store.as_ref())?;
        let outcome = match select_producer(&validators, tip_hash, next_height) {
            Some(addr) if addr == producer_address => {
                if now > self.next_slot_at.saturating_add(PRODUCTION_DEADLINE_SECS) {
                    SlotOutcome::MissedDeadline
                } else {
                    SlotOutcome::Produced(self.build_block(next_height, tip_hash, now))
                }
            }
            _ => SlotOutcome::NotSelected,
        };

        match outcome {
            SlotOutcome::Produced(block) => self.submit(block, now).await,
            SlotOutcome::MissedDeadline => {
                warn!(height = next_height, %producer_address, "missed own production deadline");
                self.registry.slash(&producer_address, EvidenceKind::Unavailability, now)?;
                self.next_slot_at = now;
                Ok(())
            }
            SlotOutcome::NotSelected => Ok(()),
        }
    }

    fn build_block(&self, height: u64, parent_hash: Hash, now: u64) -> Block {
        let reward = issuance::block_reward(height, self.ctx.network.block_time_secs, self.ctx.network.halving_seconds);
        let producer = self.producer.as_ref().expect("checked by caller");

        let reward_tx = Transaction {
            kind: TransactionType::Reward,
            sender: Address::system(),
            recipient: producer.address(),
            amount: reward,
            fee: Amount::ZERO,
            nonce: Nonce::Sequential(0),
            timestamp: now,
            payload: vec![],
            sender_public_key: None,
            signature: None,
        };

        let mut txs = self
            .mempool
            .as_ref()
            .map(|m| m.select_batch(MAX_BLOCK_BYTES))
            .unwrap_or_default();
        txs.insert(0, reward_tx);

        producer.produce(height, parent_hash, now, txs, reward)
    }

    #[instrument(skip(self, block), fields(height = block.height))]
    async fn submit(&mut self, block: Block, now: u64) -> Result<(), ConsensusError> {
        let mut applier = self.applier.take().expect("applier always present between ticks");
        let mut mempool = self.mempool.take().expect("mempool always present between ticks");
        let apply_ctx = self.apply_context();
        let broadcast_block = block.clone();

        let (outcome, applier, mempool) = tokio::task::spawn_blocking(move || {
            let outcome = applier.submit_block(block, &apply_ctx, &mut mempool);
            (outcome, applier, mempool)
        })
        .await
        .map_err(|err| ConsensusError::WorkerPanicked(err.to_string()))?;

        self.applier = Some(applier);
        self.mempool = Some(mempool);

        match outcome? {
            ApplyOutcome::Committed { height } => {
                info!(height, "committed block");
                self.next_slot_at = now.saturating_add(self.ctx.network.block_time_secs);
                self.network.broadcast_block(&broadcast_block);
            }
            ApplyOutcome::AlreadyCommitted => {}
            ApplyOutcome::Buffered => debug!("buffered a non-extending block pending fork-choice"),
            ApplyOutcome::EvidenceRecorded(evidence) => {
                warn!(validator = %evidence.validator, kind = ?evidence.kind, "slashing evidence recorded");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bt2c_config::NetworkParams;
    use bt2c_crypto::KeyPair;
    use bt2c_mempool::NoopLimiter;
    use bt2c_producer::genesis::{bootstrap_genesis, GenesisConfig};
    use bt2c_store::InMemoryStore;

    fn test_network() -> NetworkParams {
        NetworkParams::devnet()
    }

    fn genesis_cfg(kp: &KeyPair, timestamp: u64) -> GenesisConfig {
        GenesisConfig {
            developer: kp.address(),
            developer_public_key: kp.public_key(),
            timestamp,
            developer_reward: Amount::from_whole(1000),
            early_validator_reward: Amount::from_whole(1),
        }
    }

    const TEST_SEED: [u8; 32] = [7u8; 32];

    fn driver_with_genesis(
        store: Arc<dyn Store>,
        timestamp: u64,
    ) -> (Driver<NoopLimiter, crate::network::NullNetwork>, Block) {
        let kp = KeyPair::from_seed(&TEST_SEED).unwrap();
        let genesis = bootstrap_genesis(store.clone(), &genesis_cfg(&kp, timestamp)).unwrap();
        let mut applier = Applier::new(store.clone());
        applier.seed_genesis(&genesis).unwrap();

        let ctx = Context {
            network: test_network(),
            store: store.clone(),
            keypair: Some(KeyPair::from_seed(&TEST_SEED).unwrap()),
        };
        let mempool = Mempool::new(StoreStateProvider::new(store.clone()), NoopLimiter);
        let (_handles, inbound) = crate::context::inbound_channels();
        let (_tx, rx) = shutdown_channel();
        let producer = BlockProducer::new(KeyPair::from_seed(&TEST_SEED).unwrap());

        let driver = Driver::new(ctx, applier, mempool, Some(producer), crate::network::NullNetwork, inbound, timestamp, rx);
        (driver, genesis)
    }

    #[tokio::test]
    async fn selected_producer_commits_the_next_block() {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let (mut driver, genesis) = driver_with_genesis(store.clone(), 1_000);

        // The sole registered validator is always selected.
        driver.maybe_produce(1_000).await.unwrap();

        let applier = driver.applier.as_ref().unwrap();
        let (_, height) = applier.committed_tip().unwrap();
        assert_eq!(height, genesis.height + 1);
    }

    #[tokio::test]
    async fn missed_deadline_slashes_for_unavailability() {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let (mut driver, _genesis) = driver_with_genesis(store.clone(), 1_000);
        let address = KeyPair::from_seed(&TEST_SEED).unwrap().address();

        let far_future = 1_000 + PRODUCTION_DEADLINE_SECS + 1;
        driver.maybe_produce(far_future).await.unwrap();

        let registry = Registry::new(store);
        let validator = registry.get(&address).unwrap().unwrap();
        assert_eq!(validator.status, bt2c_ledger::ValidatorStatus::Jailed);
    }
}
