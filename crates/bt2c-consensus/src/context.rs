//! Process-wide dependencies threaded explicitly through the Driver.
//!
//! Replaces the source's module-level singletons for chain parameters
//! and connection state (§9 "Global state") with one value constructed
//! once by `bt2c-node::main` and passed down; tests build independent
//! contexts rather than sharing process-global configuration.

use std::sync::Arc;

use bt2c_config::NetworkParams;
use bt2c_crypto::KeyPair;
use bt2c_ledger::{Block, Transaction};
use bt2c_store::Store;
use tokio::sync::mpsc;

/// Bound on the incoming-block and incoming-transaction channels: a
/// slow consensus loop applies backpressure to whatever feeds these
/// channels rather than growing an unbounded backlog.
pub const INBOUND_CHANNEL_CAPACITY: usize = 256;

/// Immutable environment handed to the Driver: resolved network
/// parameters, the shared Store handle, and this node's validator
/// identity.
pub struct Context {
    /// Resolved per-network consensus constants.
    pub network: NetworkParams,
    /// The shared Store handle every other component reads/writes
    /// through.
    pub store: Arc<dyn Store>,
    /// This node's signing identity; `None` for an observer node that
    /// never produces blocks.
    pub keypair: Option<KeyPair>,
}

/// The receiving ends of the inbound queues, held by the Driver.
/// Kept separate from [`Context`] so the sending side can be cloned
/// and handed to an ingress layer without also exposing the
/// consuming end.
pub struct Inbound {
    /// Blocks received from peers, awaiting validation.
    pub blocks: mpsc::Receiver<Block>,
    /// Transactions received from peers, awaiting admission.
    pub transactions: mpsc::Receiver<Transaction>,
}

/// Sending ends of the inbound queues, cloneable so every ingress
/// task (one per peer connection, in a full Network implementation)
/// can feed the same Driver.
#[derive(Clone)]
pub struct InboundHandles {
    /// Feed a received block to the Driver.
    pub blocks: mpsc::Sender<Block>,
    /// Feed a received transaction to the Driver.
    pub transactions: mpsc::Sender<Transaction>,
}

/// Build a bounded pair of inbound queues.
pub fn inbound_channels() -> (InboundHandles, Inbound) {
    let (block_tx, block_rx) = mpsc::channel(INBOUND_CHANNEL_CAPACITY);
    let (transaction_tx, transaction_rx) = mpsc::channel(INBOUND_CHANNEL_CAPACITY);
    (
        InboundHandles {
            blocks: block_tx,
            transactions: transaction_tx,
        },
        Inbound {
            blocks: block_rx,
            transactions: transaction_rx,
        },
    )
}
