//! Errors the driver surfaces while wiring the Applier, Registry, and
//! Block Producer together over one tick.

use bt2c_applier::ApplierError;
use bt2c_producer::ProducerError;
use bt2c_registry::RegistryError;
use bt2c_store::StoreError;

/// Errors raised while driving one consensus tick.
#[derive(Debug, thiserror::Error)]
pub enum ConsensusError {
    /// A submitted block failed validation or commit.
    #[error("applier error: {0}")]
    Applier(#[from] ApplierError),
    /// Block assembly or genesis bootstrapping failed.
    #[error("producer error: {0}")]
    Producer(#[from] ProducerError),
    /// A registry maintenance pass (unjail, unstake queue) failed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    /// The underlying store failed to answer a read/write.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// The blocking task running `Applier::submit_block` panicked
    /// instead of returning — per §7's "Fatal" category, this halts
    /// the driver rather than being retried.
    #[error("block-processing worker panicked: {0}")]
    WorkerPanicked(String),
}
