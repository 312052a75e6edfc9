//! Errors arising from genesis construction and block production.

use bt2c_ledger::LedgerError;
use bt2c_registry::RegistryError;
use bt2c_state::ApplyError;
use bt2c_store::StoreError;

/// Errors arising from genesis construction and block production.
#[derive(Debug, thiserror::Error)]
pub enum ProducerError {
    /// The genesis block failed state-machine application.
    #[error("genesis block application failed: {0}")]
    Apply(#[from] ApplyError),
    /// A registry operation failed while bootstrapping the genesis
    /// validator.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    /// A store operation failed while committing the genesis block.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// A ledger-level invariant was violated while assembling a block.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
