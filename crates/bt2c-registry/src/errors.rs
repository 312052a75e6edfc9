//! Registry error taxonomy.

use bt2c_crypto::Address;
use bt2c_ledger::Amount;
use thiserror::Error;

/// Errors raised by registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// An operation named a validator with no registry entry.
    #[error("unknown validator {0}")]
    UnknownValidator(Address),

    /// A slash or unstake amount exceeded the validator's stake.
    #[error("insufficient stake for {validator}: requested {requested}, available {available}")]
    InsufficientStake {
        /// The validator address.
        validator: Address,
        /// Amount requested.
        requested: Amount,
        /// Stake actually held.
        available: Amount,
    },

    /// A pure ledger-model invariant was violated (amount overflow).
    #[error(transparent)]
    Ledger(#[from] bt2c_ledger::LedgerError),

    /// The underlying store failed to answer a read/write.
    #[error(transparent)]
    Store(#[from] bt2c_store::StoreError),
}
