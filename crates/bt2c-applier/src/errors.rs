//! Errors arising from incoming-block validation and commit.

use bt2c_crypto::{Address, Hash};
use bt2c_ledger::{Amount, LedgerError};
use bt2c_registry::RegistryError;
use bt2c_state::ApplyError;
use bt2c_store::StoreError;

/// Structural/transactional/economic rejection reasons, checked before
/// a block ever reaches the State Machine (§4.7).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// `previous_hash` does not match the chain tip this block claims
    /// to extend.
    #[error("previous_hash {got:?} does not match expected tip {expected:?}")]
    WrongParent { expected: Hash, got: Hash },
    /// `height` is not exactly one past the block it extends.
    #[error("height {got} is not the expected {expected}")]
    WrongHeight { expected: u64, got: u64 },
    /// Recomputing the block's header hash does not match the carried
    /// `hash` field.
    #[error("block hash does not match its recomputation")]
    HashMismatch,
    /// The Merkle root does not match the listed transactions.
    #[error("merkle root does not match transaction list")]
    MerkleMismatch,
    /// The block carries no signature, or the signature does not
    /// verify against `validator`'s registered public key.
    #[error("block signature missing or invalid for validator {0}")]
    BadBlockSignature(Address),
    /// `validator` is not currently `Active`.
    #[error("validator {0} is not active")]
    ValidatorNotActive(Address),
    /// `validator` is not the address the Selector would have chosen
    /// for this height and seed.
    #[error("validator {got} was not selected for this height; expected {expected}")]
    WrongProducer { expected: Address, got: Address },
    /// No active validator exists to select a producer from.
    #[error("no active validators available to select a producer")]
    NoEligibleProducer,
    /// A block was submitted before the genesis block was bootstrapped
    /// (genesis only ever reaches Store through
    /// `bt2c_producer::genesis::bootstrap_genesis`, never through the
    /// Applier).
    #[error("no committed chain tip; bootstrap genesis first")]
    GenesisNotBootstrapped,
    /// A transaction's own hash does not match its recomputation.
    #[error("transaction hash mismatch")]
    TransactionHashMismatch,
    /// A transaction's signature does not verify.
    #[error("transaction signature invalid")]
    TransactionBadSignature,
    /// The declared `reward` does not match the halving schedule plus
    /// collected fees.
    #[error("reward {got} does not match expected {expected} (base + fees)")]
    RewardMismatch { expected: Amount, got: Amount },
    /// A block carried a `Reward`/`Genesis` transaction other than
    /// the single system-constructed credit the block-production path
    /// itself would have produced: a second such transaction, one
    /// addressed to someone other than the block's validator, a
    /// `Genesis` transaction outside the genesis block, or none at
    /// all.
    #[error("block carries an unauthorized Reward/Genesis transaction")]
    UnauthorizedSystemCredit,
}

/// Errors arising from submitting a candidate block to the Applier.
#[derive(Debug, thiserror::Error)]
pub enum ApplierError {
    /// The block failed a structural/transactional/economic check.
    #[error("block rejected: {0}")]
    Validation(#[from] ValidationError),
    /// The block passed pre-checks but failed state-machine
    /// application.
    #[error("state application failed: {0}")]
    Apply(#[from] ApplyError),
    /// A registry operation failed while recording block production.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    /// A store operation failed while committing the block.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// A ledger-level invariant was violated while decoding stored
    /// state.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
