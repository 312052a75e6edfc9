//! # BT2C Ledger Model
//!
//! Pure, side-effect-free data types and canonical encoders: `Block`,
//! `Transaction`, `Account`, `Validator`, `UnstakeEntry`, `Evidence`. No
//! component in this crate talks to `Store` or `Network` — it only defines
//! what the ledger *is* and how its pieces hash.

#![warn(missing_docs)]

pub mod account;
pub mod amount;
pub mod block;
pub mod encoding;
pub mod errors;
pub mod evidence;
pub mod transaction;
pub mod unstake;
pub mod validator;

pub use account::Account;
pub use amount::Amount;
pub use block::Block;
pub use errors::LedgerError;
pub use evidence::{Evidence, EvidenceKind};
pub use transaction::{Transaction, TransactionType};
pub use unstake::{UnstakeEntry, UnstakeStatus};
pub use validator::{Validator, ValidatorStatus};

pub use bt2c_crypto::{Address, Hash, PublicKey, Signature};
