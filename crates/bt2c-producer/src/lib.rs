//! # BT2C Block Producer
//!
//! Genesis construction and ordinary block assembly/signing on behalf
//! of one validator identity. Decoupled from `bt2c_mempool::Mempool`'s
//! generic parameters: callers run `Mempool::select_batch` themselves
//! and pass the resulting transactions in.

#![warn(missing_docs)]

pub mod errors;
pub mod genesis;
pub mod producer;

pub use errors::ProducerError;
pub use genesis::{build_genesis, bootstrap_genesis, GenesisConfig};
pub use producer::{BlockProducer, SlotOutcome};
