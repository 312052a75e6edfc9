//! # BT2C Consensus Driver
//!
//! Wires the State Machine, Validator Registry, Mempool, Block
//! Producer, and Block Validator/Applier into the single cooperative
//! loop described in §4.8/§5: one task owns every authoritative state
//! transition, CPU-bound validation work runs on `tokio`'s blocking
//! pool, and a `Context` value replaces the source's module-level
//! singletons.

#![warn(missing_docs)]

pub mod context;
pub mod driver;
pub mod errors;
pub mod mempool_adapter;
pub mod network;
pub mod state_adapter;

pub use context::{inbound_channels, Context, Inbound, InboundHandles};
pub use driver::{shutdown_channel, Driver};
pub use errors::ConsensusError;
pub use mempool_adapter::MempoolAdapter;
pub use network::{NullNetwork, Network};
pub use state_adapter::StoreStateProvider;
