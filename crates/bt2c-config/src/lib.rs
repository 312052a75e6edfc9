//! # BT2C Node Configuration
//!
//! `NetworkParams` collapses the source's `BT2CBaseConfig` /
//! `ProductionConfig` / `TestnetConfig` inheritance chain into one
//! tagged record with mainnet/testnet/devnet presets (§9 "Inheritance
//! flattening"). `NodeConfig` is the on-disk shape, loaded from TOML
//! and layered with CLI overrides; `logging` wires up `tracing`.

#![warn(missing_docs)]

pub mod cli;
pub mod errors;
pub mod logging;
pub mod network_params;
pub mod node_config;

pub use cli::{CliArgs, CliNetworkKind};
pub use errors::ConfigError;
pub use logging::init_tracing;
pub use network_params::{NetworkKind, NetworkParams};
pub use node_config::NodeConfig;
