//! # BT2C End-to-End Scenario Tests
//!
//! One module per end-to-end scenario, each driving the real crates
//! (`bt2c-ledger`, `bt2c-state`, `bt2c-registry`, `bt2c-mempool`,
//! `bt2c-producer`, `bt2c-applier`) over an `InMemoryStore` the way
//! `bt2c-node` itself does, rather than against crate-internal
//! fixtures. `support` holds the fixtures shared across scenarios.
//!
//! ```text
//! tests/src/
//! ├── support.rs      # shared fixtures: genesis bootstrap, tx builders
//! └── scenarios/
//!     ├── genesis_and_first_block.rs
//!     ├── double_spend_prevention.rs
//!     ├── replay.rs
//!     ├── halving.rs
//!     ├── slashing.rs
//!     └── unstake_rate_limit.rs
//! ```

pub mod scenarios;
pub mod support;
