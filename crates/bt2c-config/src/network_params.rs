//! `NetworkParams`: the flattened replacement for the source's
//! `BT2CBaseConfig` / `ProductionConfig` / `TestnetConfig` inheritance
//! chain (§9 "Inheritance flattening") — one record with a
//! [`NetworkKind`] tag and a preset per kind, instead of a class
//! hierarchy.

use serde::{Deserialize, Serialize};

/// Which network a node is participating in. Determines block timing
/// and the halving schedule; every other consensus constant
/// (`MIN_STAKE`, `FINALITY_CONFIRMATIONS`, …) is network-independent
/// and lives in `bt2c_state::constants`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    /// Production network: 300 s blocks, 4-year halving.
    Mainnet,
    /// Public test network: 60 s blocks, a shorter halving period so
    /// the schedule is exercisable without a years-long soak test.
    Testnet,
    /// Local development network: 5 s blocks, a halving period short
    /// enough to observe within a single test run.
    Devnet,
}

/// Per-network timing parameters threaded into
/// [`bt2c_state::ApplyContext`] and the Consensus Driver's slot clock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NetworkParams {
    /// Which network this is.
    pub network_kind: NetworkKind,
    /// Numeric chain identifier carried in the peer `HELLO` handshake
    /// (Network is out of scope here, but the tag is network-level
    /// configuration, so it lives on this record).
    pub chain_id: u8,
    /// Target seconds between blocks.
    pub block_time_secs: u64,
    /// Seconds between reward halvings.
    pub halving_seconds: u64,
    /// Length of the post-genesis bonus window, in seconds. Fixed at
    /// 14 days across every network kind per the contract, but kept
    /// here (rather than hardcoded at each call site) so
    /// `ApplyContext` construction never needs a second source.
    pub distribution_duration_secs: u64,
}

impl NetworkParams {
    /// Mainnet preset: `BLOCK_TIME = 300s`, `HALVING_SECONDS =
    /// 126_144_000` (4 years), matching the contract's consensus
    /// constants table exactly.
    pub const fn mainnet() -> Self {
        Self {
            network_kind: NetworkKind::Mainnet,
            chain_id: 1,
            block_time_secs: 300,
            halving_seconds: 126_144_000,
            distribution_duration_secs: bt2c_state::constants::DISTRIBUTION_DURATION_SECS,
        }
    }

    /// Testnet preset: `BLOCK_TIME = 60s`; halving scaled down to a
    /// tenth of mainnet's so the schedule is reachable in days rather
    /// than years.
    pub const fn testnet() -> Self {
        Self {
            network_kind: NetworkKind::Testnet,
            chain_id: 2,
            block_time_secs: 60,
            halving_seconds: 12_614_400,
            distribution_duration_secs: bt2c_state::constants::DISTRIBUTION_DURATION_SECS,
        }
    }

    /// Devnet preset: `BLOCK_TIME = 5s`; halving scaled down further
    /// so a handful of blocks cross a halving boundary, useful for the
    /// §8 halving-boundary scenario run against a live driver rather
    /// than the pure `issuance::block_reward` unit tests.
    pub const fn devnet() -> Self {
        Self {
            network_kind: NetworkKind::Devnet,
            chain_id: 3,
            block_time_secs: 5,
            halving_seconds: 50,
            distribution_duration_secs: bt2c_state::constants::DISTRIBUTION_DURATION_SECS,
        }
    }

    /// The preset for `kind`.
    pub const fn for_kind(kind: NetworkKind) -> Self {
        match kind {
            NetworkKind::Mainnet => Self::mainnet(),
            NetworkKind::Testnet => Self::testnet(),
            NetworkKind::Devnet => Self::devnet(),
        }
    }
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self::mainnet()
    }
}
