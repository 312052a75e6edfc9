//! Inputs to [`crate::StateMachine::apply_block`] that are not part of
//! the block itself: network-kind-dependent constants and
//! once-per-chain bookkeeping flags.
//!
//! Per the design notes on replacing module-level singletons with an
//! explicit value, this struct is constructed once (from
//! `bt2c-config::NetworkParams` plus a Store read) and threaded
//! through, never held as ambient global state.

/// Per-block inputs to the state machine that vary by network kind or
/// chain history.
#[derive(Debug, Clone, Copy)]
pub struct ApplyContext {
    /// Target seconds between blocks for this network.
    pub block_time_secs: u64,
    /// Seconds between reward halvings for this network.
    pub halving_seconds: u64,
    /// Unix timestamp of the genesis block.
    pub genesis_timestamp: u64,
    /// Length of the post-genesis bonus window, in seconds.
    pub distribution_duration_secs: u64,
    /// Whether `DEVELOPER_REWARD` has already been paid out on a
    /// prior block (read from Store metadata by the caller).
    pub developer_reward_already_issued: bool,
}

impl ApplyContext {
    /// True if `timestamp` falls within the distribution-bonus window.
    pub fn within_distribution_period(&self, timestamp: u64) -> bool {
        crate::issuance::within_distribution_period(
            self.genesis_timestamp,
            timestamp,
            self.distribution_duration_secs,
        )
    }
}
