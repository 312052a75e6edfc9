//! Consensus constants that do not vary by network kind.
//!
//! `BLOCK_TIME` and `HALVING_SECONDS` *do* vary by network kind and so
//! live in `bt2c-config`'s `NetworkParams`, passed into
//! [`crate::ApplyContext`] instead of hardcoded here.

use bt2c_ledger::Amount;

/// Starting block reward, in whole BT2C, before any halving.
pub const INITIAL_REWARD_WHOLE: u64 = 21;

/// Minimum block reward floor, in 10^-8 units (never halves below this).
pub const MIN_REWARD_UNITS: u64 = 1;

/// Total coins that will ever be issued, in whole BT2C.
pub const MAX_SUPPLY_WHOLE: u64 = 21_000_000;

/// Minimum stake, in whole BT2C, for a validator to be `Active`.
pub fn min_stake() -> Amount {
    Amount::from_whole(1)
}

/// One-shot bonus for the first validator to register after genesis.
pub fn developer_reward() -> Amount {
    Amount::from_whole(1000)
}

/// Bonus for any validator registering during the distribution period.
pub fn early_validator_reward() -> Amount {
    Amount::from_whole(1)
}

/// Length of the post-genesis bonus-eligibility window, in seconds (14
/// days).
pub const DISTRIBUTION_DURATION_SECS: u64 = 14 * 86_400;

/// Base fee, in 10^-8 units (10^-4 BT2C), before the pending-count
/// multiplier.
pub const BASE_FEE_UNITS: u64 = 10_000;

/// Jail duration following an unavailability slash, in seconds.
pub const JAIL_SECONDS: u64 = 86_400;

/// Rolling window over which repeated double-signs accumulate toward
/// tombstoning.
pub const TOMBSTONE_WINDOW_SECS: u64 = 30 * 86_400;

/// Number of double-signs within [`TOMBSTONE_WINDOW_SECS`] that
/// tombstones a validator. Unspecified upstream; fixed here as an
/// Open Question decision (see DESIGN.md).
pub const TOMBSTONE_THRESHOLD: u32 = 3;

/// Confirmations after which a block is considered final.
pub const FINALITY_CONFIRMATIONS: u64 = 6;

/// Maximum depth of chain divergence eligible for reorg; deeper
/// divergence triggers a sync-from-peer instead.
pub const MAX_REORG_DEPTH: u64 = 100;

/// Seconds after a slot's scheduled time before it is abandoned.
pub const PRODUCTION_DEADLINE_SECS: u64 = 30;

/// Cap on reputation-derived selection-weight multiplier (2^floor(rep/10)).
pub const MAX_REPUTATION_MULTIPLIER: u64 = 8;

/// Maximum fraction (numerator over 100) of total network stake the
/// unstake queue may release per rolling 24h window.
pub const UNSTAKE_DAILY_RATE_PERCENT: u64 = 1;

/// Maximum total canonical-encoded transaction bytes the Block
/// Producer packs into one block. Unspecified upstream; fixed here as
/// an Open Question decision (see DESIGN.md).
pub const MAX_BLOCK_BYTES: usize = 1_000_000;

/// Seconds between driver ticks.
pub const TICK_SECS: u64 = 1;

/// Interval, in ticks, between periodic mempool-expiry and
/// unjail/evidence maintenance passes.
pub const MAINTENANCE_TICK_SECS: u64 = 60;
