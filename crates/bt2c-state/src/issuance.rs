//! Pure issuance-schedule and fee functions, shared by the State
//! Machine, Mempool admission, and Block Producer so none of them
//! reimplement the halving or fee formula independently.

use bt2c_ledger::Amount;

use crate::constants::{BASE_FEE_UNITS, INITIAL_REWARD_WHOLE, MIN_REWARD_UNITS};

/// Block reward at `height`, under a network with the given
/// `block_time_secs` slot length and `halving_seconds` halving period.
///
/// `reward = floor(INITIAL_REWARD * 2^-floor(height * block_time /
/// halving_seconds))`, clamped to [`MIN_REWARD_UNITS`].
pub fn block_reward(height: u64, block_time_secs: u64, halving_seconds: u64) -> Amount {
    let elapsed_secs = height.saturating_mul(block_time_secs);
    let halvings = elapsed_secs / halving_seconds;
    let base_units = Amount::from_whole(INITIAL_REWARD_WHOLE).units();
    let shifted = if halvings >= 64 {
        0
    } else {
        base_units >> halvings
    };
    Amount::from_units(shifted.max(MIN_REWARD_UNITS))
}

/// Minimum acceptable fee given the current mempool pending count:
/// `BASE_FEE * (1 + pending_count / 100)`.
pub fn min_fee(pending_count: u64) -> Amount {
    let numerator = BASE_FEE_UNITS.saturating_mul(100 + pending_count);
    Amount::from_units(numerator / 100)
}

/// True if `now` still falls within the distribution-bonus window
/// that started at `genesis_timestamp`.
pub fn within_distribution_period(
    genesis_timestamp: u64,
    now: u64,
    distribution_duration_secs: u64,
) -> bool {
    now.saturating_sub(genesis_timestamp) <= distribution_duration_secs
}
