//! Deterministic stake- and reputation-weighted validator selection.

use bt2c_crypto::{Address, Hash};
use bt2c_ledger::{Validator, ValidatorStatus};
use bt2c_state::constants::MAX_REPUTATION_MULTIPLIER;

/// This validator's selection weight: `stake * 2^floor(reputation/10)`,
/// capped so high reputation can dominate selection by at most
/// [`MAX_REPUTATION_MULTIPLIER`].
pub fn weight(validator: &Validator) -> u128 {
    let exponent = (validator.reputation / 10.0).floor().max(0.0) as u32;
    let multiplier = 1u64.checked_shl(exponent).unwrap_or(u64::MAX).min(MAX_REPUTATION_MULTIPLIER);
    validator.stake.units() as u128 * multiplier as u128
}

/// Select a block producer for height `h`, given the previous block's
/// hash as the selection seed. Pure and reproducible: every node
/// computing this over the same validator set and seed derives the
/// same producer.
///
/// Only `Active` validators participate. Returns `None` if there are
/// none, or their combined weight is zero (all staked at zero, which
/// `min_stake` should prevent in practice but is not itself assumed
/// here).
pub fn select_producer(validators: &[Validator], seed: Hash, height: u64) -> Option<Address> {
    let mut active: Vec<&Validator> = validators
        .iter()
        .filter(|v| matches!(v.status, ValidatorStatus::Active))
        .collect();
    active.sort_by_key(|v| v.address);

    let total_weight: u128 = active.iter().map(|v| weight(v)).sum();
    if total_weight == 0 {
        return None;
    }

    let mut input = Vec::with_capacity(40);
    input.extend_from_slice(&seed);
    input.extend_from_slice(&height.to_be_bytes());
    let digest = bt2c_crypto::hash(&input);
    let digest_value = u128::from_be_bytes(digest[..16].try_into().unwrap());
    let mut r = digest_value % total_weight;

    for validator in active {
        let w = weight(validator);
        if r < w {
            return Some(validator.address);
        }
        r -= w;
    }
    unreachable!("r is bounded by total_weight, which equals the sum of all weights walked")
}
