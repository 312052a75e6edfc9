//! Validator registry entries and their lifecycle status.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use bt2c_crypto::{Address, PublicKey};

/// A validator's lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidatorStatus {
    /// Eligible for selection.
    Active,
    /// Registered but not currently eligible (e.g. stake below the
    /// minimum, or voluntarily withdrawn).
    Inactive,
    /// Temporarily excluded from selection following a slashing event.
    Jailed,
    /// Permanently excluded from selection; cannot be unjailed.
    Tombstoned,
}

/// An entry in the validator registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Validator {
    /// This validator's address.
    pub address: Address,
    /// This validator's public key, used to verify blocks it signs.
    pub public_key: PublicKey,
    /// Staked amount backing this validator's selection weight.
    pub stake: Amount,
    /// Reputation score accrued from block production history,
    /// contributing to selection weight alongside stake.
    pub reputation: f64,
    /// Current lifecycle status.
    pub status: ValidatorStatus,
    /// Height of the most recent block this validator produced, if any.
    pub last_block_height: Option<u64>,
    /// Count of double-sign evidence records against this validator
    /// within the tombstone observation window.
    pub double_sign_count: u32,
    /// Height at which a `Jailed` validator becomes eligible for
    /// unjailing, if applicable.
    pub jailed_until: Option<u64>,
}

impl Validator {
    /// A freshly registered validator, starting `Active` with no
    /// production history.
    pub fn new(address: Address, public_key: PublicKey, stake: Amount) -> Self {
        Self {
            address,
            public_key,
            stake,
            reputation: 1.0,
            status: ValidatorStatus::Active,
            last_block_height: None,
            double_sign_count: 0,
            jailed_until: None,
        }
    }

    /// True if this validator may currently be selected to produce a
    /// block.
    pub fn is_eligible(&self) -> bool {
        matches!(self.status, ValidatorStatus::Active)
    }
}
