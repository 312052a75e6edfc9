//! Unstake request queue entries.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use bt2c_crypto::Address;

/// The lifecycle state of a single unstake request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnstakeStatus {
    /// Queued, waiting for the rate-limited unstake processor.
    Pending,
    /// Released back to the requester's spendable balance.
    Processed,
    /// Withdrawn by the requester before being processed.
    Cancelled,
}

/// A request to withdraw a validator's staked funds, served FIFO and
/// subject to a per-period rate limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnstakeEntry {
    /// The validator address requesting withdrawal.
    pub validator: Address,
    /// Amount requested for withdrawal.
    pub amount: Amount,
    /// Height at which the request was queued; the FIFO ordering key.
    pub requested_at_height: u64,
    /// Current status.
    pub status: UnstakeStatus,
}

impl UnstakeEntry {
    /// A freshly queued request.
    pub fn new(validator: Address, amount: Amount, requested_at_height: u64) -> Self {
        Self {
            validator,
            amount,
            requested_at_height,
            status: UnstakeStatus::Pending,
        }
    }
}
