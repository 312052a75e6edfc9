//! Slashing evidence records.

use serde::{Deserialize, Serialize};

use bt2c_crypto::{Address, Hash};

/// The kind of fault a piece of evidence attests to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvidenceKind {
    /// The validator signed two conflicting blocks at the same height.
    DoubleSign,
    /// The validator failed to produce a block during its assigned
    /// slot.
    Unavailability,
}

/// A slashing evidence record submitted against a validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    /// The accused validator.
    pub validator: Address,
    /// The kind of fault.
    pub kind: EvidenceKind,
    /// The height at which the fault occurred.
    pub height: u64,
    /// Hashes of the two conflicting blocks, for `DoubleSign` evidence.
    pub conflicting_hashes: Option<(Hash, Hash)>,
}

impl Evidence {
    /// Construct double-sign evidence for two conflicting block hashes
    /// at `height`.
    pub fn double_sign(validator: Address, height: u64, a: Hash, b: Hash) -> Self {
        Self {
            validator,
            kind: EvidenceKind::DoubleSign,
            height,
            conflicting_hashes: Some((a, b)),
        }
    }

    /// Construct unavailability evidence for a missed slot at `height`.
    pub fn unavailability(validator: Address, height: u64) -> Self {
        Self {
            validator,
            kind: EvidenceKind::Unavailability,
            height,
            conflicting_hashes: None,
        }
    }
}
