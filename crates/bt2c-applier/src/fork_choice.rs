//! Fork-choice: longest-cumulative-stake-weight chain, smaller-hash
//! tie-break, bounded reorg depth (§4.7).

use bt2c_crypto::Hash;

use crate::chain::ChainState;

/// Maximum depth of chain divergence eligible for an in-process reorg;
/// deeper divergence is reported as [`HeadDecision::ResyncRequired`]
/// instead of replayed locally.
pub use bt2c_state::constants::MAX_REORG_DEPTH;

/// What the caller should do about the current set of known chain
/// tips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadDecision {
    /// The already-committed tip remains canonical; no action needed.
    KeepCurrent,
    /// `target` is heavier than the committed tip and within the
    /// reorg depth cap — the caller should unwind to the common
    /// ancestor and replay the blocks on `target`'s branch.
    ReorgTo { target: Hash, depth: u64 },
    /// `target` is heavier, but divergence exceeds
    /// [`MAX_REORG_DEPTH`] — too deep to replay locally; the caller
    /// should fall back to syncing the branch from a peer instead of
    /// rewriting history in place.
    ResyncRequired { target: Hash },
}

/// Pick the canonical head among every known leaf: heaviest
/// cumulative weight, ties broken by the numerically smaller hash.
pub fn heaviest_leaf(chain: &ChainState) -> Option<Hash> {
    chain
        .leaves()
        .into_iter()
        .max_by(|a, b| {
            a.cumulative_weight
                .cmp(&b.cumulative_weight)
                .then_with(|| b.hash.cmp(&a.hash))
        })
        .map(|e| e.hash)
}

/// Decide what to do given the current committed tip and the heaviest
/// known leaf.
pub fn decide(chain: &ChainState) -> HeadDecision {
    let Some(heaviest) = heaviest_leaf(chain) else {
        return HeadDecision::KeepCurrent;
    };
    let Some(current) = chain.committed_tip() else {
        return HeadDecision::ReorgTo { target: heaviest, depth: 0 };
    };
    if heaviest == current.hash {
        return HeadDecision::KeepCurrent;
    }
    let heaviest_entry = chain.get(&heaviest).expect("heaviest_leaf returns a known hash");
    if heaviest_entry.cumulative_weight <= current.cumulative_weight {
        return HeadDecision::KeepCurrent;
    }
    match chain.divergence_depth(heaviest, current.hash) {
        Some(depth) if depth <= MAX_REORG_DEPTH => HeadDecision::ReorgTo { target: heaviest, depth },
        _ => HeadDecision::ResyncRequired { target: heaviest },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainEntry;
    use bt2c_crypto::Address;

    fn entry(hash: Hash, prev: Hash, height: u64, weight: u128) -> ChainEntry {
        ChainEntry {
            hash,
            previous_hash: prev,
            height,
            validator: Address::system(),
            cumulative_weight: weight,
            committed: false,
        }
    }

    #[test]
    fn heavier_branch_wins_tie_break_by_hash_when_equal() {
        let mut chain = ChainState::new();
        chain.insert(entry([0u8; 32], [0xFFu8; 32], 0, 0));
        chain.insert(entry([1u8; 32], [0u8; 32], 1, 10));
        chain.insert(entry([2u8; 32], [0u8; 32], 1, 10));

        // Equal weight: smaller hash wins.
        assert_eq!(heaviest_leaf(&chain), Some([1u8; 32]));
    }

    #[test]
    fn keeps_current_when_it_is_already_heaviest() {
        let mut chain = ChainState::new();
        chain.insert(entry([0u8; 32], [0xFFu8; 32], 0, 0));
        chain.insert(entry([1u8; 32], [0u8; 32], 1, 10));
        chain.mark_committed(&[1u8; 32]);
        chain.insert(entry([2u8; 32], [0u8; 32], 1, 5));

        assert_eq!(decide(&chain), HeadDecision::KeepCurrent);
    }

    #[test]
    fn reorgs_to_heavier_shallow_fork() {
        let mut chain = ChainState::new();
        chain.insert(entry([0u8; 32], [0xFFu8; 32], 0, 0));
        chain.insert(entry([1u8; 32], [0u8; 32], 1, 5));
        chain.mark_committed(&[1u8; 32]);
        chain.insert(entry([2u8; 32], [0u8; 32], 1, 10));

        assert_eq!(
            decide(&chain),
            HeadDecision::ReorgTo { target: [2u8; 32], depth: 1 }
        );
    }
}
