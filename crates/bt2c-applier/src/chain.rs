//! In-memory view of known block headers and their cumulative
//! production weight, used to decide fork-choice before anything is
//! committed through Store.
//!
//! Grounded on the teacher's header-tree `ChainState`, simplified from
//! its LMD-GHOST attestation voting down to this design's simpler
//! fork-choice rule: cumulative stake-at-production-time, no votes.

use std::collections::HashMap;

use bt2c_crypto::{Address, Hash};

/// A known block header, with the accumulated weight of the chain
/// ending at it.
#[derive(Debug, Clone)]
pub struct ChainEntry {
    /// This block's own hash.
    pub hash: Hash,
    /// Hash of the block it extends.
    pub previous_hash: Hash,
    /// Height of this block.
    pub height: u64,
    /// Address that produced this block.
    pub validator: Address,
    /// Sum of producer stake-at-production-time over every block from
    /// genesis to this one, inclusive.
    pub cumulative_weight: u128,
    /// Whether this entry has been applied and committed through
    /// Store, as opposed to merely buffered pending fork-choice.
    pub committed: bool,
}

/// The known header tree: every block this node has validated
/// structurally, whether or not it has been committed.
#[derive(Debug, Default)]
pub struct ChainState {
    entries: HashMap<Hash, ChainEntry>,
    children: HashMap<Hash, Vec<Hash>>,
    committed_tip: Option<Hash>,
}

impl ChainState {
    /// An empty chain state, with no genesis yet recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `entry` in the header tree. Does not itself decide
    /// canonicity — call [`ChainState::mark_committed`] once the
    /// caller has actually applied it through Store.
    pub fn insert(&mut self, entry: ChainEntry) {
        self.children
            .entry(entry.previous_hash)
            .or_default()
            .push(entry.hash);
        self.entries.insert(entry.hash, entry);
    }

    /// True if `hash` is already known (committed or buffered).
    pub fn contains(&self, hash: &Hash) -> bool {
        self.entries.contains_key(hash)
    }

    /// Look up a known entry by hash.
    pub fn get(&self, hash: &Hash) -> Option<&ChainEntry> {
        self.entries.get(hash)
    }

    /// Every known block at `height`, committed or buffered.
    pub fn at_height(&self, height: u64) -> Vec<&ChainEntry> {
        self.entries.values().filter(|e| e.height == height).collect()
    }

    /// Mark `hash` as committed and advance the committed tip.
    pub fn mark_committed(&mut self, hash: &Hash) {
        if let Some(entry) = self.entries.get_mut(hash) {
            entry.committed = true;
        }
        self.committed_tip = Some(*hash);
    }

    /// The currently committed chain tip, if any block has been
    /// committed yet.
    pub fn committed_tip(&self) -> Option<&ChainEntry> {
        self.committed_tip.and_then(|h| self.entries.get(&h))
    }

    /// Every leaf (childless) entry in the known tree — candidate
    /// chain tips for fork-choice.
    pub fn leaves(&self) -> Vec<&ChainEntry> {
        self.entries
            .values()
            .filter(|e| {
                self.children
                    .get(&e.hash)
                    .map(|c| c.is_empty())
                    .unwrap_or(true)
            })
            .collect()
    }

    /// Walk from `hash` back to genesis (`previous_hash` all-zero),
    /// returning the chain of hashes in ancestor-first order.
    pub fn ancestry(&self, hash: Hash) -> Vec<Hash> {
        let mut path = vec![hash];
        let mut current = hash;
        while let Some(entry) = self.entries.get(&current) {
            if entry.height == 0 {
                break;
            }
            path.push(entry.previous_hash);
            current = entry.previous_hash;
        }
        path.reverse();
        path
    }

    /// Depth, in blocks, from the last common ancestor of `a` and `b`
    /// to `a`. `None` if the two share no recorded ancestor (e.g. one
    /// is unknown).
    pub fn divergence_depth(&self, a: Hash, b: Hash) -> Option<u64> {
        let path_a = self.ancestry(a);
        let path_b: std::collections::HashSet<Hash> = self.ancestry(b).into_iter().collect();
        let common_len = path_a.iter().take_while(|h| path_b.contains(*h)).count();
        if common_len == 0 {
            return None;
        }
        Some((path_a.len() - common_len) as u64)
    }
}
