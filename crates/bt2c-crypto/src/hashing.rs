//! Content hashing and Merkle roots.
//!
//! All content hashes in BT2C are SHA3-256. Merkle trees are binary with
//! the final odd node duplicated, per the ledger model's Merkle contract.

use sha3::{Digest, Sha3_256};

/// A 32-byte SHA3-256 hash.
pub type Hash = [u8; 32];

/// Hash arbitrary bytes with SHA3-256.
pub fn hash(data: &[u8]) -> Hash {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash the concatenation of two 32-byte nodes (used internally by Merkle
/// tree construction).
fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha3_256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Compute the Merkle root of an ordered list of leaf hashes.
///
/// Uses a binary SHA3-256 tree; if a level has an odd number of nodes the
/// final node is duplicated to pair with itself. An empty list of leaves
/// yields the all-zero hash.
pub fn merkle_root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return [0u8; 32];
    }
    let mut level: Vec<Hash> = leaves.to_vec();
    while level.len() > 1 {
        if level.len() % 2 == 1 {
            level.push(*level.last().unwrap());
        }
        level = level
            .chunks_exact(2)
            .map(|pair| hash_pair(&pair[0], &pair[1]))
            .collect();
    }
    level[0]
}
