//! Blocks: the unit of consensus.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::errors::LedgerError;
use crate::transaction::Transaction;
use bt2c_crypto::{merkle_root, Address, Hash, Signature};

/// A block in the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Height of this block; genesis is height 0.
    pub height: u64,
    /// Hash of the immediately preceding block; all-zero for genesis.
    pub previous_hash: Hash,
    /// Unix timestamp (seconds) at which this block was produced.
    pub timestamp: u64,
    /// Address of the validator that produced this block.
    pub validator: Address,
    /// The ordered list of transactions included in this block.
    pub transactions: Vec<Transaction>,
    /// Merkle root over `transactions`' hashes, in order.
    pub merkle_root: Hash,
    /// Total block reward credited to `validator` for producing this
    /// block (base reward plus collected fees).
    pub reward: Amount,
    /// The validator's signature over this block's header hash.
    pub signature: Option<Signature>,
    /// This block's own canonical hash.
    pub hash: Hash,
}

impl Block {
    /// Recompute the Merkle root over `transactions` and compare it
    /// against the `merkle_root` field.
    pub fn verify_merkle_root(&self) -> Result<(), LedgerError> {
        let leaves: Vec<Hash> = self.transactions.iter().map(Transaction::hash).collect();
        if merkle_root(&leaves) == self.merkle_root {
            Ok(())
        } else {
            Err(LedgerError::MerkleRootMismatch)
        }
    }

    /// Recompute this block's header hash and compare it against the
    /// `hash` field.
    pub fn verify_hash(&self) -> Result<(), LedgerError> {
        if crate::encoding::block_hash(self) == self.hash {
            Ok(())
        } else {
            Err(LedgerError::HashMismatch)
        }
    }

    /// True if this is the genesis block (height 0, all-zero
    /// `previous_hash`).
    pub fn is_genesis(&self) -> bool {
        self.height == 0 && self.previous_hash == [0u8; 32]
    }
}
