//! Ordinary (post-genesis) block assembly and signing.

use bt2c_crypto::{merkle_root, Address, Hash, KeyPair};
use bt2c_ledger::{Amount, Block, Transaction};

/// Outcome of one production slot.
///
/// A validator selected for height `h` has [`PRODUCTION_DEADLINE_SECS`]
/// (see `bt2c_state::constants`) after the slot's scheduled time to
/// produce and broadcast a block before the slot is abandoned; the
/// driver that owns the clock decides between these, `BlockProducer`
/// only ever returns [`SlotOutcome::Produced`].
#[derive(Debug, Clone)]
pub enum SlotOutcome {
    /// A block was produced and signed for this slot.
    Produced(Block),
    /// This validator was selected but failed to produce within the
    /// deadline; the caller should record an unavailability strike and
    /// re-run selection for the same height.
    MissedDeadline,
    /// This validator was not the one selected for this slot.
    NotSelected,
}

/// Assembles and signs blocks on behalf of one validator identity.
pub struct BlockProducer {
    keypair: KeyPair,
}

impl BlockProducer {
    /// Build a producer that signs on behalf of `keypair`.
    pub fn new(keypair: KeyPair) -> Self {
        Self { keypair }
    }

    /// This producer's validator address.
    pub fn address(&self) -> Address {
        self.keypair.address()
    }

    /// Assemble, hash, and sign a block at `height` extending
    /// `previous_hash`, carrying `txs` (already selected from the
    /// mempool by the caller) and crediting `reward` to this
    /// producer's address.
    ///
    /// Does not touch Store or the state machine — the caller applies
    /// and commits the returned block, and only then broadcasts it.
    pub fn produce(
        &self,
        height: u64,
        previous_hash: Hash,
        timestamp: u64,
        txs: Vec<Transaction>,
        reward: Amount,
    ) -> Block {
        let leaves: Vec<Hash> = txs.iter().map(Transaction::hash).collect();
        let root = merkle_root(&leaves);

        let mut block = Block {
            height,
            previous_hash,
            timestamp,
            validator: self.address(),
            transactions: txs,
            merkle_root: root,
            reward,
            signature: None,
            hash: [0u8; 32],
        };
        block.hash = bt2c_ledger::encoding::block_hash(&block);
        block.signature = Some(self.keypair.sign(&block.hash));
        block
    }
}
