//! The `Network` port: gossip/broadcast is a named collaborator of
//! this design, not a module it implements. This trait is the seam a
//! real peer-to-peer layer would plug into; [`NullNetwork`] is the
//! only implementation this workspace carries, for single-node
//! devnets and tests.

use bt2c_ledger::{Block, Transaction};
use tracing::debug;

/// What the driver needs from a peer-to-peer layer: announcing
/// locally-produced blocks and locally-admitted transactions.
/// Receiving from peers happens on the other side of
/// [`crate::context::Inbound`], not through this trait.
pub trait Network: Send + Sync {
    /// Announce a newly committed block to peers.
    fn broadcast_block(&self, block: &Block);
    /// Announce a transaction admitted to the local mempool.
    fn broadcast_transaction(&self, tx: &Transaction);
}

/// A `Network` that only logs what it would have sent.
#[derive(Debug, Default)]
pub struct NullNetwork;

impl Network for NullNetwork {
    fn broadcast_block(&self, block: &Block) {
        debug!(height = block.height, hash = ?block.hash, "null network: would broadcast block");
    }

    fn broadcast_transaction(&self, tx: &Transaction) {
        debug!(hash = ?tx.hash(), "null network: would broadcast transaction");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bt2c_crypto::Address;
    use bt2c_ledger::Amount;

    #[test]
    fn null_network_does_not_panic_on_broadcast() {
        let network = NullNetwork;
        let block = Block {
            height: 0,
            previous_hash: [0u8; 32],
            timestamp: 0,
            validator: Address::system(),
            transactions: vec![],
            merkle_root: [0u8; 32],
            reward: Amount::ZERO,
            signature: None,
            hash: [0u8; 32],
        };
        network.broadcast_block(&block);
    }
}
