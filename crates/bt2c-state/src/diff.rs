//! The pure, uncommitted result of applying a block.

use std::collections::BTreeMap;

use bt2c_crypto::Address;
use bt2c_ledger::{Account, Amount, UnstakeEntry, Validator};

/// The set of changes produced by [`crate::StateMachine::apply_block`],
/// not yet written through Store. Kept as a plain value so a block can
/// be applied and inspected (e.g. by tests, or speculatively by the
/// Block Producer) without committing it.
#[derive(Debug, Clone, Default)]
pub struct Diff {
    /// Touched accounts, keyed by address, holding their new state.
    pub accounts: BTreeMap<Address, Account>,
    /// Touched validators, keyed by address, holding their new state.
    pub validators: BTreeMap<Address, Validator>,
    /// Unstake entries newly appended to the FIFO queue.
    pub unstake_entries: Vec<UnstakeEntry>,
    /// String-form nonces newly observed: `(sender, nonce_bytes,
    /// timestamp)`.
    pub nonce_records: Vec<(Address, Vec<u8>, u64)>,
    /// Total reward (base issuance + fees) credited this block.
    pub reward_issued: Amount,
    /// Running total of all coins ever issued, after this block.
    pub total_issued_after: Amount,
}

impl Diff {
    /// Fetch a touched account, if this diff modified it.
    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Fetch a touched validator, if this diff modified it.
    pub fn validator(&self, address: &Address) -> Option<&Validator> {
        self.validators.get(address)
    }
}
