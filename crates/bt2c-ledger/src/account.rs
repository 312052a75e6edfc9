//! Account state: balance, stake, and nonce bookkeeping.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use bt2c_crypto::Address;

/// The on-ledger state of a single address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// This account's address.
    pub address: Address,
    /// Spendable balance.
    pub balance: Amount,
    /// Amount currently locked in validator stake.
    pub staked: Amount,
    /// Next expected sequential nonce for transactions from this
    /// account.
    pub next_nonce: u64,
}

impl Account {
    /// A fresh, empty account at `address`.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            balance: Amount::ZERO,
            staked: Amount::ZERO,
            next_nonce: 0,
        }
    }

    /// Total of spendable balance plus locked stake.
    pub fn total(&self) -> Amount {
        self.balance
            .checked_add(self.staked)
            .expect("balance + staked overflow implies a prior bookkeeping bug")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_is_empty() {
        let acc = Account::new(Address::system());
        assert!(acc.balance.is_zero());
        assert!(acc.staked.is_zero());
        assert_eq!(acc.next_nonce, 0);
    }

    #[test]
    fn total_sums_balance_and_stake() {
        let mut acc = Account::new(Address::system());
        acc.balance = Amount::from_whole(5);
        acc.staked = Amount::from_whole(3);
        assert_eq!(acc.total(), Amount::from_whole(8));
    }
}
