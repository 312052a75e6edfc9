//! The pending-transaction pool: `admit`/`select_batch`/`expire`/
//! `purge_sealed`, grounded on the teacher's `TransactionPool` but
//! narrowed to this ledger's rules (no RBF/CPFP — not named by the
//! contract, so left out rather than invented).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use bt2c_crypto::{Address, Hash};
use bt2c_ledger::{Amount, Block, Transaction};
use tracing::instrument;

use crate::errors::AdmitError;
use crate::priced::PricedTransaction;
use crate::rate_limiter::RateLimiter;
use crate::state_provider::StateProvider;
use crate::status::MempoolStatus;

/// Reject transactions whose timestamp is more than this far in the
/// future, per the contract's timestamp policy.
pub const MAX_FUTURE_SKEW_SECS: u64 = 300;
/// Evict (and refuse to admit) transactions older than this.
pub const MAX_AGE_SECS: u64 = 24 * 3_600;

struct Entry {
    tx: Transaction,
    added_at: u64,
}

/// A pending-transaction pool. Generic over the ledger-state and
/// rate-limiter ports so it can be driven against a real
/// [`bt2c_state::StateMachine`]-backed adapter in production or a
/// fixture in tests.
pub struct Mempool<S, R> {
    by_hash: HashMap<Hash, Entry>,
    by_price: BTreeSet<PricedTransaction>,
    by_sender: HashMap<Address, BTreeMap<u64, Hash>>,
    state: S,
    rate_limiter: R,
}

impl<S: StateProvider, R: RateLimiter> Mempool<S, R> {
    /// Build an empty pool backed by `state` and `rate_limiter`.
    pub fn new(state: S, rate_limiter: R) -> Self {
        Self {
            by_hash: HashMap::new(),
            by_price: BTreeSet::new(),
            by_sender: HashMap::new(),
            state,
            rate_limiter,
        }
    }

    /// Number of transactions currently admitted.
    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    /// True if no transactions are admitted.
    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    /// A snapshot of pool contents for logging/metrics.
    pub fn status(&self, now: u64) -> MempoolStatus {
        let total_fees = self
            .by_hash
            .values()
            .fold(Amount::ZERO, |acc, e| acc.checked_add(e.tx.fee).unwrap_or(acc));
        let oldest_age_secs = self
            .by_hash
            .values()
            .map(|e| now.saturating_sub(e.added_at))
            .max()
            .unwrap_or(0);
        MempoolStatus {
            pending_count: self.by_hash.len(),
            total_fees,
            oldest_age_secs,
        }
    }

    fn pending_total_for_sender(&self, sender: &Address) -> Amount {
        self.by_sender
            .get(sender)
            .into_iter()
            .flat_map(|m| m.values())
            .filter_map(|h| self.by_hash.get(h))
            .fold(Amount::ZERO, |acc, e| {
                acc.checked_add(e.tx.amount)
                    .and_then(|a| a.checked_add(e.tx.fee))
                    .unwrap_or(acc)
            })
    }

    fn sequential_nonce(tx: &Transaction) -> Option<u64> {
        match &tx.nonce {
            bt2c_ledger::transaction::Nonce::Sequential(n) => Some(*n),
            bt2c_ledger::transaction::Nonce::Unique(_) => None,
        }
    }

    /// Admit `tx` into the pool, subject to the contract's full
    /// checklist: structural validity, signature, replay, timestamp
    /// window, balance, dynamic fee floor, duplicate/cap/rate limit.
    #[instrument(skip(self, tx), fields(hash = ?tx.hash()))]
    pub fn admit(&mut self, tx: Transaction, now: u64) -> Result<(), AdmitError> {
        if tx.is_system_credit() {
            return Err(AdmitError::SystemCreditRejected);
        }
        tx.validate_shape()?;

        let hash = tx.hash();
        if self.by_hash.contains_key(&hash) {
            return Err(AdmitError::DuplicateInMempool(hash));
        }
        if !tx.verify_signature() {
            return Err(AdmitError::BadSignature { tx_hash: hash });
        }
        if tx.timestamp > now.saturating_add(MAX_FUTURE_SKEW_SECS) {
            return Err(AdmitError::FutureTimestamp {
                timestamp: tx.timestamp,
                now,
            });
        }
        if now.saturating_sub(tx.timestamp) > MAX_AGE_SECS {
            return Err(AdmitError::StaleTimestamp {
                timestamp: tx.timestamp,
                now,
            });
        }
        if let Some(n) = Self::sequential_nonce(&tx) {
            if let Some(existing) = self.by_sender.get(&tx.sender).and_then(|m| m.get(&n)) {
                if *existing != hash {
                    return Err(AdmitError::ReplayedNonce { sender: tx.sender });
                }
                return Err(AdmitError::DuplicateInMempool(*existing));
            }
        }

        let min_fee = self.state.min_fee(self.by_hash.len());
        if tx.fee < min_fee {
            return Err(AdmitError::InsufficientFee {
                fee: tx.fee,
                minimum: min_fee,
            });
        }

        let available = self.state.balance(&tx.sender);
        let pending_total = self.pending_total_for_sender(&tx.sender);
        let required = pending_total
            .checked_add(tx.amount)?
            .checked_add(tx.fee)?;
        if required > available {
            if pending_total.is_zero() {
                return Err(AdmitError::InsufficientBalance {
                    sender: tx.sender,
                    required,
                    available,
                });
            }
            return Err(AdmitError::SenderPendingCap { sender: tx.sender });
        }

        if !self.rate_limiter.check(&tx.sender, now) {
            return Err(AdmitError::RateLimited { sender: tx.sender });
        }

        self.by_price
            .insert(PricedTransaction::new(tx.fee, tx.timestamp, hash));
        if let Some(n) = Self::sequential_nonce(&tx) {
            self.by_sender.entry(tx.sender).or_default().insert(n, hash);
        }
        self.by_hash.insert(hash, Entry { tx, added_at: now });
        Ok(())
    }

    /// Select an ordered batch for block inclusion: descending fee,
    /// ties broken by ascending timestamp then hash, never exceeding
    /// `max_bytes` of canonical transaction encoding, and never
    /// skipping ahead of a sender's next expected sequential nonce.
    pub fn select_batch(&self, max_bytes: usize) -> Vec<Transaction> {
        let mut result = Vec::new();
        let mut used_bytes = 0usize;
        let mut sender_next: HashMap<Address, u64> = HashMap::new();

        for priced in &self.by_price {
            let Some(entry) = self.by_hash.get(&priced.hash) else {
                continue;
            };
            let tx = &entry.tx;

            if let Some(n) = Self::sequential_nonce(tx) {
                let expected = *sender_next.entry(tx.sender).or_insert_with(|| {
                    self.by_sender
                        .get(&tx.sender)
                        .and_then(|m| m.keys().next().copied())
                        .unwrap_or(n)
                });
                if n != expected {
                    continue;
                }
            }

            let size = bt2c_ledger::encoding::tx_bytes(tx).len();
            if used_bytes.saturating_add(size) > max_bytes {
                continue;
            }

            used_bytes += size;
            if let Some(n) = Self::sequential_nonce(tx) {
                sender_next.insert(tx.sender, n + 1);
            }
            result.push(tx.clone());
        }

        result
    }

    /// Evict every transaction older than [`MAX_AGE_SECS`] as of `now`.
    pub fn expire(&mut self, now: u64) {
        let stale: Vec<Hash> = self
            .by_hash
            .iter()
            .filter(|(_, e)| now.saturating_sub(e.added_at) > MAX_AGE_SECS)
            .map(|(h, _)| *h)
            .collect();
        for hash in stale {
            self.remove(&hash);
        }
    }

    /// Remove every transaction contained in a freshly committed
    /// block, regardless of whose priority queue slot it occupied.
    pub fn purge_sealed(&mut self, block: &Block) {
        for tx in &block.transactions {
            self.remove(&tx.hash());
        }
    }

    fn remove(&mut self, hash: &Hash) -> Option<Transaction> {
        let entry = self.by_hash.remove(hash)?;
        self.by_price
            .remove(&PricedTransaction::new(entry.tx.fee, entry.tx.timestamp, *hash));
        if let Some(n) = Self::sequential_nonce(&entry.tx) {
            if let Some(senders) = self.by_sender.get_mut(&entry.tx.sender) {
                senders.remove(&n);
                if senders.is_empty() {
                    self.by_sender.remove(&entry.tx.sender);
                }
            }
        }
        Some(entry.tx)
    }
}
