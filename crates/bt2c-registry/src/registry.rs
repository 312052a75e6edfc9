//! Validator lifecycle management: registration, block-production
//! bookkeeping, slashing, jailing, and the rate-limited unstake queue.
//!
//! Complements [`bt2c_state::StateMachine`] rather than overlapping
//! it: `StateMachine::apply_block` handles the per-transaction effects
//! of `Stake`/`Unstake` transactions (moving `Account`/`Validator`
//! stake fields), while this module owns the bookkeeping that happens
//! *around* blocks — reputation accrual, slashing penalties, jail/
//! tombstone transitions, and draining the unstake queue at a rate
//! the network can absorb.

use std::sync::Arc;

use bt2c_crypto::Address;
use bt2c_ledger::{Account, Amount, EvidenceKind, UnstakeEntry, UnstakeStatus, Validator, ValidatorStatus};
use bt2c_state::constants::{min_stake, JAIL_SECONDS, TOMBSTONE_THRESHOLD, UNSTAKE_DAILY_RATE_PERCENT};
use bt2c_store::{columns, BatchOp, Store};
use tracing::instrument;

use crate::errors::RegistryError;
use crate::slashing;

const KEY_UNSTAKE_WINDOW: &[u8] = b"unstake_window";

fn validator_key(address: &Address) -> Vec<u8> {
    address.as_bytes().to_vec()
}

fn account_key(address: &Address) -> Vec<u8> {
    address.as_bytes().to_vec()
}

fn unstake_key(height: u64, validator: &Address, seq: u32) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + 20 + 4);
    key.extend_from_slice(&height.to_be_bytes());
    key.extend_from_slice(validator.as_bytes());
    key.extend_from_slice(&seq.to_be_bytes());
    key
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, RegistryError> {
    bincode::deserialize(bytes)
        .map_err(|_| RegistryError::Store(bt2c_store::StoreError::Backend("corrupt record".into())))
}

/// A rolling 24h accumulator of unstake funds released, so
/// [`Registry::process_unstake_queue`] never exceeds the network's
/// daily release cap.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
struct UnstakeWindow {
    window_start: u64,
    processed_units: u64,
}

/// Owns no state beyond a `Store` handle; every method loads,
/// mutates, and writes back through one atomic batch.
pub struct Registry {
    store: Arc<dyn Store>,
}

impl Registry {
    /// Build a registry over `store`.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    fn load_validator(&self, address: &Address) -> Result<Validator, RegistryError> {
        self.store
            .get(columns::CF_VALIDATORS, &validator_key(address))?
            .map(|bytes| decode(&bytes))
            .transpose()?
            .ok_or(RegistryError::UnknownValidator(*address))
    }

    fn all_validators(&self) -> Result<Vec<Validator>, RegistryError> {
        self.store
            .prefix_scan(columns::CF_VALIDATORS, &[])?
            .into_iter()
            .map(|(_, bytes)| decode(&bytes))
            .collect()
    }

    fn put_validator(&self, validator: &Validator) -> Result<(), RegistryError> {
        let bytes = bincode::serialize(validator).expect("Validator serialization cannot fail");
        self.store.write_batch(vec![BatchOp::put(
            columns::CF_VALIDATORS,
            validator_key(&validator.address),
            bytes,
        )])?;
        Ok(())
    }

    /// Fetch a validator's current record, if registered.
    pub fn get(&self, address: &Address) -> Result<Option<Validator>, RegistryError> {
        Ok(self
            .store
            .get(columns::CF_VALIDATORS, &validator_key(address))?
            .map(|bytes| decode(&bytes))
            .transpose()?)
    }

    /// Register a new validator directly (bypassing the transaction
    /// path — used by genesis bootstrapping). Transitions to `Active`
    /// only if `initial_stake >= MIN_STAKE`.
    pub fn register(
        &self,
        address: Address,
        public_key: bt2c_crypto::PublicKey,
        initial_stake: Amount,
    ) -> Result<(), RegistryError> {
        let mut validator = Validator::new(address, public_key, initial_stake);
        validator.status = if initial_stake >= min_stake() {
            ValidatorStatus::Active
        } else {
            ValidatorStatus::Inactive
        };
        self.put_validator(&validator)
    }

    /// Record that `validator` produced the block at `height`:
    /// increments reputation by one point and updates
    /// `last_block_height`.
    #[instrument(skip(self))]
    pub fn record_block(&self, validator: &Address, height: u64) -> Result<(), RegistryError> {
        let mut v = self.load_validator(validator)?;
        v.reputation += 1.0;
        v.last_block_height = Some(height);
        self.put_validator(&v)
    }

    /// Apply a slashing penalty for `kind`, per the contract: 50% of
    /// stake for a double-sign, 10% plus a jail for unavailability.
    /// Tombstones a validator whose double-sign count within the
    /// rolling window reaches the threshold.
    #[instrument(skip(self))]
    pub fn slash(&self, validator_addr: &Address, kind: EvidenceKind, now: u64) -> Result<(), RegistryError> {
        let mut v = self.load_validator(validator_addr)?;
        let penalty = match kind {
            EvidenceKind::DoubleSign => v.stake.halved(),
            EvidenceKind::Unavailability => Amount::from_units(v.stake.units() / 10),
        };
        v.stake = v.stake.checked_sub(penalty)?;

        match kind {
            EvidenceKind::DoubleSign => {
                v.reputation = 0.0;
                v.double_sign_count += 1;
                let count = slashing::record_and_count(self.store.as_ref(), validator_addr, now)?;
                if count >= TOMBSTONE_THRESHOLD {
                    v.status = ValidatorStatus::Tombstoned;
                } else if v.stake < min_stake() {
                    v.status = ValidatorStatus::Inactive;
                }
            }
            EvidenceKind::Unavailability => {
                v.status = ValidatorStatus::Jailed;
                v.jailed_until = Some(now + JAIL_SECONDS);
            }
        }

        // The slashed penalty is burned, never credited anywhere, so
        // the account's own staked figure has to fall with it or
        // get_stake()/Account::total() would keep reporting stake the
        // validator no longer has. Saturating, not checked: a
        // validator registered without ever routing through
        // `StateMachine::apply_stake` (genesis aside) has no matching
        // `Account` record to begin with, and zero is the right floor
        // regardless.
        let mut account = self.load_account(validator_addr)?;
        account.staked = account.staked.checked_sub(penalty).unwrap_or(Amount::ZERO);

        self.store.write_batch(vec![
            BatchOp::put(
                columns::CF_VALIDATORS,
                validator_key(validator_addr),
                bincode::serialize(&v).expect("Validator serialization cannot fail"),
            ),
            BatchOp::put(
                columns::CF_ACCOUNTS,
                account_key(validator_addr),
                bincode::serialize(&account).expect("Account serialization cannot fail"),
            ),
        ])?;
        Ok(())
    }

    /// Move every `Jailed` validator whose jail window has elapsed
    /// back to `Active`, provided their stake still clears the
    /// minimum. A validator left under-staked stays `Jailed` until it
    /// restakes.
    #[instrument(skip(self))]
    pub fn unjail(&self, now: u64) -> Result<Vec<Address>, RegistryError> {
        let mut unjailed = Vec::new();
        for mut v in self.all_validators()? {
            if v.status != ValidatorStatus::Jailed {
                continue;
            }
            let Some(until) = v.jailed_until else { continue };
            if now >= until && v.stake >= min_stake() {
                v.status = ValidatorStatus::Active;
                v.jailed_until = None;
                unjailed.push(v.address);
                self.put_validator(&v)?;
            }
        }
        Ok(unjailed)
    }

    fn total_network_stake(&self) -> Result<Amount, RegistryError> {
        let mut total = Amount::ZERO;
        for v in self.all_validators()? {
            total = total.checked_add(v.stake)?;
        }
        Ok(total)
    }

    fn load_unstake_window(&self, now: u64) -> Result<UnstakeWindow, RegistryError> {
        let window = match self.store.get(columns::CF_METADATA, KEY_UNSTAKE_WINDOW)? {
            Some(bytes) => decode(&bytes)?,
            None => UnstakeWindow {
                window_start: now,
                processed_units: 0,
            },
        };
        if now.saturating_sub(window.window_start) >= 86_400 {
            Ok(UnstakeWindow {
                window_start: now,
                processed_units: 0,
            })
        } else {
            Ok(window)
        }
    }

    /// Drain FIFO-pending unstake entries, releasing their funds to
    /// the requester's spendable balance, without letting the
    /// cumulative amount released in the trailing 24h exceed
    /// `UNSTAKE_DAILY_RATE_PERCENT` of total network stake. Processes
    /// entries strictly in FIFO order: once the cap would be
    /// exceeded, later entries wait for the next call rather than
    /// being skipped over.
    #[instrument(skip(self))]
    pub fn process_unstake_queue(&self, now: u64) -> Result<Vec<UnstakeEntry>, RegistryError> {
        let mut window = self.load_unstake_window(now)?;
        let total_stake = self.total_network_stake()?;
        let cap_units = (total_stake.units() as u128 * UNSTAKE_DAILY_RATE_PERCENT as u128 / 100) as u64;

        let mut processed = Vec::new();
        let mut ops = Vec::new();

        for (key, bytes) in self.store.prefix_scan(columns::CF_UNSTAKE_QUEUE, &[])? {
            let mut entry: UnstakeEntry = decode(&bytes)?;
            if entry.status != UnstakeStatus::Pending {
                continue;
            }
            if window.processed_units.saturating_add(entry.amount.units()) > cap_units {
                break;
            }

            let mut account = self.load_account(&entry.validator)?;
            account.balance = account.balance.checked_add(entry.amount)?;
            ops.push(BatchOp::put(
                columns::CF_ACCOUNTS,
                account_key(&entry.validator),
                bincode::serialize(&account).expect("Account serialization cannot fail"),
            ));

            window.processed_units = window.processed_units.saturating_add(entry.amount.units());
            entry.status = UnstakeStatus::Processed;
            ops.push(BatchOp::put(
                columns::CF_UNSTAKE_QUEUE,
                key,
                bincode::serialize(&entry).expect("UnstakeEntry serialization cannot fail"),
            ));
            processed.push(entry);
        }

        if !processed.is_empty() {
            ops.push(BatchOp::put(
                columns::CF_METADATA,
                KEY_UNSTAKE_WINDOW.to_vec(),
                bincode::serialize(&window).expect("UnstakeWindow serialization cannot fail"),
            ));
            self.store.write_batch(ops)?;
        }

        Ok(processed)
    }

    fn load_account(&self, address: &Address) -> Result<Account, RegistryError> {
        match self.store.get(columns::CF_ACCOUNTS, &account_key(address))? {
            Some(bytes) => decode(&bytes),
            None => Ok(Account::new(*address)),
        }
    }
}
