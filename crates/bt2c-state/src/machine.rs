//! The state machine: `(state, block) -> state'`.

use std::sync::Arc;

use bt2c_crypto::Address;
use bt2c_ledger::{
    Account, Amount, Block, Transaction, TransactionType, UnstakeEntry, Validator, ValidatorStatus,
};
use bt2c_store::{columns, BatchOp, Store};
use tracing::instrument;

use crate::constants::{min_stake, MAX_SUPPLY_WHOLE};
use crate::context::ApplyContext;
use crate::diff::Diff;
use crate::errors::ApplyError;

const KEY_TOTAL_ISSUED: &[u8] = b"total_issued";

fn account_key(address: &Address) -> Vec<u8> {
    address.as_bytes().to_vec()
}

fn validator_key(address: &Address) -> Vec<u8> {
    address.as_bytes().to_vec()
}

fn nonce_key(sender: &Address, nonce_bytes: &[u8]) -> Vec<u8> {
    let mut key = sender.as_bytes().to_vec();
    key.extend_from_slice(nonce_bytes);
    key
}

fn unstake_key(height: u64, validator: &Address, seq: u32) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + 20 + 4);
    key.extend_from_slice(&height.to_be_bytes());
    key.extend_from_slice(validator.as_bytes());
    key.extend_from_slice(&seq.to_be_bytes());
    key
}

/// Applies validated blocks to the account/validator tables, computing
/// issuance and enforcing nonce/balance rules. Owns no mutable state
/// of its own beyond a `Store` handle — every application produces a
/// [`Diff`] that the caller may inspect before choosing to
/// [`StateMachine::commit`] it.
pub struct StateMachine {
    store: Arc<dyn Store>,
}

impl StateMachine {
    /// Construct a state machine over `store`.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Current spendable balance of `address` (zero if the account has
    /// never been credited).
    pub fn get_balance(&self, address: &Address) -> Result<Amount, ApplyError> {
        Ok(self.load_account_from_store(address)?.balance)
    }

    /// Current staked amount of `address`.
    pub fn get_stake(&self, address: &Address) -> Result<Amount, ApplyError> {
        Ok(self.load_account_from_store(address)?.staked)
    }

    /// Next expected sequential nonce for `address`.
    pub fn get_next_nonce(&self, address: &Address) -> Result<u64, ApplyError> {
        Ok(self.load_account_from_store(address)?.next_nonce)
    }

    /// Fetch a validator record, if one is registered.
    pub fn get_validator(&self, address: &Address) -> Result<Option<Validator>, ApplyError> {
        self.load_validator_from_store(address)
    }

    /// The running total of all coins ever issued.
    pub fn total_issued(&self) -> Result<Amount, ApplyError> {
        match self.store.get(columns::CF_METADATA, KEY_TOTAL_ISSUED)? {
            Some(bytes) => {
                let units: u64 = bincode::deserialize(&bytes)
                    .map_err(|_| ApplyError::Ledger(bt2c_ledger::LedgerError::HashMismatch))?;
                Ok(Amount::from_units(units))
            }
            None => Ok(Amount::ZERO),
        }
    }

    fn load_account_from_store(&self, address: &Address) -> Result<Account, ApplyError> {
        match self.store.get(columns::CF_ACCOUNTS, &account_key(address))? {
            Some(bytes) => {
                bincode::deserialize(&bytes).map_err(|_| ApplyError::Ledger(bt2c_ledger::LedgerError::HashMismatch))
            }
            None => Ok(Account::new(*address)),
        }
    }

    fn load_validator_from_store(
        &self,
        address: &Address,
    ) -> Result<Option<Validator>, ApplyError> {
        match self.store.get(columns::CF_VALIDATORS, &validator_key(address))? {
            Some(bytes) => bincode::deserialize(&bytes)
                .map(Some)
                .map_err(|_| ApplyError::Ledger(bt2c_ledger::LedgerError::HashMismatch)),
            None => Ok(None),
        }
    }

    fn load_account(&self, diff: &Diff, address: &Address) -> Result<Account, ApplyError> {
        match diff.accounts.get(address) {
            Some(acc) => Ok(acc.clone()),
            None => self.load_account_from_store(address),
        }
    }

    fn load_validator(&self, diff: &Diff, address: &Address) -> Result<Option<Validator>, ApplyError> {
        match diff.validators.get(address) {
            Some(v) => Ok(Some(v.clone())),
            None => self.load_validator_from_store(address),
        }
    }

    /// Check and advance a sender's nonce against `diff`/Store,
    /// recording a Unique-nonce observation into `diff` where
    /// applicable.
    fn check_and_advance_nonce(
        &self,
        diff: &mut Diff,
        sender_acc: &mut Account,
        tx: &Transaction,
    ) -> Result<(), ApplyError> {
        match &tx.nonce {
            bt2c_ledger::transaction::Nonce::Sequential(n) => {
                if *n != sender_acc.next_nonce {
                    if *n < sender_acc.next_nonce {
                        return Err(ApplyError::ReplayedNonce { sender: tx.sender });
                    }
                    return Err(ApplyError::NonceGap {
                        sender: tx.sender,
                        expected: sender_acc.next_nonce,
                        actual: *n,
                    });
                }
                sender_acc.next_nonce += 1;
                Ok(())
            }
            bt2c_ledger::transaction::Nonce::Unique(bytes) => {
                let key = nonce_key(&tx.sender, bytes);
                let already_recorded = diff
                    .nonce_records
                    .iter()
                    .any(|(s, b, _)| s == &tx.sender && b == bytes)
                    || self.store.exists(columns::CF_NONCES, &key)?;
                if already_recorded {
                    return Err(ApplyError::ReplayedNonce { sender: tx.sender });
                }
                diff.nonce_records.push((tx.sender, bytes.clone(), tx.timestamp));
                Ok(())
            }
        }
    }

    fn apply_transfer(&self, diff: &mut Diff, tx: &Transaction, block_validator: &Address) -> Result<(), ApplyError> {
        if !tx.verify_signature() {
            return Err(ApplyError::BadSignature { tx_hash: tx.hash() });
        }
        let mut sender_acc = self.load_account(diff, &tx.sender)?;
        self.check_and_advance_nonce(diff, &mut sender_acc, tx)?;

        let required = tx.amount.checked_add(tx.fee)?;
        if sender_acc.balance < required {
            return Err(ApplyError::InsufficientBalance {
                sender: tx.sender,
                required,
                available: sender_acc.balance,
            });
        }
        sender_acc.balance = sender_acc.balance.checked_sub(required)?;
        diff.accounts.insert(tx.sender, sender_acc);

        let mut recipient_acc = self.load_account(diff, &tx.recipient)?;
        recipient_acc.balance = recipient_acc.balance.checked_add(tx.amount)?;
        diff.accounts.insert(tx.recipient, recipient_acc);

        self.credit_fee(diff, block_validator, tx.fee)?;
        Ok(())
    }

    fn apply_stake(
        &self,
        diff: &mut Diff,
        tx: &Transaction,
        ctx: &ApplyContext,
        block_validator: &Address,
        developer_reward_issued_now: &mut bool,
    ) -> Result<(), ApplyError> {
        if !tx.verify_signature() {
            return Err(ApplyError::BadSignature { tx_hash: tx.hash() });
        }
        let mut sender_acc = self.load_account(diff, &tx.sender)?;
        self.check_and_advance_nonce(diff, &mut sender_acc, tx)?;

        let required = tx.amount.checked_add(tx.fee)?;
        if sender_acc.balance < required {
            return Err(ApplyError::InsufficientBalance {
                sender: tx.sender,
                required,
                available: sender_acc.balance,
            });
        }
        sender_acc.balance = sender_acc.balance.checked_sub(required)?;
        sender_acc.staked = sender_acc.staked.checked_add(tx.amount)?;

        let existing_validator = self.load_validator(diff, &tx.sender)?;
        let is_new_registration = existing_validator.is_none();
        let mut validator = match existing_validator {
            Some(v) => v,
            None => {
                // `verify_signature` already rejected this tx if
                // `sender_public_key` were absent, but we still refuse
                // to panic on it here rather than lean on that ordering.
                let pubkey = tx
                    .sender_public_key
                    .ok_or(ApplyError::BadSignature { tx_hash: tx.hash() })?;
                Validator::new(tx.sender, pubkey, Amount::ZERO)
            }
        };
        validator.stake = validator.stake.checked_add(tx.amount)?;

        if is_new_registration && ctx.within_distribution_period(tx.timestamp) {
            validator.stake = validator
                .stake
                .checked_add(crate::constants::early_validator_reward())?;
            sender_acc.staked = sender_acc
                .staked
                .checked_add(crate::constants::early_validator_reward())?;
            if !ctx.developer_reward_already_issued && !*developer_reward_issued_now {
                validator.stake = validator
                    .stake
                    .checked_add(crate::constants::developer_reward())?;
                sender_acc.staked = sender_acc
                    .staked
                    .checked_add(crate::constants::developer_reward())?;
                *developer_reward_issued_now = true;
            }
        }

        // A stake top-up can only move a validator between Active and
        // Inactive; Jailed/Tombstoned are exclusively Registry-owned
        // transitions (slash/unjail), untouched here.
        if matches!(
            validator.status,
            ValidatorStatus::Active | ValidatorStatus::Inactive
        ) {
            validator.status = if validator.stake >= min_stake() {
                ValidatorStatus::Active
            } else {
                ValidatorStatus::Inactive
            };
        }

        diff.accounts.insert(tx.sender, sender_acc);
        diff.validators.insert(tx.sender, validator);

        self.credit_fee(diff, block_validator, tx.fee)?;
        Ok(())
    }

    fn apply_unstake(
        &self,
        diff: &mut Diff,
        tx: &Transaction,
        block_height: u64,
        block_validator: &Address,
    ) -> Result<(), ApplyError> {
        if !tx.verify_signature() {
            return Err(ApplyError::BadSignature { tx_hash: tx.hash() });
        }
        let mut sender_acc = self.load_account(diff, &tx.sender)?;
        self.check_and_advance_nonce(diff, &mut sender_acc, tx)?;

        let mut validator = self
            .load_validator(diff, &tx.sender)?
            .ok_or(ApplyError::UnknownValidator(tx.sender))?;
        if validator.stake < tx.amount {
            return Err(ApplyError::InsufficientStake {
                validator: tx.sender,
                requested: tx.amount,
                available: validator.stake,
            });
        }
        if sender_acc.balance < tx.fee {
            return Err(ApplyError::InsufficientBalance {
                sender: tx.sender,
                required: tx.fee,
                available: sender_acc.balance,
            });
        }
        sender_acc.balance = sender_acc.balance.checked_sub(tx.fee)?;
        sender_acc.staked = sender_acc.staked.checked_sub(tx.amount)?;
        validator.stake = validator.stake.checked_sub(tx.amount)?;
        if validator.stake < min_stake() && matches!(validator.status, ValidatorStatus::Active) {
            validator.status = ValidatorStatus::Inactive;
        }

        diff.accounts.insert(tx.sender, sender_acc);
        diff.validators.insert(tx.sender, validator);
        diff.unstake_entries
            .push(UnstakeEntry::new(tx.sender, tx.amount, block_height));

        self.credit_fee(diff, block_validator, tx.fee)?;
        Ok(())
    }

    /// `Reward`/`Genesis` transactions credit the recipient's staked
    /// balance directly (auto-staked, matching the distribution-bonus
    /// rule and the genesis/first-block worked example).
    fn apply_system_credit(&self, diff: &mut Diff, tx: &Transaction) -> Result<Amount, ApplyError> {
        let mut recipient_acc = self.load_account(diff, &tx.recipient)?;
        recipient_acc.staked = recipient_acc.staked.checked_add(tx.amount)?;
        diff.accounts.insert(tx.recipient, recipient_acc);
        Ok(tx.amount)
    }

    fn credit_fee(&self, diff: &mut Diff, validator: &Address, fee: Amount) -> Result<(), ApplyError> {
        if fee.is_zero() {
            return Ok(());
        }
        let mut validator_acc = self.load_account(diff, validator)?;
        validator_acc.balance = validator_acc.balance.checked_add(fee)?;
        diff.accounts.insert(*validator, validator_acc);
        Ok(())
    }

    /// Reject any `Reward`/`Genesis` transaction that is not the one
    /// system-constructed credit this block is entitled to. A
    /// `Genesis` transaction is only legitimate inside the genesis
    /// block; a `Reward` transaction only inside an ordinary block,
    /// addressed to `block.validator` for exactly the halving-schedule
    /// amount. Called once per such transaction, with `seen` tracking
    /// whether this block has already spent its one allowance — a
    /// second `Reward`/`Genesis` transaction of any shape is how a
    /// producer would otherwise mint currency outside the schedule.
    fn check_system_credit(
        &self,
        block: &Block,
        tx: &Transaction,
        ctx: &ApplyContext,
        seen: bool,
    ) -> Result<(), ApplyError> {
        if seen {
            return Err(ApplyError::UnauthorizedSystemCredit);
        }
        match tx.kind {
            TransactionType::Genesis if block.is_genesis() => Ok(()),
            TransactionType::Reward if !block.is_genesis() => {
                let expected =
                    crate::issuance::block_reward(block.height, ctx.block_time_secs, ctx.halving_seconds);
                if tx.recipient == block.validator && tx.amount == expected {
                    Ok(())
                } else {
                    Err(ApplyError::UnauthorizedSystemCredit)
                }
            }
            _ => Err(ApplyError::UnauthorizedSystemCredit),
        }
    }

    /// Apply `block`'s transactions to a fresh [`Diff`], without
    /// committing. Does not re-verify header structure (previous
    /// hash, Merkle root, producer eligibility) — that is the Block
    /// Validator/Applier's job, run before this is called. Does
    /// independently enforce that `Reward`/`Genesis` transactions are
    /// the single system credit the block is entitled to
    /// (`check_system_credit`), since `bootstrap_genesis` calls this
    /// directly, without ever going through `Applier::validate_economic`.
    #[instrument(skip(self, block, ctx), fields(height = block.height))]
    pub fn apply_block(&self, block: &Block, ctx: &ApplyContext) -> Result<Diff, ApplyError> {
        let mut diff = Diff::default();
        let mut developer_reward_issued_now = false;
        let mut newly_issued = Amount::ZERO;
        let mut system_credit_seen = false;

        for tx in &block.transactions {
            tx.validate_shape()?;
            match tx.kind {
                TransactionType::Transfer => self.apply_transfer(&mut diff, tx, &block.validator)?,
                TransactionType::Stake => self.apply_stake(
                    &mut diff,
                    tx,
                    ctx,
                    &block.validator,
                    &mut developer_reward_issued_now,
                )?,
                TransactionType::Unstake => {
                    self.apply_unstake(&mut diff, tx, block.height, &block.validator)?
                }
                TransactionType::Reward | TransactionType::Genesis => {
                    self.check_system_credit(block, tx, ctx, system_credit_seen)?;
                    system_credit_seen = true;
                    newly_issued = newly_issued.checked_add(self.apply_system_credit(&mut diff, tx)?)?;
                }
            }
        }

        let total_before = self.total_issued()?;
        let total_after = total_before.checked_add(newly_issued)?;
        if total_after > Amount::from_whole(MAX_SUPPLY_WHOLE) {
            return Err(ApplyError::SupplyExceeded);
        }

        diff.reward_issued = newly_issued;
        diff.total_issued_after = total_after;
        Ok(diff)
    }

    /// Persist `diff` through Store in one atomic batch.
    #[instrument(skip(self, diff))]
    pub fn commit(&self, diff: &Diff) -> Result<(), bt2c_store::StoreError> {
        let mut ops = Vec::new();
        for (address, account) in &diff.accounts {
            let bytes = bincode::serialize(account).expect("Account serialization cannot fail");
            ops.push(BatchOp::put(columns::CF_ACCOUNTS, account_key(address), bytes));
        }
        for (address, validator) in &diff.validators {
            let bytes = bincode::serialize(validator).expect("Validator serialization cannot fail");
            ops.push(BatchOp::put(columns::CF_VALIDATORS, validator_key(address), bytes));
        }
        for (seq, entry) in diff.unstake_entries.iter().enumerate() {
            let bytes = bincode::serialize(entry).expect("UnstakeEntry serialization cannot fail");
            ops.push(BatchOp::put(
                columns::CF_UNSTAKE_QUEUE,
                unstake_key(entry.requested_at_height, &entry.validator, seq as u32),
                bytes,
            ));
        }
        for (sender, nonce_bytes, timestamp) in &diff.nonce_records {
            ops.push(BatchOp::put(
                columns::CF_NONCES,
                nonce_key(sender, nonce_bytes),
                timestamp.to_be_bytes().to_vec(),
            ));
        }
        ops.push(BatchOp::put(
            columns::CF_METADATA,
            KEY_TOTAL_ISSUED.to_vec(),
            bincode::serialize(&diff.total_issued_after.units()).expect("u64 serialization cannot fail"),
        ));
        self.store.write_batch(ops)
    }
}
