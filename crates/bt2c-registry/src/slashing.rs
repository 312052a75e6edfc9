//! Rolling double-sign history, used to decide tombstoning.
//!
//! Grounded on the teacher's `SlashingDB` (a `(validator, epoch) ->
//! hash` map detecting conflicting votes in-process): here the
//! equivocation itself is detected and reported externally (as
//! [`bt2c_ledger::Evidence`]), so this tracker's job narrows to
//! counting how many such reports have landed against a validator
//! within the tombstone observation window.

use bt2c_crypto::Address;
use bt2c_state::constants::TOMBSTONE_WINDOW_SECS;
use bt2c_store::{columns, BatchOp, Store};

use crate::errors::RegistryError;

fn history_key(validator: &Address) -> Vec<u8> {
    validator.as_bytes().to_vec()
}

fn load_history(store: &dyn Store, validator: &Address) -> Result<Vec<u64>, RegistryError> {
    match store.get(columns::CF_SLASH_HISTORY, &history_key(validator))? {
        Some(bytes) => {
            bincode::deserialize(&bytes).map_err(|_| RegistryError::Store(bt2c_store::StoreError::Backend(
                "corrupt slash history record".into(),
            )))
        }
        None => Ok(Vec::new()),
    }
}

/// Record a double-sign at `now` against `validator`, prune entries
/// outside the tombstone window, and return the pruned count
/// (including this one).
pub fn record_and_count(store: &dyn Store, validator: &Address, now: u64) -> Result<u32, RegistryError> {
    let mut history = load_history(store, validator)?;
    history.push(now);
    history.retain(|&t| now.saturating_sub(t) <= TOMBSTONE_WINDOW_SECS);

    let bytes = bincode::serialize(&history).expect("Vec<u64> serialization cannot fail");
    store.write_batch(vec![BatchOp::put(
        columns::CF_SLASH_HISTORY,
        history_key(validator),
        bytes,
    )])?;

    Ok(history.len() as u32)
}
