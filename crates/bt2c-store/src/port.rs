//! The `Store` port: the key/value abstraction every consensus
//! component is written against. Production code depends on this
//! trait, never on a concrete backend.

use crate::errors::StoreError;

/// A single write within an atomic [`Store::write_batch`] call.
#[derive(Debug, Clone)]
pub enum BatchOp {
    /// Write `value` under `key` in `column`.
    Put {
        /// Column family name.
        column: &'static str,
        /// Key bytes.
        key: Vec<u8>,
        /// Value bytes.
        value: Vec<u8>,
    },
    /// Remove `key` from `column`.
    Delete {
        /// Column family name.
        column: &'static str,
        /// Key bytes.
        key: Vec<u8>,
    },
}

impl BatchOp {
    /// Construct a [`BatchOp::Put`].
    pub fn put(column: &'static str, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOp::Put {
            column,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Construct a [`BatchOp::Delete`].
    pub fn delete(column: &'static str, key: impl Into<Vec<u8>>) -> Self {
        BatchOp::Delete {
            column,
            key: key.into(),
        }
    }
}

/// A column-family-partitioned key/value store with atomic
/// multi-key batch commits.
///
/// Every consensus-critical write (applying a block, advancing the
/// unstake queue, slashing a validator) goes through
/// [`Store::write_batch`] so that a crash mid-commit can never leave
/// the ledger in a partially-applied state.
pub trait Store: Send + Sync {
    /// Read a single value.
    fn get(&self, column: &'static str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// True if `key` is present in `column`.
    fn exists(&self, column: &'static str, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(column, key)?.is_some())
    }

    /// Apply `ops` as a single atomic unit: either every operation is
    /// durably applied, or none are.
    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<(), StoreError>;

    /// Collect every key/value pair in `column` whose key starts with
    /// `prefix`, in ascending key order.
    fn prefix_scan(
        &self,
        column: &'static str,
        prefix: &[u8],
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;
}
