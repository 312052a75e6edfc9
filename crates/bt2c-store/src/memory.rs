//! In-memory [`Store`] implementation used by tests and by the
//! `devnet` network preset.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::errors::StoreError;
use crate::port::{BatchOp, Store};

/// An in-memory, non-persistent store backed by per-column
/// `BTreeMap`s (so `prefix_scan` returns keys in order without a
/// separate sort pass).
#[derive(Default)]
pub struct InMemoryStore {
    columns: RwLock<BTreeMap<&'static str, BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl InMemoryStore {
    /// A fresh, empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for InMemoryStore {
    fn get(&self, column: &'static str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let columns = self.columns.read();
        Ok(columns.get(column).and_then(|c| c.get(key)).cloned())
    }

    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<(), StoreError> {
        let mut columns = self.columns.write();
        for op in ops {
            match op {
                BatchOp::Put { column, key, value } => {
                    columns.entry(column).or_default().insert(key, value);
                }
                BatchOp::Delete { column, key } => {
                    if let Some(c) = columns.get_mut(column) {
                        c.remove(&key);
                    }
                }
            }
        }
        Ok(())
    }

    fn prefix_scan(
        &self,
        column: &'static str,
        prefix: &[u8],
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let columns = self.columns.read();
        let Some(c) = columns.get(column) else {
            return Ok(Vec::new());
        };
        Ok(c.range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
