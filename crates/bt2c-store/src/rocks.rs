//! Production [`Store`] implementation backed by RocksDB.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use rocksdb::{ColumnFamilyDescriptor, Options, WriteBatch, DB};

use crate::columns::ALL;
use crate::errors::StoreError;
use crate::port::{BatchOp, Store};

/// Tuning knobs for the RocksDB-backed store. Defaults favor
/// durability over throughput; `for_testing` trades that back for
/// faster open/close cycles in the test suite.
#[derive(Debug, Clone)]
pub struct RocksConfig {
    /// Directory the database lives in.
    pub path: String,
    /// Block cache size in bytes.
    pub block_cache_bytes: usize,
    /// Memtable size in bytes before a flush is triggered.
    pub write_buffer_bytes: usize,
    /// fsync after every write batch.
    pub sync_writes: bool,
}

impl RocksConfig {
    /// Production defaults rooted at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_bytes: 256 * 1024 * 1024,
            write_buffer_bytes: 64 * 1024 * 1024,
            sync_writes: true,
        }
    }

    /// Small buffers, no fsync: fast open/close for integration tests.
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_bytes: 8 * 1024 * 1024,
            write_buffer_bytes: 4 * 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// A RocksDB-backed [`Store`].
pub struct RocksStore {
    db: Arc<RwLock<DB>>,
    sync_writes: bool,
}

impl RocksStore {
    /// Open (or create) a database at `config.path` with one column
    /// family per entry in [`crate::columns::ALL`].
    pub fn open(config: RocksConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_bytes);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_bytes));
        opts.set_block_based_table_factory(&block_opts);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = ALL
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            sync_writes: config.sync_writes,
        })
    }

    /// Open with default tuning at `path`.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open(RocksConfig::new(path.as_ref().to_string_lossy().to_string()))
    }
}

impl Store for RocksStore {
    fn get(&self, column: &'static str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let db = self.db.read();
        let cf = db
            .cf_handle(column)
            .ok_or_else(|| StoreError::UnknownColumnFamily(column.to_string()))?;
        db.get_cf(cf, key)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<(), StoreError> {
        let db = self.db.write();
        let mut batch = WriteBatch::default();
        for op in ops {
            match op {
                BatchOp::Put { column, key, value } => {
                    let cf = db
                        .cf_handle(column)
                        .ok_or_else(|| StoreError::UnknownColumnFamily(column.to_string()))?;
                    batch.put_cf(cf, key, value);
                }
                BatchOp::Delete { column, key } => {
                    let cf = db
                        .cf_handle(column)
                        .ok_or_else(|| StoreError::UnknownColumnFamily(column.to_string()))?;
                    batch.delete_cf(cf, key);
                }
            }
        }
        let mut write_opts = rocksdb::WriteOptions::default();
        write_opts.set_sync(self.sync_writes);
        db.write_opt(batch, &write_opts)
            .map_err(|e| StoreError::BatchFailed(e.to_string()))
    }

    fn prefix_scan(
        &self,
        column: &'static str,
        prefix: &[u8],
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let db = self.db.read();
        let cf = db
            .cf_handle(column)
            .ok_or_else(|| StoreError::UnknownColumnFamily(column.to_string()))?;
        let mode = rocksdb::IteratorMode::From(prefix, rocksdb::Direction::Forward);
        let mut results = Vec::new();
        for item in db.iterator_cf(cf, mode) {
            let (key, value) = item.map_err(|e| StoreError::Backend(e.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_vec(), value.to_vec()));
        }
        Ok(results)
    }
}
