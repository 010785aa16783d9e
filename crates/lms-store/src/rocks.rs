//! `RocksDB` table backend.
//!
//! Each table is a column family. Keys are big-endian `u64` row indexes,
//! with index 0 holding the header, so iteration order is row order.
//! Values are CBOR-encoded rows.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options,
};

use crate::error::{Result, StoreError};
use crate::row::{is_blank, Row};
use crate::schema::{all_tables, Table};
use crate::TableBackend;

/// RocksDB-backed tables.
pub struct RocksBackend {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    // Serializes read-modify-write sequences (append, update_cell).
    write_lock: Mutex<()>,
}

impl RocksBackend {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_tables()
            .into_iter()
            .map(|table| ColumnFamilyDescriptor::new(table.name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    fn cf(&self, table: &Table) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(table.name)
            .ok_or_else(|| StoreError::UnknownTable(table.name.to_string()))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Backend("rocksdb write lock poisoned".into()))
    }

    fn key(index: usize) -> Result<[u8; 8]> {
        u64::try_from(index)
            .map(u64::to_be_bytes)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn index(key: &[u8]) -> Result<usize> {
        let bytes: [u8; 8] = key
            .try_into()
            .map_err(|_| StoreError::Serialization(format!("bad row key length {}", key.len())))?;
        usize::try_from(u64::from_be_bytes(bytes)).map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn serialize(row: &[String]) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(&row, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    fn deserialize(data: &[u8]) -> Result<Row> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn get(&self, table: &Table, index: usize) -> Result<Option<Row>> {
        let cf = self.cf(table)?;
        self.db
            .get_cf(&cf, Self::key(index)?)
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn put(&self, table: &Table, index: usize, row: &[String]) -> Result<()> {
        let cf = self.cf(table)?;
        self.db
            .put_cf(&cf, Self::key(index)?, Self::serialize(row)?)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn next_index(&self, table: &Table) -> Result<usize> {
        let cf = self.cf(table)?;
        match self.db.iterator_cf(&cf, IteratorMode::End).next() {
            None => Ok(0),
            Some(entry) => {
                let (key, _) = entry.map_err(|e| StoreError::Backend(e.to_string()))?;
                Ok(Self::index(&key)? + 1)
            }
        }
    }
}

#[async_trait]
impl TableBackend for RocksBackend {
    fn name(&self) -> &'static str {
        "rocksdb"
    }

    async fn ensure_table(&self, table: &Table) -> Result<()> {
        let _guard = self.lock()?;
        let header_missing = self
            .get(table, 0)?
            .map_or(true, |first| is_blank(&first));
        if header_missing {
            tracing::debug!(table = table.name, "Writing header row");
            self.put(table, 0, &table.header_row())?;
        }
        Ok(())
    }

    async fn read_all(&self, table: &Table) -> Result<Vec<Row>> {
        let cf = self.cf(table)?;
        self.db
            .iterator_cf(&cf, IteratorMode::Start)
            .map(|entry| {
                let (_, value) = entry.map_err(|e| StoreError::Backend(e.to_string()))?;
                Self::deserialize(&value)
            })
            .collect()
    }

    async fn append(&self, table: &Table, row: Row) -> Result<()> {
        let _guard = self.lock()?;
        let index = self.next_index(table)?;
        self.put(table, index, &row)
    }

    async fn update_cell(
        &self,
        table: &Table,
        row_position: usize,
        column_position: usize,
        value: &str,
    ) -> Result<()> {
        let out_of_range = || StoreError::RowOutOfRange {
            table: table.name.to_string(),
            row_position,
        };
        if row_position < 2 {
            return Err(out_of_range());
        }

        let _guard = self.lock()?;
        let index = row_position - 1;
        let mut row = self.get(table, index)?.ok_or_else(out_of_range)?;
        if row.len() <= column_position {
            row.resize(column_position + 1, String::new());
        }
        row[column_position] = value.to_string();
        self.put(table, index, &row)
    }
}
