//! Tabular record store for the Einstein360 LMS.
//!
//! All LMS state lives in six named tables, each with a fixed header row
//! followed by data rows of string cells. This crate provides the accessor
//! over those tables and the queries the service runs against them.
//!
//! # Architecture
//!
//! - [`TableBackend`]: raw row storage (ensure, read all, append, update one cell)
//! - [`TableStore`] / [`TableHandle`]: the accessor, ensuring a table exists
//!   before handing out a handle, plus typed scans over [`Record`] types
//! - [`queries`]: the lookups and filters the HTTP handlers are built from
//!
//! Backends:
//!
//! - [`MemoryBackend`]: process-local tables, used by default and in tests
//! - [`SheetsBackend`]: a Google Sheets spreadsheet, one sheet per table
//! - `RocksBackend`: a local `RocksDB` database (feature `rocksdb-backend`)
//!
//! # Example
//!
//! ```no_run
//! use lms_store::{queries, MemoryBackend, TableStore};
//!
//! # async fn example() -> lms_store::Result<()> {
//! let store = TableStore::new(MemoryBackend::new());
//! let trainers = queries::list_trainers(&store).await?;
//! assert!(trainers.is_empty());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod accessor;
pub mod codec;
pub mod error;
pub mod memory;
pub mod queries;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
pub mod row;
pub mod schema;
pub mod seed;
pub mod sheets;

pub use accessor::{Stored, TableHandle, TableStore};
pub use codec::Record;
pub use error::{Result, StoreError};
pub use memory::MemoryBackend;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksBackend;
pub use row::{cell, Row};
pub use schema::{all_tables, Table};
pub use sheets::{SheetsBackend, SheetsConfig};

use async_trait::async_trait;

/// Raw row storage behind the table accessor.
///
/// Positions follow spreadsheet addressing: `row_position` is 1-based with
/// the header as row 1, so the first data row is row 2. `column_position`
/// is a 0-based index into the header.
///
/// Backends make no promise of atomicity across calls.
#[async_trait]
pub trait TableBackend: Send + Sync {
    /// Short name used in logs and health output.
    fn name(&self) -> &'static str;

    /// Make sure the table exists and starts with its header.
    ///
    /// Creates the table with the header if missing, writes the header if
    /// the first row is empty, and does nothing otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    async fn ensure_table(&self, table: &Table) -> Result<()>;

    /// Read every row, header included, in storage order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    async fn read_all(&self, table: &Table) -> Result<Vec<Row>>;

    /// Append one row after the last row. The row shape is not validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    async fn append(&self, table: &Table, row: Row) -> Result<()>;

    /// Overwrite one cell in place.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RowOutOfRange` when `row_position` addresses the
    /// header. Backends that track their row count also reject positions
    /// past the last row.
    async fn update_cell(
        &self,
        table: &Table,
        row_position: usize,
        column_position: usize,
        value: &str,
    ) -> Result<()>;
}
