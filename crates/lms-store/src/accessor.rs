//! The table accessor.
//!
//! [`TableStore`] is the store-client value handed to every operation. It
//! resolves a table through [`TableStore::ensure_table`], which is cheap to
//! repeat and runs on every access, so a table deleted underneath the
//! service is recreated on the next request.

use std::sync::Arc;

use crate::codec::Record;
use crate::error::Result;
use crate::row::Row;
use crate::schema::Table;
use crate::TableBackend;

/// Shared handle to a table backend.
#[derive(Clone)]
pub struct TableStore {
    backend: Arc<dyn TableBackend>,
}

impl TableStore {
    /// Wrap a backend.
    pub fn new<B: TableBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Wrap an already shared backend.
    #[must_use]
    pub fn from_arc(backend: Arc<dyn TableBackend>) -> Self {
        Self { backend }
    }

    /// Name of the underlying backend.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Resolve `table`, creating it or its header row if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    pub async fn ensure_table(&self, table: &'static Table) -> Result<TableHandle<'_>> {
        self.backend.ensure_table(table).await?;
        Ok(TableHandle {
            backend: self.backend.as_ref(),
            table,
        })
    }

    /// Resolve the table holding records of type `R`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    pub async fn table_of<R: Record>(&self) -> Result<TableHandle<'_>> {
        self.ensure_table(R::TABLE).await
    }
}

impl std::fmt::Debug for TableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableStore")
            .field("backend", &self.backend.name())
            .finish()
    }
}

/// A decoded record together with its row position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stored<R> {
    /// 1-based row position, counting the header as row 1.
    pub row_position: usize,
    /// The decoded record.
    pub record: R,
}

/// An ensured table.
pub struct TableHandle<'a> {
    backend: &'a dyn TableBackend,
    table: &'static Table,
}

impl TableHandle<'_> {
    /// The table this handle addresses.
    #[must_use]
    pub fn table(&self) -> &'static Table {
        self.table
    }

    /// Every row, header included. Index 0 is the header.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    pub async fn read_all(&self) -> Result<Vec<Row>> {
        self.backend.read_all(self.table).await
    }

    /// Append one raw row.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    pub async fn append(&self, row: Row) -> Result<()> {
        self.backend.append(self.table, row).await
    }

    /// Overwrite one cell. Locate `row_position` with a scan first.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is out of range or the backing
    /// store cannot be reached.
    pub async fn update_cell(
        &self,
        row_position: usize,
        column_position: usize,
        value: &str,
    ) -> Result<()> {
        self.backend
            .update_cell(self.table, row_position, column_position, value)
            .await
    }

    /// Decode every data row, skipping the header.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    pub async fn scan<R: Record>(&self) -> Result<Vec<Stored<R>>> {
        debug_assert_eq!(R::TABLE.name, self.table.name);
        let rows = self.read_all().await?;
        tracing::debug!(table = self.table.name, rows = rows.len(), "Scanned table");
        Ok(rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, row)| Stored {
                row_position: index + 1,
                record: R::decode(row),
            })
            .collect())
    }

    /// Decode the data rows whose raw cells satisfy `predicate`.
    ///
    /// Filtering on raw rows lets predicates treat a missing cell as a
    /// non-match; see [`crate::row::cell_equals`].
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    pub async fn filter<R, P>(&self, predicate: P) -> Result<Vec<Stored<R>>>
    where
        R: Record,
        P: Fn(&[String]) -> bool,
    {
        let rows = self.read_all().await?;
        Ok(rows
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, row)| predicate(row))
            .map(|(index, row)| Stored {
                row_position: index + 1,
                record: R::decode(row),
            })
            .collect())
    }

    /// The first data row satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    pub async fn find<R, P>(&self, predicate: P) -> Result<Option<Stored<R>>>
    where
        R: Record,
        P: Fn(&[String]) -> bool,
    {
        let rows = self.read_all().await?;
        Ok(rows
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, row)| predicate(row))
            .map(|(index, row)| Stored {
                row_position: index + 1,
                record: R::decode(row),
            }))
    }

    /// Encode and append a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    pub async fn insert<R: Record>(&self, record: &R) -> Result<()> {
        debug_assert_eq!(R::TABLE.name, self.table.name);
        self.append(record.encode()).await
    }
}
