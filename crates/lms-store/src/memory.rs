//! In-memory table backend.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::row::{is_blank, Row};
use crate::schema::Table;
use crate::TableBackend;

/// Tables held in process memory. Contents are lost on restart.
///
/// Each call takes the lock once, so single operations are atomic but
/// sequences of calls are not.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<String, Vec<Row>>>,
}

impl MemoryBackend {
    /// Create an empty backend with no tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend preloaded with raw rows, header included.
    ///
    /// Useful for reproducing legacy data such as short rows.
    #[must_use]
    pub fn with_rows(tables: impl IntoIterator<Item = (&'static Table, Vec<Row>)>) -> Self {
        let tables = tables
            .into_iter()
            .map(|(table, rows)| (table.name.to_string(), rows))
            .collect();
        Self {
            tables: Mutex::new(tables),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<Row>>>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("memory table lock poisoned".into()))
    }
}

#[async_trait]
impl TableBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn ensure_table(&self, table: &Table) -> Result<()> {
        let mut tables = self.lock()?;
        let rows = tables.entry(table.name.to_string()).or_insert_with(|| {
            tracing::debug!(table = table.name, "Creating table");
            Vec::new()
        });

        if rows.is_empty() {
            rows.push(table.header_row());
        } else if is_blank(&rows[0]) {
            rows[0] = table.header_row();
        }
        Ok(())
    }

    async fn read_all(&self, table: &Table) -> Result<Vec<Row>> {
        let tables = self.lock()?;
        Ok(tables.get(table.name).cloned().unwrap_or_default())
    }

    async fn append(&self, table: &Table, row: Row) -> Result<()> {
        let mut tables = self.lock()?;
        tables.entry(table.name.to_string()).or_default().push(row);
        Ok(())
    }

    async fn update_cell(
        &self,
        table: &Table,
        row_position: usize,
        column_position: usize,
        value: &str,
    ) -> Result<()> {
        let mut tables = self.lock()?;
        let out_of_range = || StoreError::RowOutOfRange {
            table: table.name.to_string(),
            row_position,
        };

        if row_position < 2 {
            return Err(out_of_range());
        }
        let row = tables
            .get_mut(table.name)
            .and_then(|rows| rows.get_mut(row_position - 1))
            .ok_or_else(out_of_range)?;

        if row.len() <= column_position {
            row.resize(column_position + 1, String::new());
        }
        row[column_position] = value.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{QUESTIONS, USERS};

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    #[tokio::test]
    async fn ensure_writes_header_once() {
        let backend = MemoryBackend::new();
        backend.ensure_table(&USERS).await.unwrap();
        backend.ensure_table(&USERS).await.unwrap();

        let rows = backend.read_all(&USERS).await.unwrap();
        assert_eq!(rows, vec![USERS.header_row()]);
    }

    #[tokio::test]
    async fn ensure_repairs_empty_header() {
        let backend = MemoryBackend::with_rows([(
            &QUESTIONS,
            vec![row(&["", ""]), row(&["1", "Basics", "Q?"])],
        )]);
        backend.ensure_table(&QUESTIONS).await.unwrap();

        let rows = backend.read_all(&QUESTIONS).await.unwrap();
        assert_eq!(rows[0], QUESTIONS.header_row());
        assert_eq!(rows[1], row(&["1", "Basics", "Q?"]));
    }

    #[tokio::test]
    async fn update_cell_pads_short_rows() {
        let backend = MemoryBackend::with_rows([(&USERS, vec![USERS.header_row(), row(&["USR-1"])])]);
        backend.update_cell(&USERS, 2, 3, "secret").await.unwrap();

        let rows = backend.read_all(&USERS).await.unwrap();
        assert_eq!(rows[1], row(&["USR-1", "", "", "secret"]));
    }

    #[tokio::test]
    async fn update_cell_rejects_header_and_missing_rows() {
        let backend = MemoryBackend::new();
        backend.ensure_table(&USERS).await.unwrap();

        let header = backend.update_cell(&USERS, 1, 0, "x").await;
        assert!(matches!(header, Err(StoreError::RowOutOfRange { row_position: 1, .. })));

        let missing = backend.update_cell(&USERS, 2, 0, "x").await;
        assert!(matches!(missing, Err(StoreError::RowOutOfRange { row_position: 2, .. })));
    }
}
