//! In-process [`RowStore`].
//!
//! Backs the CLI demo and the tests. Tables are `BTreeMap`s behind a tokio
//! `RwLock`; every write is echoed on a broadcast change feed.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};

use crate::error::{TableError, TableResult};
use crate::store::{ChangeKind, ChangeStream, Filter, Row, RowChange, RowStore, Table, row_id};

const FEED_CAPACITY: usize = 1024;

/// A row store held in memory.
pub struct MemoryBackend {
    tables: RwLock<HashMap<Table, BTreeMap<String, Row>>>,
    changes: broadcast::Sender<RowChange>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// An empty store.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            tables: RwLock::new(HashMap::new()),
            changes,
        }
    }

    /// Number of rows in `table`.
    pub async fn row_count(&self, table: Table) -> usize {
        self.tables
            .read()
            .await
            .get(&table)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    fn emit(&self, table: Table, kind: ChangeKind, row: &Row) {
        // No subscribers is not an error.
        let _ = self.changes.send(RowChange {
            table,
            kind,
            row: row.clone(),
        });
    }
}

fn merge(row: &mut Row, patch: Row) {
    for (key, value) in patch {
        if key != "id" {
            row.insert(key, value);
        }
    }
}

#[async_trait]
impl RowStore for MemoryBackend {
    async fn select(&self, table: Table, filter: &Filter) -> TableResult<Vec<Row>> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(&table)
            .map(|rows| rows.values().filter(|r| filter.matches(r)).cloned().collect())
            .unwrap_or_default())
    }

    async fn insert(&self, table: Table, row: Row) -> TableResult<Row> {
        let id = row_id(&row)?.to_string();
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table).or_default();
        if rows.contains_key(&id) {
            return Err(TableError::Store(format!("duplicate id {id} in {table}")));
        }
        rows.insert(id, row.clone());
        self.emit(table, ChangeKind::Insert, &row);
        Ok(row)
    }

    async fn update(&self, table: Table, id: &str, patch: Row) -> TableResult<Row> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(&table)
            .and_then(|rows| rows.get_mut(id))
            .ok_or_else(|| TableError::not_found(table.name(), id))?;
        merge(row, patch);
        let row = row.clone();
        self.emit(table, ChangeKind::Update, &row);
        Ok(row)
    }

    async fn update_where(
        &self,
        table: Table,
        id: &str,
        guard: &Filter,
        patch: Row,
    ) -> TableResult<Option<Row>> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(&table)
            .and_then(|rows| rows.get_mut(id))
            .ok_or_else(|| TableError::not_found(table.name(), id))?;
        if !guard.matches(row) {
            return Ok(None);
        }
        merge(row, patch);
        let row = row.clone();
        self.emit(table, ChangeKind::Update, &row);
        Ok(Some(row))
    }

    async fn delete(&self, table: Table, id: &str) -> TableResult<()> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(&table)
            .and_then(|rows| rows.remove(id))
            .ok_or_else(|| TableError::not_found(table.name(), id))?;
        self.emit(table, ChangeKind::Delete, &row);
        Ok(())
    }

    async fn upsert(&self, table: Table, row: Row) -> TableResult<Row> {
        let id = row_id(&row)?.to_string();
        let mut tables = self.tables.write().await;
        let previous = tables.entry(table).or_default().insert(id, row.clone());
        let kind = if previous.is_some() {
            ChangeKind::Update
        } else {
            ChangeKind::Insert
        };
        self.emit(table, kind, &row);
        Ok(row)
    }

    fn subscribe_changes(&self, table: Table, filter: Filter) -> ChangeStream {
        ChangeStream::new(table, filter, self.changes.subscribe())
    }
}
