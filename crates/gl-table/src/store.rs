//! The seam to the backing store.
//!
//! Rows are JSON objects keyed by their `"id"` field. A [`RowStore`] offers
//! plain CRUD plus a change feed; the in-process implementation lives in
//! [`crate::memory`].

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::error::{TableError, TableResult};

/// A stored row.
pub type Row = Map<String, Value>;

/// Tables the game uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    /// Investigator documents.
    Investigators,
    /// Game sessions.
    Sessions,
    /// Which investigators sit at which session.
    SessionCharacters,
    /// Keeper roll requests.
    RollRequests,
    /// Keeper-authored equipment.
    CustomItems,
    /// Notes and images on the shared pinboard.
    PinboardItems,
}

impl Table {
    /// Table name as the backend knows it.
    pub fn name(self) -> &'static str {
        match self {
            Self::Investigators => "investigators",
            Self::Sessions => "sessions",
            Self::SessionCharacters => "session_characters",
            Self::RollRequests => "roll_requests",
            Self::CustomItems => "custom_items",
            Self::PinboardItems => "pinboard_items",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Row selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every row.
    All,
    /// Rows whose column equals a value.
    Eq(String, Value),
}

impl Filter {
    /// Rows where `column == value`.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(column.into(), value.into())
    }

    /// Returns true if `row` is selected.
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Self::All => true,
            Self::Eq(column, value) => row.get(column) == Some(value),
        }
    }
}

/// What happened to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    /// A new row.
    Insert,
    /// An existing row changed.
    Update,
    /// A row was removed.
    Delete,
}

/// One entry of the change feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowChange {
    /// The table.
    pub table: Table,
    /// The kind of change.
    pub kind: ChangeKind,
    /// The row after the change, or the removed row for deletes.
    pub row: Row,
}

/// Filtered view of a store's change feed.
#[derive(Debug)]
pub struct ChangeStream {
    table: Table,
    filter: Filter,
    receiver: broadcast::Receiver<RowChange>,
}

impl ChangeStream {
    /// Wrap a raw feed receiver.
    pub fn new(table: Table, filter: Filter, receiver: broadcast::Receiver<RowChange>) -> Self {
        Self {
            table,
            filter,
            receiver,
        }
    }

    /// Next matching change, or `None` once the store is gone.
    pub async fn recv(&mut self) -> Option<RowChange> {
        loop {
            match self.receiver.recv().await {
                Ok(change) if change.table == self.table && self.filter.matches(&change.row) => {
                    return Some(change);
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(table = %self.table, skipped, "change feed lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

/// A row store with a change feed.
///
/// Writes are last-write-wins per row. Implementations need not order
/// changes across clients.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Rows of `table` matching `filter`.
    async fn select(&self, table: Table, filter: &Filter) -> TableResult<Vec<Row>>;

    /// Insert a new row. Fails if the id is taken.
    async fn insert(&self, table: Table, row: Row) -> TableResult<Row>;

    /// Merge `patch` into an existing row.
    async fn update(&self, table: Table, id: &str, patch: Row) -> TableResult<Row>;

    /// Merge `patch` into a row only while it still matches `guard`. The
    /// check and the write are one step. Returns `None`, leaving the row
    /// untouched, when the guard no longer holds.
    async fn update_where(
        &self,
        table: Table,
        id: &str,
        guard: &Filter,
        patch: Row,
    ) -> TableResult<Option<Row>>;

    /// Remove a row.
    async fn delete(&self, table: Table, id: &str) -> TableResult<()>;

    /// Insert or replace a row.
    async fn upsert(&self, table: Table, row: Row) -> TableResult<Row>;

    /// Subscribe to changes on `table` matching `filter`.
    fn subscribe_changes(&self, table: Table, filter: Filter) -> ChangeStream;
}

/// The `"id"` of a row.
pub fn row_id(row: &Row) -> TableResult<&str> {
    row.get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| TableError::Store("row has no string id".into()))
}

/// Serialize a record into a row.
pub fn to_row<T: Serialize>(record: &T) -> TableResult<Row> {
    match serde_json::to_value(record)? {
        Value::Object(row) => Ok(row),
        other => Err(TableError::Store(format!("expected an object, got {other}"))),
    }
}

/// Deserialize a row into a record.
pub fn from_row<T: DeserializeOwned>(row: Row) -> TableResult<T> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn filter_matching() {
        let r = row(json!({"id": "a", "session_id": "s1"}));
        assert!(Filter::All.matches(&r));
        assert!(Filter::eq("session_id", "s1").matches(&r));
        assert!(!Filter::eq("session_id", "s2").matches(&r));
        assert!(!Filter::eq("missing", "s1").matches(&r));
    }

    #[test]
    fn rows_need_ids() {
        assert_eq!(row_id(&row(json!({"id": "x"}))).unwrap(), "x");
        assert!(row_id(&row(json!({"id": 3}))).is_err());
    }

    #[test]
    fn only_objects_become_rows() {
        assert!(to_row(&json!({"id": "x"})).is_ok());
        assert!(to_row(&42).is_err());
    }

    #[test]
    fn table_names() {
        assert_eq!(Table::SessionCharacters.to_string(), "session_characters");
        assert_eq!(
            serde_json::to_string(&Table::PinboardItems).unwrap(),
            "\"pinboard_items\""
        );
    }
}
