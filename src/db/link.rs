//! Driver seam.
//!
//! A [`Link`] is one established driver connection; a [`Connector`] opens links
//! from a DSN. Everything dialect-specific is expressed as SQL text sent over a
//! link, so the adapter never depends on a concrete driver.

use crate::error::DbResult;
use crate::models::{BoundParam, ConnectionConfig};
use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// One result row, columns in result order.
pub type Row = serde_json::Map<String, JsonValue>;

/// An established driver connection.
#[async_trait]
pub trait Link: Send {
    /// Prepare `sql`, apply `params`, execute and collect every row.
    async fn fetch_all(&mut self, sql: &str, params: &[BoundParam]) -> DbResult<Vec<Row>>;

    /// Like [`fetch_all`](Link::fetch_all) but only the first row.
    async fn fetch_optional(&mut self, sql: &str, params: &[BoundParam]) -> DbResult<Option<Row>> {
        Ok(self.fetch_all(sql, params).await?.into_iter().next())
    }

    /// Prepare `sql`, apply `params`, execute and return the affected row count.
    async fn execute(&mut self, sql: &str, params: &[BoundParam]) -> DbResult<u64>;

    /// Execute `sql` directly, unprepared, and return the affected row count.
    async fn exec(&mut self, sql: &str) -> DbResult<u64>;

    /// Close the connection gracefully.
    async fn close(self: Box<Self>) -> DbResult<()>;
}

/// Opens links.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, dsn: &str, config: &ConnectionConfig) -> DbResult<Box<dyn Link>>;
}

/// Render a column value as text; `None` for SQL NULL.
pub fn value_as_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Interpret a 0/1 style column value as a flag.
pub fn value_as_flag(value: &JsonValue) -> bool {
    match value {
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        JsonValue::String(s) => s.trim().parse::<f64>().is_ok_and(|v| v != 0.0),
        _ => false,
    }
}
