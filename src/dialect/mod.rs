//! Dialect adapters.
//!
//! A [`DialectAdapter`] turns abstract connection, schema and transaction
//! requests into the SQL text one engine expects. It owns no connection state;
//! every operation runs over the [`Link`] it is handed.

pub mod dameng;

use crate::builder::ExtensionRegistry;
use crate::db::link::Link;
use crate::error::DbResult;
use crate::models::{Bind, ConnectionConfig, ExplainResult, FieldCase, TableFields};
use async_trait::async_trait;

pub use dameng::Dameng;

#[async_trait]
pub trait DialectAdapter: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Connection string for `config`. Never fails.
    fn build_dsn(&self, config: &ConnectionConfig) -> String;

    /// Column metadata for a table, keys folded by `case`.
    async fn get_fields(
        &self,
        link: &mut dyn Link,
        table_name: &str,
        case: FieldCase,
    ) -> DbResult<TableFields>;

    /// Table names of the connected database.
    async fn get_tables(&self, link: &mut dyn Link, db_name: &str) -> DbResult<Vec<String>>;

    /// First plan row for `sql` executed with `binds`.
    async fn explain(
        &self,
        link: &mut dyn Link,
        sql: &str,
        binds: &[Bind],
    ) -> DbResult<ExplainResult>;

    async fn xa_start(&self, link: &mut dyn Link, xid: &str) -> DbResult<()>;

    async fn xa_end(&self, link: &mut dyn Link, xid: &str) -> DbResult<()>;

    /// Move the branch to the prepared phase, ending it first if the engine needs that.
    async fn xa_prepare(&self, link: &mut dyn Link, xid: &str) -> DbResult<()>;

    async fn xa_commit(&self, link: &mut dyn Link, xid: &str) -> DbResult<()>;

    async fn xa_rollback(&self, link: &mut dyn Link, xid: &str) -> DbResult<()>;

    /// Contribute dialect capabilities to the query builder.
    fn register_extensions(&self, _registry: &mut ExtensionRegistry) {}

    fn supports_savepoint(&self) -> bool {
        false
    }

    fn savepoint_sql(&self, name: &str) -> String {
        format!("SAVEPOINT {}", name)
    }

    fn rollback_savepoint_sql(&self, name: &str) -> String {
        format!("ROLLBACK TO SAVEPOINT {}", name)
    }
}
