//! Dameng (DM) dialect.
//!
//! # Architecture
//!
//! Each concern lives in its own submodule and works against a bare [`Link`]:
//! - `dsn`: connection-string construction
//! - `schema`: catalog queries for columns and tables
//! - `explain`: EXPLAIN re-execution and the slow-plan heuristic
//! - `xa`: XA command templates
//! - `extension`: the `point` query capability

pub mod dsn;
pub mod explain;
pub mod extension;
pub mod schema;
pub mod xa;

use crate::builder::ExtensionRegistry;
use crate::db::link::Link;
use crate::dialect::DialectAdapter;
use crate::error::DbResult;
use crate::models::{Bind, ConnectionConfig, ExplainResult, FieldCase, TableFields};
use async_trait::async_trait;
use xa::XaCommand;

pub use dsn::{DSN_PREFIX, build_dsn};

/// The DM dialect adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dameng;

impl Dameng {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DialectAdapter for Dameng {
    fn name(&self) -> &'static str {
        "dameng"
    }

    fn build_dsn(&self, config: &ConnectionConfig) -> String {
        dsn::build_dsn(config)
    }

    async fn get_fields(
        &self,
        link: &mut dyn Link,
        table_name: &str,
        case: FieldCase,
    ) -> DbResult<TableFields> {
        schema::get_fields(link, table_name, case).await
    }

    async fn get_tables(&self, link: &mut dyn Link, db_name: &str) -> DbResult<Vec<String>> {
        schema::get_tables(link, db_name).await
    }

    async fn explain(
        &self,
        link: &mut dyn Link,
        sql: &str,
        binds: &[Bind],
    ) -> DbResult<ExplainResult> {
        explain::explain(link, sql, binds).await
    }

    async fn xa_start(&self, link: &mut dyn Link, xid: &str) -> DbResult<()> {
        xa::issue(link, XaCommand::Start, xid).await
    }

    async fn xa_end(&self, link: &mut dyn Link, xid: &str) -> DbResult<()> {
        xa::issue(link, XaCommand::End, xid).await
    }

    async fn xa_prepare(&self, link: &mut dyn Link, xid: &str) -> DbResult<()> {
        xa::prepare(link, xid).await
    }

    async fn xa_commit(&self, link: &mut dyn Link, xid: &str) -> DbResult<()> {
        xa::issue(link, XaCommand::Commit, xid).await
    }

    async fn xa_rollback(&self, link: &mut dyn Link, xid: &str) -> DbResult<()> {
        xa::issue(link, XaCommand::Rollback, xid).await
    }

    fn register_extensions(&self, registry: &mut ExtensionRegistry) {
        registry.register(extension::POINT, extension::point);
    }

    fn supports_savepoint(&self) -> bool {
        true
    }
}
