//! Base connection.
//!
//! A [`Connection`] owns one driver link, remembers the last statement and its
//! bind list, and forwards every dialect-specific request to its
//! [`DialectAdapter`]. It is exclusively owned by its caller; nothing here runs
//! in the background.

use crate::builder::ExtensionRegistry;
use crate::db::link::{Connector, Link, Row};
use crate::dialect::{Dameng, DialectAdapter};
use crate::error::{DbError, DbResult};
use crate::models::{
    Bind, ConnectionConfig, ConnectionSettings, ExplainResult, TableFields, XaPhase, XidState,
    bind_all,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub struct Connection {
    config: ConnectionConfig,
    settings: ConnectionSettings,
    adapter: Box<dyn DialectAdapter>,
    connector: Arc<dyn Connector>,
    link: Option<Box<dyn Link>>,
    /// Text of the last statement sent through `query`/`execute`
    query_str: String,
    /// Bind list of the last statement
    bind: Vec<Bind>,
    xa: Option<XidState>,
}

impl Connection {
    /// Create an unconnected handle.
    pub fn new(
        config: ConnectionConfig,
        adapter: impl DialectAdapter + 'static,
        connector: Arc<dyn Connector>,
    ) -> Self {
        Self {
            config,
            settings: ConnectionSettings::default(),
            adapter: Box::new(adapter),
            connector,
            link: None,
            query_str: String::new(),
            bind: Vec::new(),
            xa: None,
        }
    }

    /// Create an unconnected handle speaking the DM dialect.
    pub fn dameng(config: ConnectionConfig, connector: Arc<dyn Connector>) -> Self {
        Self::new(config, Dameng, connector)
    }

    pub fn with_settings(mut self, settings: ConnectionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Let the adapter contribute its query capabilities.
    pub fn initialize(&self, registry: &mut ExtensionRegistry) {
        self.adapter.register_extensions(registry);
        debug!(dialect = self.adapter.name(), "Registered dialect extensions");
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    pub fn adapter(&self) -> &dyn DialectAdapter {
        self.adapter.as_ref()
    }

    /// Connection string for the current configuration.
    pub fn dsn(&self) -> String {
        self.adapter.build_dsn(&self.config)
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Open the link if none is active.
    pub async fn connect(&mut self) -> DbResult<()> {
        if self.link.is_some() {
            return Ok(());
        }

        let dsn = self.dsn();
        let link = self.connector.connect(&dsn, &self.config).await?;
        info!(dialect = self.adapter.name(), "Connection established");
        self.link = Some(link);
        Ok(())
    }

    /// Close the link, if any.
    pub async fn close(&mut self) -> DbResult<()> {
        if let Some(link) = self.link.take() {
            link.close().await?;
            debug!("Connection closed");
        }
        Ok(())
    }

    /// Adapter and link borrowed side by side.
    fn split(&mut self) -> DbResult<(&dyn DialectAdapter, &mut dyn Link)> {
        let adapter: &dyn DialectAdapter = self.adapter.as_ref();
        let link: &mut dyn Link = self
            .link
            .as_deref_mut()
            .ok_or_else(|| DbError::connection("Not connected", "Call connect() first"))?;
        Ok((adapter, link))
    }

    fn record(&mut self, sql: &str, binds: Vec<Bind>) {
        self.query_str = sql.to_string();
        self.bind = binds;
    }

    /// Run a row-returning statement.
    pub async fn query(&mut self, sql: &str, binds: Vec<Bind>) -> DbResult<Vec<Row>> {
        self.connect().await?;
        self.record(sql, binds);

        let params = bind_all(&self.bind);
        let start = Instant::now();
        let (_, link) = self.split()?;
        let rows = link.fetch_all(sql, &params).await?;
        debug!(
            rows = rows.len(),
            "[ SQL ] {} [ RunTime:{:.6}s ]",
            sql,
            start.elapsed().as_secs_f64()
        );

        if self.settings.sql_explain && is_select(sql) {
            self.log_explain().await;
        }

        Ok(rows)
    }

    /// Run a write statement and return the affected row count.
    pub async fn execute(&mut self, sql: &str, binds: Vec<Bind>) -> DbResult<u64> {
        self.connect().await?;
        self.record(sql, binds);

        let params = bind_all(&self.bind);
        let start = Instant::now();
        let (_, link) = self.split()?;
        let affected = link.execute(sql, &params).await?;
        debug!(
            rows_affected = affected,
            "[ SQL ] {} [ RunTime:{:.6}s ]",
            sql,
            start.elapsed().as_secs_f64()
        );

        Ok(affected)
    }

    /// Last statement text.
    pub fn get_last_sql(&self) -> &str {
        &self.query_str
    }

    /// Bind list of the last statement.
    pub fn get_last_binds(&self) -> &[Bind] {
        &self.bind
    }

    /// Column metadata for a table. An unknown table yields an empty map.
    pub async fn get_fields(&mut self, table_name: &str) -> DbResult<TableFields> {
        self.connect().await?;
        let case = self.settings.field_case;
        let (adapter, link) = self.split()?;
        adapter.get_fields(link, table_name, case).await
    }

    /// Table names of the connected database.
    pub async fn get_tables(&mut self, db_name: &str) -> DbResult<Vec<String>> {
        self.connect().await?;
        let (adapter, link) = self.split()?;
        adapter.get_tables(link, db_name).await
    }

    /// Explain the last statement with its bind list.
    pub async fn get_explain(&mut self) -> DbResult<ExplainResult> {
        if self.query_str.is_empty() {
            return Err(DbError::invalid_input(
                "No statement has been executed on this connection",
            ));
        }

        self.connect().await?;
        let sql = self.query_str.clone();
        let binds = self.bind.clone();
        let (adapter, link) = self.split()?;
        adapter.explain(link, &sql, &binds).await
    }

    async fn log_explain(&mut self) {
        match self.get_explain().await {
            Ok(result) => {
                let plan = serde_json::to_string(&result).unwrap_or_default();
                debug!("[ EXPLAIN : {} ]", plan);
            }
            Err(e) => warn!(error = %e, "EXPLAIN failed"),
        }
    }

    /// Start an XA branch. Returns `Ok(false)` when no link could be opened.
    pub async fn start_trans_xa(&mut self, xid: &str) -> DbResult<bool> {
        if let Err(e) = self.connect().await {
            error!(xid = %xid, error = %e, "No connection for XA START");
            return Ok(false);
        }

        let (adapter, link) = self.split()?;
        adapter.xa_start(link, xid).await?;
        self.xa = Some(XidState::started(xid));
        info!(xid = %xid, "XA transaction started");
        Ok(true)
    }

    /// End an XA branch without preparing it.
    pub async fn end_xa(&mut self, xid: &str) -> DbResult<()> {
        self.connect().await?;
        let (adapter, link) = self.split()?;
        adapter.xa_end(link, xid).await?;
        self.track_xa(xid, XaPhase::Ended);
        Ok(())
    }

    /// End and prepare an XA branch.
    pub async fn prepare_xa(&mut self, xid: &str) -> DbResult<()> {
        self.connect().await?;
        let (adapter, link) = self.split()?;
        adapter.xa_prepare(link, xid).await?;
        self.track_xa(xid, XaPhase::Prepared);
        info!(xid = %xid, "XA transaction prepared");
        Ok(())
    }

    pub async fn commit_xa(&mut self, xid: &str) -> DbResult<()> {
        self.connect().await?;
        let (adapter, link) = self.split()?;
        adapter.xa_commit(link, xid).await?;
        self.track_xa(xid, XaPhase::Committed);
        info!(xid = %xid, "XA transaction committed");
        Ok(())
    }

    pub async fn rollback_xa(&mut self, xid: &str) -> DbResult<()> {
        self.connect().await?;
        let (adapter, link) = self.split()?;
        adapter.xa_rollback(link, xid).await?;
        self.track_xa(xid, XaPhase::RolledBack);
        info!(xid = %xid, "XA transaction rolled back");
        Ok(())
    }

    /// Branch last driven through this handle, if any.
    pub fn xa_state(&self) -> Option<&XidState> {
        self.xa.as_ref()
    }

    fn track_xa(&mut self, xid: &str, phase: XaPhase) {
        match self.xa.as_mut() {
            Some(state) if state.xid == xid => state.phase = phase,
            _ => {
                let mut state = XidState::started(xid);
                state.phase = phase;
                self.xa = Some(state);
            }
        }
    }

    pub fn supports_savepoint(&self) -> bool {
        self.adapter.supports_savepoint()
    }

    pub fn savepoint_sql(&self, name: &str) -> String {
        self.adapter.savepoint_sql(name)
    }

    pub fn rollback_savepoint_sql(&self, name: &str) -> String {
        self.adapter.rollback_savepoint_sql(name)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("dialect", &self.adapter.name())
            .field("dsn", &self.dsn())
            .field("connected", &self.is_connected())
            .field("last_sql", &self.query_str)
            .field("xa", &self.xa)
            .finish()
    }
}

/// Whether `sql` is a SELECT statement.
fn is_select(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("select"))
}
