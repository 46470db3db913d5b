//! Bundled transport over the MySQL wire protocol.
//!
//! DM instances running the MySQL-compatible listener accept this protocol, and
//! the XA and EXPLAIN statements the adapter emits use the same syntax. Any
//! other driver plugs in by implementing [`Connector`] and [`Link`].

use crate::db::link::{Connector, Link, Row};
use crate::db::params::{bind_mysql_param, order_positional};
use crate::db::types::RowToJson;
use crate::error::{DbError, DbResult};
use crate::models::{BoundParam, ConnectionConfig};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection as _, Executor};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

/// Port used when the configuration leaves it empty.
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Opens [`MySqlLink`]s.
#[derive(Debug, Clone)]
pub struct MySqlConnector {
    connect_timeout: Duration,
}

impl MySqlConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    /// Translate a connection configuration into sqlx connect options.
    pub fn connect_options(config: &ConnectionConfig) -> DbResult<MySqlConnectOptions> {
        let port = match config.port() {
            Some(p) => p.parse::<u16>().map_err(|_| {
                DbError::connection(
                    format!("Invalid port: {}", p),
                    "Set hostport to a number between 1 and 65535",
                )
            })?,
            None => DEFAULT_MYSQL_PORT,
        };

        let mut options = MySqlConnectOptions::new()
            .host(&config.hostname)
            .port(port)
            .database(&config.database);
        if !config.username.is_empty() {
            options = options.username(&config.username);
        }
        if !config.password.is_empty() {
            options = options.password(&config.password);
        }
        if let Some(charset) = config.charset() {
            options = options.charset(charset);
        }
        Ok(options)
    }
}

impl Default for MySqlConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(
            crate::config::DEFAULT_CONNECT_TIMEOUT_SECS,
        ))
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    async fn connect(&self, dsn: &str, config: &ConnectionConfig) -> DbResult<Box<dyn Link>> {
        let options = Self::connect_options(config)?;

        debug!(dsn = %dsn, "Opening MySQL-protocol link");
        let conn = match timeout(self.connect_timeout, options.connect()).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => return Err(DbError::from(e)),
            Err(_) => {
                return Err(DbError::timeout("connect", self.connect_timeout.as_secs()));
            }
        };

        info!(host = %config.hostname, database = %config.database, "Connected");
        Ok(Box::new(MySqlLink { conn }))
    }
}

/// A single MySQL-protocol connection.
pub struct MySqlLink {
    conn: MySqlConnection,
}

#[async_trait]
impl Link for MySqlLink {
    async fn fetch_all(&mut self, sql: &str, params: &[BoundParam]) -> DbResult<Vec<Row>> {
        // Without params, send raw SQL to avoid prepared statement issues
        let rows = if params.is_empty() {
            (&mut self.conn).fetch(sql).try_collect::<Vec<_>>().await?
        } else {
            let ordered = order_positional(params)?;
            let mut query = sqlx::query(sql);
            for param in ordered {
                query = bind_mysql_param(query, param);
            }
            query.fetch(&mut self.conn).try_collect::<Vec<_>>().await?
        };

        Ok(rows.iter().map(|r| r.to_json_map()).collect())
    }

    async fn execute(&mut self, sql: &str, params: &[BoundParam]) -> DbResult<u64> {
        if params.is_empty() {
            return self.exec(sql).await;
        }

        let ordered = order_positional(params)?;
        let mut query = sqlx::query(sql);
        for param in ordered {
            query = bind_mysql_param(query, param);
        }
        let result = query.execute(&mut self.conn).await?;
        Ok(result.rows_affected())
    }

    async fn exec(&mut self, sql: &str) -> DbResult<u64> {
        let result = (&mut self.conn).execute(sql).await?;
        Ok(result.rows_affected())
    }

    async fn close(self: Box<Self>) -> DbResult<()> {
        self.conn.close().await.map_err(DbError::from)
    }
}
