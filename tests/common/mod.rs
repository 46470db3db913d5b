//! Scripted in-memory driver shared by the integration tests.
//!
//! `ScriptedConnector` hands out links that record every statement they
//! receive and answer row-returning statements from a canned script.

#![allow(dead_code)]

use async_trait::async_trait;
use dm_dialect::db::{Connector, Link, Row};
use dm_dialect::error::{DbError, DbResult};
use dm_dialect::models::{BoundParam, ConnectionConfig};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// A statement as the link saw it.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch { sql: String, params: Vec<BoundParam> },
    Execute { sql: String, params: Vec<BoundParam> },
    Exec { sql: String },
    Close,
}

impl Call {
    pub fn sql(&self) -> Option<&str> {
        match self {
            Self::Fetch { sql, .. } | Self::Execute { sql, .. } | Self::Exec { sql } => Some(sql),
            Self::Close => None,
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    /// (statement prefix, rows) pairs; first match wins
    rows: Vec<(String, Vec<Row>)>,
    /// Statements containing this text fail with a database error
    fail_on: Option<String>,
}

#[derive(Clone, Default)]
pub struct ScriptedConnector {
    calls: Arc<Mutex<Vec<Call>>>,
    script: Arc<Mutex<Script>>,
    dsns: Arc<Mutex<Vec<String>>>,
    refuse: bool,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A connector whose every connect attempt fails.
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    /// Answer statements starting with `prefix` with `rows`.
    pub fn with_rows(self, prefix: &str, rows: Vec<Value>) -> Self {
        let rows = rows
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap_or_default())
            .collect();
        self.script
            .lock()
            .unwrap()
            .rows
            .push((prefix.to_string(), rows));
        self
    }

    /// Fail statements containing `needle`.
    pub fn failing_on(self, needle: &str) -> Self {
        self.script.lock().unwrap().fail_on = Some(needle.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Text of every statement in order.
    pub fn statements(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|c| c.sql().map(str::to_string))
            .collect()
    }

    pub fn dsns(&self) -> Vec<String> {
        self.dsns.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn connect(&self, dsn: &str, _config: &ConnectionConfig) -> DbResult<Box<dyn Link>> {
        self.dsns.lock().unwrap().push(dsn.to_string());
        if self.refuse {
            return Err(DbError::connection(
                "Connection refused",
                "Check that the database server is running",
            ));
        }
        Ok(Box::new(ScriptedLink {
            calls: self.calls.clone(),
            script: self.script.clone(),
        }))
    }
}

struct ScriptedLink {
    calls: Arc<Mutex<Vec<Call>>>,
    script: Arc<Mutex<Script>>,
}

impl ScriptedLink {
    fn check(&self, sql: &str) -> DbResult<()> {
        let script = self.script.lock().unwrap();
        match &script.fail_on {
            Some(needle) if sql.contains(needle.as_str()) => Err(DbError::database(
                format!("statement rejected: {}", sql),
                Some("XAE04".to_string()),
                "Check the statement against the server state",
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Link for ScriptedLink {
    async fn fetch_all(&mut self, sql: &str, params: &[BoundParam]) -> DbResult<Vec<Row>> {
        self.calls.lock().unwrap().push(Call::Fetch {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        self.check(sql)?;

        let script = self.script.lock().unwrap();
        Ok(script
            .rows
            .iter()
            .find(|(prefix, _)| sql.starts_with(prefix.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }

    async fn execute(&mut self, sql: &str, params: &[BoundParam]) -> DbResult<u64> {
        self.calls.lock().unwrap().push(Call::Execute {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        self.check(sql)?;
        Ok(1)
    }

    async fn exec(&mut self, sql: &str) -> DbResult<u64> {
        self.calls.lock().unwrap().push(Call::Exec {
            sql: sql.to_string(),
        });
        self.check(sql)?;
        Ok(0)
    }

    async fn close(self: Box<Self>) -> DbResult<()> {
        self.calls.lock().unwrap().push(Call::Close);
        Ok(())
    }
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Capture WARN and above on the current thread until the guard drops.
pub fn capture_warnings() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    (capture, tracing::subscriber::set_default(subscriber))
}

pub fn config() -> ConnectionConfig {
    ConnectionConfig::new("127.0.0.1", "TESTDB")
        .with_port("5236")
        .with_credentials("SYSDBA", "SYSDBA")
}
