//! Configuration handling for the `dm-dialect` command line.
//!
//! This module provides configuration management via CLI arguments and environment variables.

use crate::models::{ConnectionConfig, ConnectionSettings, FieldCase, QueryParam};
use clap::{Parser, Subcommand};
use std::time::Duration;

pub const DEFAULT_HOSTNAME: &str = "127.0.0.1";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// What the command line should do once connected.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Print the connection string without connecting
    Dsn,
    /// List tables of the connected database
    Tables,
    /// Describe the columns of a table
    Fields {
        /// Table name (anything after the first space is ignored)
        table: String,
    },
    /// Run a statement and print the first row of its EXPLAIN plan
    Explain {
        sql: String,
        /// Positional parameters as JSON literals, e.g. --param 42 --param '"abc"'
        #[arg(long = "param", value_name = "JSON", value_parser = parse_param)]
        params: Vec<QueryParam>,
    },
}

/// Parse a JSON literal into a query parameter; bare words become strings.
fn parse_param(s: &str) -> Result<QueryParam, String> {
    match serde_json::from_str::<QueryParam>(s) {
        Ok(param) => Ok(param),
        Err(_) => Ok(QueryParam::String(s.to_string())),
    }
}

/// Configuration for the `dm-dialect` command line.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dm-dialect",
    about = "Inspect a Dameng database through the DM dialect adapter",
    version,
    author
)]
pub struct Config {
    /// Database host
    #[arg(long, default_value = DEFAULT_HOSTNAME, env = "DM_HOSTNAME")]
    pub hostname: String,

    /// Database port (empty uses the driver default)
    #[arg(long, env = "DM_HOSTPORT")]
    pub hostport: Option<String>,

    /// Database name
    #[arg(short = 'D', long, default_value = "", env = "DM_DATABASE")]
    pub database: String,

    /// Login user
    #[arg(short, long, default_value = "", env = "DM_USERNAME")]
    pub username: String,

    /// Login password (sensitive - not logged)
    #[arg(short, long, default_value = "", env = "DM_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Client character set
    #[arg(long, env = "DM_CHARSET")]
    pub charset: Option<String>,

    /// Case applied to field names returned by `fields`
    #[arg(long, value_enum, default_value_t = FieldCase::Natural, env = "DM_FIELD_CASE")]
    pub field_case: FieldCase,

    /// Run EXPLAIN after every SELECT and log the plan
    #[arg(long, env = "DM_SQL_EXPLAIN")]
    pub sql_explain: bool,

    /// Connection timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS,
        env = "DM_CONNECT_TIMEOUT"
    )]
    pub connect_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = DEFAULT_LOG_LEVEL, env = "LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "DM_JSON_LOGS")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            hostport: None,
            database: String::new(),
            username: String::new(),
            password: String::new(),
            charset: None,
            field_case: FieldCase::Natural,
            sql_explain: false,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            json_logs: false,
            command: Command::Dsn,
        }
    }

    /// Connection configuration handed to the adapter.
    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            hostname: self.hostname.clone(),
            hostport: self.hostport.clone(),
            database: self.database.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            charset: self.charset.clone(),
        }
    }

    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            field_case: self.field_case,
            sql_explain: self.sql_explain,
        }
    }

    /// Get the connection timeout as a Duration.
    pub fn connect_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
