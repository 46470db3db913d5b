//! Connection-related data models.
//!
//! This module defines types for connection configuration, field-name case
//! folding and the advisory XA transaction state kept per connection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Configuration for a database connection.
///
/// Values are trusted input from the configuration loader; nothing here is
/// validated or escaped before it reaches the DSN.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub hostname: String,
    /// Empty or absent means "driver default".
    #[serde(default)]
    pub hostport: Option<String>,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub username: String,
    /// Contains sensitive data - never log
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub charset: Option<String>,
}

impl ConnectionConfig {
    /// Create a configuration for a host and database.
    pub fn new(hostname: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            database: database.into(),
            ..Default::default()
        }
    }

    /// Set the port.
    pub fn with_port(mut self, hostport: impl Into<String>) -> Self {
        self.hostport = Some(hostport.into());
        self
    }

    /// Set the login credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Set the client charset.
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Port, if one was configured and is non-empty.
    pub fn port(&self) -> Option<&str> {
        self.hostport.as_deref().filter(|p| !p.is_empty())
    }

    /// Charset, if one was configured and is non-empty.
    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref().filter(|c| !c.is_empty())
    }
}

/// Case convention applied to field-name keys returned by introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FieldCase {
    Lower,
    Upper,
    /// Keys are returned exactly as the catalog spells them
    #[default]
    Natural,
}

impl FieldCase {
    /// Fold a key according to this convention.
    pub fn apply(&self, key: &str) -> String {
        match self {
            Self::Lower => key.to_lowercase(),
            Self::Upper => key.to_uppercase(),
            Self::Natural => key.to_string(),
        }
    }
}

impl std::fmt::Display for FieldCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lower => write!(f, "lower"),
            Self::Upper => write!(f, "upper"),
            Self::Natural => write!(f, "natural"),
        }
    }
}

/// Behavioural switches for a [`Connection`](crate::db::Connection).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConnectionSettings {
    #[serde(default)]
    pub field_case: FieldCase,
    /// Run EXPLAIN after every SELECT and log the plan
    #[serde(default)]
    pub sql_explain: bool,
}

/// Phase of an XA transaction branch on one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XaPhase {
    #[default]
    None,
    Started,
    Ended,
    Prepared,
    Committed,
    RolledBack,
}

/// Advisory record of the XA branch last driven through a connection.
///
/// This is bookkeeping only; it never blocks a command from being issued.
#[derive(Debug, Clone, Serialize)]
pub struct XidState {
    pub xid: String,
    pub phase: XaPhase,
    pub started_at: DateTime<Utc>,
}

impl XidState {
    /// Record a freshly started branch.
    pub fn started(xid: impl Into<String>) -> Self {
        Self {
            xid: xid.into(),
            phase: XaPhase::Started,
            started_at: Utc::now(),
        }
    }
}

/// Caller-side XA transaction identifier helpers.
pub struct Xid;

impl Xid {
    /// Generate a unique `xa`-prefixed transaction id.
    pub fn generate() -> String {
        format!("xa{}", uuid::Uuid::new_v4().simple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ConnectionConfig::new("db1", "ORCL")
            .with_port("5236")
            .with_credentials("SYSDBA", "secret")
            .with_charset("UTF8");

        assert_eq!(config.hostname, "db1");
        assert_eq!(config.port(), Some("5236"));
        assert_eq!(config.charset(), Some("UTF8"));
        assert_eq!(config.username, "SYSDBA");
    }

    #[test]
    fn test_empty_port_and_charset_are_absent() {
        let mut config = ConnectionConfig::new("db1", "ORCL").with_port("");
        config.charset = Some(String::new());
        assert_eq!(config.port(), None);
        assert_eq!(config.charset(), None);
    }

    #[test]
    fn test_password_not_serialized() {
        let config = ConnectionConfig::new("db1", "ORCL").with_credentials("u", "hunter2");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: ConnectionConfig =
            serde_json::from_str(r#"{"hostname": "h", "database": "d"}"#).unwrap();
        assert!(config.hostport.is_none());
        assert!(config.charset.is_none());
        assert_eq!(config.username, "");
    }

    #[test]
    fn test_field_case_apply() {
        assert_eq!(FieldCase::Lower.apply("USER_ID"), "user_id");
        assert_eq!(FieldCase::Upper.apply("user_id"), "USER_ID");
        assert_eq!(FieldCase::Natural.apply("User_Id"), "User_Id");
    }

    #[test]
    fn test_field_case_serde() {
        let case: FieldCase = serde_json::from_str(r#""upper""#).unwrap();
        assert_eq!(case, FieldCase::Upper);
        assert_eq!(FieldCase::default(), FieldCase::Natural);
    }

    #[test]
    fn test_xid_generate_unique() {
        let a = Xid::generate();
        let b = Xid::generate();
        assert!(a.starts_with("xa"));
        assert_eq!(a.len(), 34);
        assert_ne!(a, b);
    }
}
