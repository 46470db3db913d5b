//! DSN construction.

use crate::models::ConnectionConfig;

/// Driver prefix identifying the DM engine.
pub const DSN_PREFIX: &str = "dm";

/// Build `dm:host=<host>[:<port>];dname=<database>[;charset=<charset>]`.
///
/// Values are copied verbatim. An empty hostname drops the host segment but
/// keeps the `host=` key; an empty database still yields `dname=`.
pub fn build_dsn(config: &ConnectionConfig) -> String {
    let mut dsn = format!("{}:host=", DSN_PREFIX);

    if !config.hostname.is_empty() {
        dsn.push_str(&config.hostname);
        if let Some(port) = config.port() {
            dsn.push(':');
            dsn.push_str(port);
        }
        dsn.push(';');
    }

    dsn.push_str("dname=");
    dsn.push_str(&config.database);

    if let Some(charset) = config.charset() {
        dsn.push_str(";charset=");
        dsn.push_str(charset);
    }

    dsn
}
