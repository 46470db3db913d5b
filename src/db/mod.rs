//! Database access layer.
//!
//! This module provides:
//! - The driver seam (`Link`, `Connector`)
//! - The base `Connection` that delegates to a dialect adapter
//! - The bundled MySQL-protocol transport built on sqlx
//! - Row decoding and parameter binding for that transport

pub mod connection;
pub mod link;
pub mod mysql;
pub mod params;
pub mod types;

pub use connection::Connection;
pub use link::{Connector, Link, Row};
pub use mysql::{MySqlConnector, MySqlLink};
