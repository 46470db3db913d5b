//! Dameng (DM) dialect adapter.
//!
//! This library lets a generic database-access layer talk to the DM engine:
//! DSN construction, schema introspection, EXPLAIN diagnostics, XA transaction
//! control and the `point` query capability.

pub mod builder;
pub mod config;
pub mod db;
pub mod dialect;
pub mod error;
pub mod models;

pub use config::Config;
pub use db::Connection;
pub use dialect::{Dameng, DialectAdapter};
pub use error::{DbError, DbResult};
