//! Data models for the Dameng dialect adapter.
//!
//! This module re-exports all model types used throughout the crate.

pub mod connection;
pub mod query;
pub mod schema;

// Re-export commonly used types
pub use connection::{
    ConnectionConfig, ConnectionSettings, FieldCase, XaPhase, Xid, XidState,
};
pub use query::{Bind, BindKey, BoundParam, ParamType, Placeholder, QueryParam, bind_all};
pub use schema::{ColumnMetadata, ExplainResult, TableFields};
