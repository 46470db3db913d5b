//! Extension registry for dialect-specific query capabilities.
//!
//! The registry is an ordinary value owned by whoever builds queries. Adapters
//! fill it during setup through `&mut`; lookups afterwards only need `&`.

use crate::builder::query::Query;
use crate::error::{DbError, DbResult};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::debug;

/// Handler invoked as `handler(query, args)`; returns the query for chaining.
pub type ExtensionFn = Box<dyn Fn(Query, &[JsonValue]) -> DbResult<Query> + Send + Sync>;

#[derive(Default)]
pub struct ExtensionRegistry {
    handlers: HashMap<String, ExtensionFn>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing any earlier registration.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(Query, &[JsonValue]) -> DbResult<Query> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(extension = %name, "Registering query extension");
        self.handlers.insert(name, Box::new(handler));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the extension `name` against `query`.
    pub fn call(&self, name: &str, query: Query, args: &[JsonValue]) -> DbResult<Query> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| DbError::extension_not_found(name))?;
        handler(query, args)
    }
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}
