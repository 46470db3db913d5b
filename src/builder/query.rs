//! Minimal query object the extension hooks operate on.
//!
//! Only what extensions touch lives here: per-field write data and named
//! options. SQL rendering for whole statements is out of scope.

use crate::builder::extension::ExtensionRegistry;
use crate::error::DbResult;
use crate::models::QueryParam;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Default spatial constructor for point values.
pub const DEFAULT_POINT_CONSTRUCTOR: &str = "GeomFromText";

/// Default geometry type for point values.
pub const DEFAULT_GEOMETRY_TYPE: &str = "POINT";

/// A spatial value written through a constructor function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointValue {
    /// Coordinates, e.g. `"120.1 30.2"`
    pub value: String,
    pub constructor: String,
    pub geometry_type: String,
}

impl PointValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            constructor: DEFAULT_POINT_CONSTRUCTOR.to_string(),
            geometry_type: DEFAULT_GEOMETRY_TYPE.to_string(),
        }
    }

    /// SQL fragment, e.g. `GeomFromText('POINT(120.1 30.2)')`.
    pub fn to_sql(&self) -> String {
        format!(
            "{}('{}({})')",
            self.constructor, self.geometry_type, self.value
        )
    }
}

/// Value attached to a field for writing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DataValue {
    Plain { value: QueryParam },
    Point(PointValue),
}

/// Value stored under a query option.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Fields(Vec<String>),
    Value(JsonValue),
}

/// A query under construction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Query {
    table: Option<String>,
    data: Vec<(String, DataValue)>,
    options: HashMap<String, OptionValue>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target table.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Attach write data to a field, replacing any earlier value for it.
    pub fn data(mut self, field: impl Into<String>, value: DataValue) -> Self {
        let field = field.into();
        match self.data.iter_mut().find(|(f, _)| *f == field) {
            Some((_, existing)) => *existing = value,
            None => self.data.push((field, value)),
        }
        self
    }

    pub fn get_data(&self, field: &str) -> Option<&DataValue> {
        self.data.iter().find(|(f, _)| f == field).map(|(_, v)| v)
    }

    /// Write data in insertion order.
    pub fn data_entries(&self) -> impl Iterator<Item = (&str, &DataValue)> {
        self.data.iter().map(|(f, v)| (f.as_str(), v))
    }

    pub fn set_option(mut self, name: impl Into<String>, value: OptionValue) -> Self {
        self.options.insert(name.into(), value);
        self
    }

    pub fn get_option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    /// Invoke a registered extension with positional arguments.
    pub fn extend(
        self,
        registry: &ExtensionRegistry,
        name: &str,
        args: &[JsonValue],
    ) -> DbResult<Self> {
        registry.call(name, self, args)
    }
}
