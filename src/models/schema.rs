//! Schema-related data models.
//!
//! This module defines types for column introspection and plan inspection.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Metadata for one table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub notnull: bool,
    pub default: Option<String>,
    pub primary: bool,
    /// Mirrors `primary`; the catalog exposes no separate identity flag
    pub autoinc: bool,
}

/// Column metadata keyed by (case-folded) column name, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFields {
    entries: Vec<(String, ColumnMetadata)>,
}

impl TableFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a column under `key`. A repeated key replaces the earlier
    /// record but keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, column: ColumnMetadata) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = column,
            None => self.entries.push((key, column)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ColumnMetadata> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnMetadata)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), c))
    }

    /// Primary key columns, in catalog order.
    pub fn primary_keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, c)| c.primary)
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

impl Serialize for TableFields {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, c) in &self.entries {
            map.serialize_entry(k, c)?;
        }
        map.end()
    }
}

/// First row of an EXPLAIN plan with lowercased attribute names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExplainResult {
    pub plan: serde_json::Map<String, JsonValue>,
}

impl ExplainResult {
    /// Build from a raw driver row, lowercasing every key.
    pub fn from_row(row: serde_json::Map<String, JsonValue>) -> Self {
        Self {
            plan: row
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
        }
    }

    pub fn get(&self, attribute: &str) -> Option<&JsonValue> {
        self.plan.get(attribute)
    }

    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }

    /// The free-form `extra` attribute rendered as text.
    pub fn extra(&self) -> Option<String> {
        match self.plan.get("extra")? {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn column(name: &str, primary: bool) -> ColumnMetadata {
        ColumnMetadata {
            name: name.to_string(),
            data_type: "INT".to_string(),
            notnull: primary,
            default: None,
            primary,
            autoinc: primary,
        }
    }

    #[test]
    fn test_table_fields_preserve_order() {
        let mut fields = TableFields::new();
        fields.insert("B", column("B", false));
        fields.insert("A", column("A", true));
        fields.insert("C", column("C", false));

        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["B", "A", "C"]);
        assert_eq!(fields.primary_keys(), vec!["A"]);
    }

    #[test]
    fn test_table_fields_replace_keeps_position() {
        let mut fields = TableFields::new();
        fields.insert("A", column("A", false));
        fields.insert("B", column("B", false));
        fields.insert("A", column("A", true));

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.keys().next(), Some("A"));
        assert!(fields.get("A").unwrap().primary);
    }

    #[test]
    fn test_table_fields_serialize_as_ordered_map() {
        let mut fields = TableFields::new();
        fields.insert("Z", column("Z", false));
        fields.insert("A", column("A", false));

        let json = serde_json::to_string(&fields).unwrap();
        assert!(json.find("\"Z\"").unwrap() < json.find("\"A\"").unwrap());
        assert!(json.contains("\"type\":\"INT\""));
    }

    #[test]
    fn test_explain_result_lowercases_keys() {
        let row = json!({"ID": 1, "Extra": "Using where"});
        let result = ExplainResult::from_row(row.as_object().unwrap().clone());

        assert_eq!(result.get("id"), Some(&json!(1)));
        assert_eq!(result.extra(), Some("Using where".to_string()));
        assert!(result.get("Extra").is_none());
    }

    #[test]
    fn test_explain_result_null_extra() {
        let row = json!({"extra": null});
        let result = ExplainResult::from_row(row.as_object().unwrap().clone());
        assert_eq!(result.extra(), None);
    }
}
