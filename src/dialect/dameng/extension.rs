//! The `point` query capability.

use crate::builder::{
    DEFAULT_GEOMETRY_TYPE, DEFAULT_POINT_CONSTRUCTOR, DataValue, OptionValue, PointValue, Query,
};
use crate::db::link::value_as_string;
use crate::error::{DbError, DbResult};
use serde_json::Value as JsonValue;

/// Capability name.
pub const POINT: &str = "point";

/// `point(query, field, value = null, constructor = "GeomFromText", type = "POINT")`
///
/// With a value, `field` receives a point write value. Without one, `field`
/// (comma-separated text or an array) marks spatial output columns through the
/// `point` option.
pub fn point(query: Query, args: &[JsonValue]) -> DbResult<Query> {
    let field = args
        .first()
        .ok_or_else(|| DbError::invalid_input("point: field argument is required"))?;
    let value = args.get(1).and_then(value_as_string);

    let Some(value) = value else {
        return Ok(query.set_option(POINT, OptionValue::Fields(field_list(field)?)));
    };

    let JsonValue::String(field) = field else {
        return Err(DbError::invalid_input(
            "point: writing a value requires a single field name",
        ));
    };

    let constructor = args
        .get(2)
        .and_then(value_as_string)
        .unwrap_or_else(|| DEFAULT_POINT_CONSTRUCTOR.to_string());
    let geometry_type = args
        .get(3)
        .and_then(value_as_string)
        .unwrap_or_else(|| DEFAULT_GEOMETRY_TYPE.to_string());

    Ok(query.data(
        field.clone(),
        DataValue::Point(PointValue {
            value,
            constructor,
            geometry_type,
        }),
    ))
}

fn field_list(field: &JsonValue) -> DbResult<Vec<String>> {
    match field {
        JsonValue::String(s) => Ok(s.split(',').map(str::to_string).collect()),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| match item {
                JsonValue::String(s) => Ok(s.clone()),
                other => Err(DbError::invalid_input(format!(
                    "point: field names must be strings, got {}",
                    other
                ))),
            })
            .collect(),
        other => Err(DbError::invalid_input(format!(
            "point: field must be a string or an array of strings, got {}",
            other
        ))),
    }
}
