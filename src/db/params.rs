//! Parameter binding utilities for the bundled transport.
//!
//! This module orders resolved binds for `?` placeholders and applies them to
//! sqlx query objects.

use crate::error::{DbError, DbResult};
use crate::models::{BoundParam, ParamType, Placeholder, QueryParam};
use sqlx::MySql;
use sqlx::mysql::MySqlArguments;

/// Order positional binds by placeholder. The MySQL protocol has no named
/// placeholders, so a `:name` bind is rejected.
pub(crate) fn order_positional(params: &[BoundParam]) -> DbResult<Vec<&BoundParam>> {
    let mut ordered = Vec::with_capacity(params.len());
    for param in params {
        match &param.placeholder {
            Placeholder::Position(n) => ordered.push((*n, param)),
            Placeholder::Name(name) => {
                return Err(DbError::invalid_input(format!(
                    "Named placeholder {} is not supported by the MySQL-protocol transport",
                    name
                )));
            }
        }
    }
    ordered.sort_by_key(|(n, _)| *n);
    Ok(ordered.into_iter().map(|(_, p)| p).collect())
}

/// Bind a parameter to a MySQL query.
///
/// `Str`-marked numbers travel as text, the same way the driver would receive
/// a string-typed bind.
pub(crate) fn bind_mysql_param<'q>(
    query: sqlx::query::Query<'q, MySql, MySqlArguments>,
    param: &'q BoundParam,
) -> sqlx::query::Query<'q, MySql, MySqlArguments> {
    let as_text = param.param_type == Some(ParamType::Str);
    match &param.value {
        QueryParam::Null => query.bind(None::<String>),
        QueryParam::Bool(v) => query.bind(*v),
        QueryParam::Int(v) if as_text => query.bind(v.to_string()),
        QueryParam::Int(v) => query.bind(*v),
        QueryParam::Float(v) if as_text => query.bind(v.to_string()),
        QueryParam::Float(v) => query.bind(*v),
        QueryParam::String(v) => query.bind(v.as_str()),
        QueryParam::Bytes(v) => query.bind(v.as_slice()),
    }
}
