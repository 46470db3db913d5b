//! Schema introspection against the DM catalog views.
//!
//! Table names are interpolated into the catalog SQL verbatim; callers must
//! only pass trusted identifiers.

use crate::db::link::{Link, Row, value_as_flag, value_as_string};
use crate::error::DbResult;
use crate::models::{ColumnMetadata, FieldCase, TableFields};
use tracing::debug;

/// Table listing for the connected schema.
pub const LIST_TABLES: &str = "select table_name from all_tables";

/// Column catalog joined against the primary-key constraint catalog.
pub fn describe_columns_sql(table_name: &str) -> String {
    format!(
        "select a.column_name,data_type,DECODE (nullable, 'Y', 0, 1) notnull,data_default, \
         DECODE (A .column_name,b.column_name,1,0) pk from all_tab_columns a,\
         (select column_name from all_constraints c, all_cons_columns col \
         where c.constraint_name = col.constraint_name and c.constraint_type = 'P' \
         and c.table_name = '{table}' ) b \
         where table_name = '{table}' and a.column_name = b.column_name (+)",
        table = table_name
    )
}

/// Strip an alias or trailing clause: `"users u"` → `"users"`.
pub fn bare_table_name(table_name: &str) -> &str {
    table_name.split(' ').next().unwrap_or_default()
}

/// Build a column record from a catalog row with lowercased keys.
pub fn column_from_row(row: &Row) -> ColumnMetadata {
    let text = |key: &str| row.get(key).and_then(value_as_string);
    let flag = |key: &str| row.get(key).is_some_and(value_as_flag);

    let pk = flag("pk");
    ColumnMetadata {
        name: text("column_name").unwrap_or_default(),
        data_type: text("data_type").unwrap_or_default(),
        notnull: flag("notnull"),
        default: text("data_default"),
        primary: pk,
        autoinc: pk,
    }
}

/// Fold catalog rows into a field map keyed by column name under `case`.
pub fn fields_from_rows(rows: Vec<Row>, case: FieldCase) -> TableFields {
    let mut fields = TableFields::new();
    for row in rows {
        let row: Row = row
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        let column = column_from_row(&row);
        fields.insert(case.apply(&column.name), column);
    }
    fields
}

/// Column metadata for `table_name`. An unknown table yields an empty map.
pub async fn get_fields(
    link: &mut dyn Link,
    table_name: &str,
    case: FieldCase,
) -> DbResult<TableFields> {
    let table = bare_table_name(table_name);
    let sql = describe_columns_sql(table);

    let rows = link.fetch_all(&sql, &[]).await?;
    debug!(table = %table, columns = rows.len(), "Fetched column catalog");

    Ok(fields_from_rows(rows, case))
}

/// Table names in catalog order. `db_name` is accepted for signature parity;
/// the catalog is already scoped to the connected database.
pub async fn get_tables(link: &mut dyn Link, db_name: &str) -> DbResult<Vec<String>> {
    let rows = link.fetch_all(LIST_TABLES, &[]).await?;
    debug!(db_name = %db_name, tables = rows.len(), "Fetched table catalog");

    Ok(rows
        .iter()
        .map(|row| {
            row.values()
                .next()
                .and_then(value_as_string)
                .unwrap_or_default()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_bare_table_name() {
        assert_eq!(bare_table_name("users u"), "users");
        assert_eq!(bare_table_name("users"), "users");
        assert_eq!(bare_table_name("users  AS u"), "users");
        assert_eq!(bare_table_name(""), "");
    }

    #[test]
    fn test_describe_columns_sql_interpolates_twice() {
        let sql = describe_columns_sql("ORDERS");
        assert_eq!(sql.matches("'ORDERS'").count(), 2);
        assert!(sql.contains("c.constraint_type = 'P'"));
        assert!(sql.contains("a.column_name = b.column_name (+)"));
    }

    #[test]
    fn test_column_from_primary_key_row() {
        let column = column_from_row(&row(json!({
            "column_name": "ID",
            "data_type": "INT",
            "notnull": 1,
            "data_default": null,
            "pk": 1
        })));

        assert_eq!(column.name, "ID");
        assert!(column.notnull);
        assert!(column.primary);
        assert!(column.autoinc);
        assert_eq!(column.default, None);
    }

    #[test]
    fn test_column_from_plain_row() {
        let column = column_from_row(&row(json!({
            "column_name": "NAME",
            "data_type": "VARCHAR",
            "notnull": "0",
            "data_default": "'none'",
            "pk": "0"
        })));

        assert!(!column.notnull);
        assert!(!column.primary);
        assert!(!column.autoinc);
        assert_eq!(column.default.as_deref(), Some("'none'"));
    }

    #[test]
    fn test_fields_from_rows_lowercases_row_keys() {
        let rows = vec![row(json!({
            "COLUMN_NAME": "ID",
            "DATA_TYPE": "BIGINT",
            "NOTNULL": 1,
            "DATA_DEFAULT": null,
            "PK": 1
        }))];
        let fields = fields_from_rows(rows, FieldCase::Natural);

        let id = fields.get("ID").unwrap();
        assert_eq!(id.data_type, "BIGINT");
        assert!(id.primary);
    }

    #[test]
    fn test_fields_from_rows_applies_case_to_keys_only() {
        let rows = vec![row(json!({"column_name": "USER_ID", "pk": 0}))];
        let fields = fields_from_rows(rows, FieldCase::Lower);

        assert!(fields.contains_key("user_id"));
        assert_eq!(fields.get("user_id").unwrap().name, "USER_ID");
    }

    #[test]
    fn test_fields_from_no_rows_is_empty() {
        assert!(fields_from_rows(Vec::new(), FieldCase::Upper).is_empty());
    }
}
