//! Schema change statements.
//!
//! Builders return SQL text; statements that depend on catalog state (like
//! dropping the indexes of a removed column) are sequenced by the session.

use crate::ast::Value;
use crate::error::SqlaResult;
use crate::types::{LogicalType, quote, quote_column_name, quote_string, quote_table_name, type_to_sql};

/// Appended to the new name when a rename only changes case. The server
/// treats such a rename as a no-op, so it goes through this name first.
pub const CASE_RENAME_SUFFIX: &str = "if_the_only_change_is_case_sqlanywhere_doesnt_rename_the_column";

/// Column modifiers for [`change_column`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnOptions {
    pub limit: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub default: Option<Value>,
    pub null: Option<bool>,
}

pub fn rename_table(name: &str, new_name: &str) -> String {
    format!("ALTER TABLE {} RENAME {}", quote_table_name(name), quote_table_name(new_name))
}

/// One statement, or two when only the case differs.
pub fn rename_column(table: &str, column: &str, new_column: &str) -> Vec<String> {
    let stmt = |from: &str, to: &str| {
        format!(
            "ALTER TABLE {} RENAME {} TO {}",
            quote_table_name(table),
            quote_column_name(from),
            quote_column_name(to)
        )
    };

    if column.to_lowercase() == new_column.to_lowercase() {
        let temp = format!("{}{}", new_column, CASE_RENAME_SUFFIX);
        vec![stmt(column, &temp), stmt(&temp, new_column)]
    } else {
        vec![stmt(column, new_column)]
    }
}

pub fn change_column_default(table: &str, column: &str, default: &Value) -> SqlaResult<String> {
    Ok(format!(
        "ALTER TABLE {} ALTER {} DEFAULT {}",
        quote_table_name(table),
        quote_column_name(column),
        quote(default)?
    ))
}

/// Make a column nullable or not. When disallowing NULL with a default,
/// existing NULLs are backfilled first.
pub fn change_column_null(
    table: &str,
    column: &str,
    null: bool,
    default: Option<&Value>,
) -> SqlaResult<Vec<String>> {
    let mut stmts = Vec::new();
    if let (false, Some(value)) = (null, default) {
        stmts.push(format!(
            "UPDATE {} SET {}={} WHERE {} IS NULL",
            quote_table_name(table),
            quote_column_name(column),
            quote(value)?,
            quote_column_name(column)
        ));
    }
    stmts.push(format!(
        "ALTER TABLE {} ALTER {} {}",
        quote_table_name(table),
        quote_column_name(column),
        if null { "NULL" } else { "NOT NULL" }
    ));
    Ok(stmts)
}

pub fn change_column(
    table: &str,
    column: &str,
    logical: LogicalType,
    options: &ColumnOptions,
) -> SqlaResult<String> {
    let mut sql = format!(
        "ALTER TABLE {} ALTER {} {}",
        quote_table_name(table),
        quote_column_name(column),
        type_to_sql(logical, options.limit, options.precision, options.scale)
    );
    if let Some(default) = &options.default {
        sql.push_str(" DEFAULT ");
        sql.push_str(&quote(default)?);
    }
    match options.null {
        Some(true) => sql.push_str(" NULL"),
        Some(false) => sql.push_str(" NOT NULL"),
        None => {}
    }
    Ok(sql)
}

/// Catalog query listing the indexes a column participates in.
pub fn column_indexes_query(table: &str, column: &str) -> String {
    format!(
        "SELECT \"index_name\" FROM SYS.SYSTAB join SYS.SYSTABCOL join SYS.SYSIDXCOL join SYS.SYSIDX \
         WHERE \"column_name\" = '{}' AND \"table_name\" = '{}'",
        quote_string(column),
        quote_string(table)
    )
}

pub fn remove_column(table: &str, column: &str) -> String {
    format!("ALTER TABLE {} DROP {}", quote_table_name(table), quote_column_name(column))
}

pub fn remove_index(table: &str, index_name: &str) -> String {
    format!("DROP INDEX {}.{}", quote_table_name(table), quote_column_name(index_name))
}
