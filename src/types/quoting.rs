//! Literal and identifier quoting for SQL text.

use crate::ast::Value;
use crate::error::{AdapterError, SqlaResult};

/// Wrap a column name in double quotes.
///
/// Embedded `\` and `"` are removed, not escaped, so an identifier that
/// contains them refers to a different column afterwards.
pub fn quote_column_name(name: &str) -> String {
    let cleaned: String = name.chars().filter(|c| *c != '\\' && *c != '"').collect();
    format!("\"{}\"", cleaned)
}

/// Table names follow column name rules. A dotted `owner.table` is quoted
/// part by part.
pub fn quote_table_name(name: &str) -> String {
    name.split('.').map(quote_column_name).collect::<Vec<_>>().join(".")
}

/// Escape a string for use inside single quotes.
pub fn quote_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "''")
}

/// Render a value as an SQL literal.
///
/// Binary payloads and non-finite floats cannot be inlined; they must go
/// through a bind.
pub fn quote(value: &Value) -> SqlaResult<String> {
    quote_literal(value).ok_or_else(|| {
        AdapterError::Argument(format!("{} must be bound as a parameter, not quoted", value.logical_type().name()))
    })
}

/// Like [`quote`], but `None` for values that have no literal form.
pub fn quote_literal(value: &Value) -> Option<String> {
    let sql = match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) if f.is_finite() => f.to_string(),
        // NaN and infinities have no literal form
        Value::Float(_) => return None,
        Value::Decimal(d) => d.to_string(),
        Value::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
        Value::Time(t) => format!("'{}'", t.format("%H:%M:%S%.f")),
        Value::DateTime(dt) => format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S%.f")),
        Value::Text(s) => format!("'{}'", quote_string(s)),
        Value::Binary(_) => return None,
    };
    Some(sql)
}
