//! Schema change statements.

use pretty_assertions::assert_eq;

use crate::ast::Value;
use crate::error::AdapterError;
use crate::transpiler::ddl::*;
use crate::types::LogicalType;

#[test]
fn test_rename_table() {
    assert_eq!(
        rename_table("orders", "purchases"),
        "ALTER TABLE \"orders\" RENAME \"purchases\""
    );
}

#[test]
fn test_rename_column() {
    assert_eq!(
        rename_column("users", "mail", "email"),
        vec!["ALTER TABLE \"users\" RENAME \"mail\" TO \"email\"".to_string()]
    );
}

#[test]
fn test_case_only_rename_goes_through_temp_name() {
    let stmts = rename_column("users", "email", "Email");
    let temp = format!("Email{}", CASE_RENAME_SUFFIX);
    assert_eq!(
        stmts,
        vec![
            format!("ALTER TABLE \"users\" RENAME \"email\" TO \"{}\"", temp),
            format!("ALTER TABLE \"users\" RENAME \"{}\" TO \"Email\"", temp),
        ]
    );
}

#[test]
fn test_change_column_default() {
    assert_eq!(
        change_column_default("users", "active", &Value::Bool(true)).unwrap(),
        "ALTER TABLE \"users\" ALTER \"active\" DEFAULT 1"
    );
    assert_eq!(
        change_column_default("users", "nick", &Value::from("it's")).unwrap(),
        "ALTER TABLE \"users\" ALTER \"nick\" DEFAULT 'it''s'"
    );
}

#[test]
fn test_binary_default_is_rejected() {
    let err = change_column_default("files", "blob", &Value::Binary(vec![1])).unwrap_err();
    assert!(matches!(err, AdapterError::Argument(_)));
}

#[test]
fn test_change_column_null_with_backfill() {
    assert_eq!(
        change_column_null("users", "role", false, Some(&Value::from("member"))).unwrap(),
        vec![
            "UPDATE \"users\" SET \"role\"='member' WHERE \"role\" IS NULL".to_string(),
            "ALTER TABLE \"users\" ALTER \"role\" NOT NULL".to_string(),
        ]
    );
    assert_eq!(
        change_column_null("users", "role", true, Some(&Value::from("member"))).unwrap(),
        vec!["ALTER TABLE \"users\" ALTER \"role\" NULL".to_string()]
    );
}

#[test]
fn test_change_column() {
    let options = ColumnOptions {
        limit: Some(8),
        default: Some(Value::Int(0)),
        null: Some(false),
        ..Default::default()
    };
    assert_eq!(
        change_column("events", "count", LogicalType::Integer, &options).unwrap(),
        "ALTER TABLE \"events\" ALTER \"count\" bigint DEFAULT 0 NOT NULL"
    );

    let options = ColumnOptions {
        precision: Some(12),
        scale: Some(4),
        null: Some(true),
        ..Default::default()
    };
    assert_eq!(
        change_column("events", "amount", LogicalType::Decimal, &options).unwrap(),
        "ALTER TABLE \"events\" ALTER \"amount\" decimal(12,4) NULL"
    );
}

#[test]
fn test_remove_column_and_index() {
    assert_eq!(remove_column("users", "legacy"), "ALTER TABLE \"users\" DROP \"legacy\"");
    assert_eq!(remove_index("users", "ix_email"), "DROP INDEX \"users\".\"ix_email\"");
    let lookup = column_indexes_query("o'neil", "legacy");
    assert!(lookup.contains("\"table_name\" = 'o''neil'"), "{}", lookup);
}
