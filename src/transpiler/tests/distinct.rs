//! DISTINCT handling.

use pretty_assertions::assert_eq;

use crate::ast::builders::*;
use crate::ast::*;
use crate::transpiler::{ToSql, columns_for_distinct, order_by_in_distinct};

#[test]
fn test_distinct_quantifier() {
    let stmt = SelectStatement::new(SelectCore::from_table("orders").project(col("status")).distinct()).limit(5);
    assert_eq!(
        stmt.to_sql(),
        "SELECT DISTINCT TOP 5 \"status\" FROM \"orders\" ORDER BY 1"
    );
}

#[test]
fn test_raw_marker_moves_before_top() {
    let stmt = SelectStatement::new(SelectCore::from_table("orders").project(raw("distinct \"status\""))).limit(5);
    assert_eq!(
        stmt.to_sql(),
        "SELECT DISTINCT TOP 5 \"status\" FROM \"orders\" ORDER BY 1"
    );
}

#[test]
fn test_distinct_dropped_for_single_row() {
    let quantified = SelectStatement::new(SelectCore::from_table("orders").project(col("status")).distinct()).limit(1);
    assert_eq!(
        quantified.to_sql(),
        "SELECT TOP 1 \"status\" FROM \"orders\" ORDER BY 1"
    );

    let marked = SelectStatement::new(
        SelectCore::from_table("orders")
            .project(raw("DISTINCT \"status\""))
            .group(col("status")),
    )
    .limit(1);
    let sql = marked.to_sql();
    assert!(!sql.to_uppercase().contains("DISTINCT"), "{}", sql);
    assert_eq!(
        sql,
        "SELECT TOP 1 \"status\" FROM \"orders\" GROUP BY \"status\" ORDER BY 1"
    );
}

#[test]
fn test_distinct_kept_without_single_row_cap() {
    let stmt = SelectStatement::new(SelectCore::from_table("orders").project(col("status")).distinct());
    assert_eq!(stmt.to_sql(), "SELECT DISTINCT \"status\" FROM \"orders\"");
}

#[test]
fn test_columns_for_distinct_appends_aliased_keys() {
    let projections = vec![col("col1")];
    let orders = vec![Ordering::asc(col("col2")), Ordering::desc(func("lower", vec![col("col3")]))];
    let columns = columns_for_distinct(&projections, &orders);
    assert_eq!(
        columns,
        vec![
            col("col1"),
            col("col2").alias("alias_0"),
            func("lower", vec![col("col3")]).alias("alias_1"),
        ]
    );
}

#[test]
fn test_distinct_with_unprojected_order_column() {
    let stmt = SelectStatement::new(SelectCore::from_table("t").project(col("col1")).distinct())
        .order_by(Ordering::asc(col("col2")));
    let expanded = order_by_in_distinct(stmt);
    assert_eq!(
        expanded.to_sql(),
        "SELECT DISTINCT \"col1\", \"col2\" AS \"alias_0\" FROM \"t\" ORDER BY \"col2\""
    );
}

#[test]
fn test_projected_order_column_left_alone() {
    let stmt = SelectStatement::new(SelectCore::from_table("t").project(col("col1")).distinct())
        .order_by(Ordering::desc(col("col1")));
    assert_eq!(order_by_in_distinct(stmt.clone()), stmt);

    let not_distinct = SelectStatement::new(SelectCore::from_table("t").project(col("col1")))
        .order_by(Ordering::asc(col("col2")));
    assert_eq!(order_by_in_distinct(not_distinct.clone()), not_distinct);
}

#[test]
fn test_aggregate_distinct_is_untouched() {
    let stmt = SelectStatement::new(SelectCore::from_table("t").project(raw("COUNT(DISTINCT id)")));
    assert_eq!(stmt.to_sql(), "SELECT COUNT(DISTINCT id) FROM \"t\"");

    let literal = SelectStatement::new(SelectCore::from_table("t").project(raw("'distinct x' AS label")));
    assert_eq!(literal.to_sql(), "SELECT 'distinct x' AS label FROM \"t\"");
}
