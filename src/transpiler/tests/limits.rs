//! TOP / START AT generation.

use pretty_assertions::assert_eq;

use crate::ast::builders::*;
use crate::ast::*;
use crate::transpiler::{ToSql, UNBOUNDED_LIMIT};

#[test]
fn test_limit_and_offset() {
    let stmt = SelectStatement::from_table("orders").limit(10).offset(20);
    assert_eq!(
        stmt.to_sql(),
        "SELECT TOP 10 START AT 21 * FROM \"orders\" ORDER BY 1"
    );
}

#[test]
fn test_offset_without_limit() {
    for offset in [0u64, 1, 99] {
        let sql = SelectStatement::from_table("orders").offset(offset).to_sql();
        assert!(sql.contains(&format!("TOP {}", UNBOUNDED_LIMIT)), "{}", sql);
        assert!(sql.contains(&format!("START AT {}", offset + 1)), "{}", sql);
    }
}

#[test]
fn test_zero_limit_never_emits_top_zero() {
    let stmt = SelectStatement::from_table("orders")
        .filter(col("status").eq(lit("open")))
        .limit(0)
        .offset(5);
    let sql = stmt.to_sql();
    assert!(!sql.contains("TOP"), "{}", sql);
    assert!(!sql.contains("START AT"), "{}", sql);
    assert_eq!(
        sql,
        "SELECT * FROM \"orders\" WHERE \"status\" = 'open' AND 1=0"
    );
}

#[test]
fn test_zero_limit_reaches_every_core() {
    let stmt = SelectStatement::from_table("a")
        .set_op(SetOp::Union, SelectCore::from_table("b").project(Expr::Star))
        .limit(0);
    assert_eq!(
        stmt.to_sql(),
        "SELECT * FROM \"a\" WHERE 1=0 UNION SELECT * FROM \"b\" WHERE 1=0"
    );
}

#[test]
fn test_limit_without_ordering_ends_with_order_by_1() {
    for limit in [1u64, 2, 500] {
        let sql = SelectStatement::from_table("orders")
            .filter(col("id").gt(lit(3)))
            .limit(limit)
            .to_sql();
        assert!(sql.ends_with(" ORDER BY 1"), "{}", sql);
    }
}

#[test]
fn test_explicit_ordering_not_replaced() {
    let stmt = SelectStatement::from_table("orders")
        .order_by(Ordering::desc(col("created_at")))
        .limit(3);
    assert_eq!(
        stmt.to_sql(),
        "SELECT TOP 3 * FROM \"orders\" ORDER BY \"created_at\" DESC"
    );
}

#[test]
fn test_no_limit_no_forced_ordering() {
    let sql = SelectStatement::from_table("orders").to_sql();
    assert!(!sql.contains("ORDER BY"));
}

#[test]
fn test_cap_goes_before_projection_in_compound_query() {
    let stmt = SelectStatement::from_table("a")
        .set_op(SetOp::Union, SelectCore::from_table("b").project(Expr::Star))
        .limit(5)
        .offset(5);
    assert_eq!(
        stmt.to_sql(),
        "SELECT TOP 5 START AT 6 * FROM \"a\" UNION SELECT * FROM \"b\" ORDER BY 1"
    );
}

#[test]
fn test_nested_subqueries_rewritten_independently() {
    let inner = SelectStatement::new(SelectCore::from_table("payments").project(col("order_id"))).offset(2);
    let outer = SelectStatement::from_table("orders")
        .filter(Expr::InSubquery {
            expr: Box::new(col("id")),
            query: Box::new(inner),
            negated: false,
        })
        .limit(0);

    assert_eq!(
        outer.to_sql(),
        "SELECT * FROM \"orders\" WHERE \"id\" IN (SELECT TOP 2147483647 START AT 3 \"order_id\" \
         FROM \"payments\" ORDER BY 1) AND 1=0"
    );
}

#[test]
fn test_scalar_subquery_with_limit() {
    let latest = SelectStatement::new(SelectCore::from_table("prices").project(col("amount")))
        .order_by(Ordering::desc(col("valid_from")))
        .limit(1);
    let stmt = SelectStatement::new(
        SelectCore::from_table("products")
            .project(col("name"))
            .project(Expr::Subquery(Box::new(latest)).alias("price")),
    );
    assert_eq!(
        stmt.to_sql(),
        "SELECT \"name\", (SELECT TOP 1 \"amount\" FROM \"prices\" ORDER BY \"valid_from\" DESC) AS \"price\" \
         FROM \"products\""
    );
}

#[test]
fn test_zero_limit_wraps_raw_predicate() {
    let stmt = SelectStatement::from_table("t").filter(raw("a = 1 OR b = 2")).limit(0);
    assert_eq!(stmt.to_sql(), "SELECT * FROM \"t\" WHERE (a = 1 OR b = 2) AND 1=0");
}

#[test]
fn test_single_raw_predicate_unwrapped() {
    let stmt = SelectStatement::from_table("t").filter(raw("a = 1 OR b = 2"));
    assert_eq!(stmt.to_sql(), "SELECT * FROM \"t\" WHERE a = 1 OR b = 2");
}
