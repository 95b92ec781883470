//! Projection expansion for `DISTINCT` queries with ordering.
//!
//! SQL Anywhere requires every `ORDER BY` key of a `DISTINCT` query to appear
//! in the select list. This is applied by callers that build such queries;
//! the visitor itself never changes projections.

use crate::ast::{Expr, Ordering, SelectStatement, SetQuantifier};

/// Projection list extended with one `expr AS alias_<i>` per ordering key.
///
/// Direction and null placement are not part of the key.
pub fn columns_for_distinct(projections: &[Expr], orders: &[Ordering]) -> Vec<Expr> {
    let mut columns = projections.to_vec();
    columns.extend(orders.iter().enumerate().map(|(i, o)| Expr::Alias {
        expr: Box::new(o.expr.unaliased().clone()),
        alias: format!("alias_{}", i),
    }));
    columns
}

/// Apply [`columns_for_distinct`] to a statement whose first select-core is
/// `DISTINCT` and that orders by something not already projected.
pub fn order_by_in_distinct(mut stmt: SelectStatement) -> SelectStatement {
    if stmt.core.set_quantifier != Some(SetQuantifier::Distinct) || stmt.orders.is_empty() {
        return stmt;
    }

    let projected = |e: &Expr| {
        stmt.core
            .projections
            .iter()
            .any(|p| p == &Expr::Star || p.unaliased() == e.unaliased())
    };
    if stmt.orders.iter().all(|o| projected(&o.expr)) {
        return stmt;
    }

    stmt.core.projections = columns_for_distinct(&stmt.core.projections, &stmt.orders);
    stmt
}
