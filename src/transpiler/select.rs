//! SELECT SQL generation.

use crate::ast::{JoinKind, Lock, NullsOrder, Ordering, SelectCore, SelectStatement, SetQuantifier, SortOrder};

use super::conditions::{ParamContext, render_conjunction, render_expr, render_source};

/// Generate SELECT SQL from a normalized statement.
///
/// Token order is `SELECT [DISTINCT] [TOP n] [START AT m] projections FROM ...
/// [set operations] [ORDER BY ...] [lock]`. The row cap belongs to the first
/// select-core.
pub fn build_select(stmt: &SelectStatement, params: &mut ParamContext) -> String {
    let mut sql = build_core(&stmt.core, Some((stmt.limit, stmt.offset)), params);

    for (op, core) in &stmt.set_ops {
        sql.push(' ');
        sql.push_str(op.as_sql());
        sql.push(' ');
        sql.push_str(&build_core(core, None, params));
    }

    if !stmt.orders.is_empty() {
        let orders: Vec<String> = stmt.orders.iter().map(|o| build_ordering(o, params)).collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&orders.join(", "));
    }

    match &stmt.lock {
        Some(Lock::ForUpdate) => sql.push_str(" FOR UPDATE"),
        Some(Lock::Custom(clause)) => {
            sql.push(' ');
            sql.push_str(clause.trim());
        }
        None => {}
    }

    sql
}

fn build_core(core: &SelectCore, cap: Option<(Option<u64>, Option<u64>)>, params: &mut ParamContext) -> String {
    let mut sql = String::from("SELECT");

    if core.set_quantifier == Some(SetQuantifier::Distinct) {
        sql.push_str(" DISTINCT");
    }

    if let Some((limit, offset)) = cap {
        if let Some(n) = limit {
            sql.push_str(&format!(" TOP {}", n));
        }
        if let Some(m) = offset {
            // START AT is 1-based
            sql.push_str(&format!(" START AT {}", m + 1));
        }
    }

    if core.projections.is_empty() {
        sql.push_str(" *");
    } else {
        let cols: Vec<String> = core.projections.iter().map(|p| render_expr(p, params)).collect();
        sql.push(' ');
        sql.push_str(&cols.join(", "));
    }

    if let Some(source) = &core.source {
        sql.push_str(" FROM ");
        sql.push_str(&render_source(source, params));
    }

    for join in &core.joins {
        let kind = match join.kind {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT OUTER JOIN",
            JoinKind::Right => "RIGHT OUTER JOIN",
            JoinKind::Full => "FULL OUTER JOIN",
            JoinKind::Cross => "CROSS JOIN",
        };
        sql.push(' ');
        sql.push_str(kind);
        sql.push(' ');
        sql.push_str(&render_source(&join.source, params));
        if let Some(on) = &join.on {
            sql.push_str(" ON ");
            sql.push_str(&render_expr(on, params));
        }
    }

    if !core.wheres.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&render_conjunction(&core.wheres, params));
    }

    if !core.groups.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&render_all(&core.groups, ", ", params));
    }

    if !core.havings.is_empty() {
        sql.push_str(" HAVING ");
        sql.push_str(&render_conjunction(&core.havings, params));
    }

    sql
}

fn build_ordering(ordering: &Ordering, params: &mut ParamContext) -> String {
    let mut sql = render_expr(&ordering.expr, params);
    if ordering.direction == SortOrder::Desc {
        sql.push_str(" DESC");
    }
    match ordering.nulls {
        Some(NullsOrder::First) => sql.push_str(" NULLS FIRST"),
        Some(NullsOrder::Last) => sql.push_str(" NULLS LAST"),
        None => {}
    }
    sql
}

fn render_all(exprs: &[crate::ast::Expr], sep: &str, params: &mut ParamContext) -> String {
    exprs
        .iter()
        .map(|e| render_expr(e, params))
        .collect::<Vec<_>>()
        .join(sep)
}
