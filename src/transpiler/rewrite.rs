//! Dialect rewrite of a query tree.
//!
//! SQL Anywhere has no `LIMIT`/`OFFSET`. Row caps are expressed as
//! `TOP n START AT m`, which imposes a few rules the tree has to satisfy
//! before text is emitted:
//!
//! - `START AT` needs a `TOP`, so an offset without a limit gets
//!   [`UNBOUNDED_LIMIT`].
//! - `TOP 0` is rejected, so a zero limit becomes an always-false predicate
//!   in every select-core.
//! - A capped query without ordering is reported as non-deterministic, so it
//!   gets `ORDER BY 1`.
//! - `DISTINCT` combined with `TOP 1` is dropped.
//!
//! [`normalize`] is pure and idempotent: normalizing a normalized tree
//! returns it unchanged.

use crate::ast::{Expr, Join, Ordering, SelectCore, SelectStatement, SetQuantifier, Source};

/// Largest `TOP` value the server accepts.
pub const UNBOUNDED_LIMIT: u64 = 2_147_483_647;

const DISTINCT_MARKER: &str = "DISTINCT";

/// Apply the dialect's limit, offset and distinct rules to a statement and
/// every statement nested inside it.
pub fn normalize(stmt: SelectStatement) -> SelectStatement {
    let SelectStatement {
        core,
        set_ops,
        orders,
        mut limit,
        mut offset,
        lock,
    } = stmt;

    let mut core = normalize_core(core);
    let mut set_ops: Vec<_> = set_ops
        .into_iter()
        .map(|(op, c)| (op, normalize_core(c)))
        .collect();
    let mut orders: Vec<Ordering> = orders
        .into_iter()
        .map(|o| Ordering {
            expr: nested(o.expr),
            ..o
        })
        .collect();

    if limit == Some(0) {
        limit = None;
        offset = None;
        core.wheres.push(Expr::False);
        for (_, c) in set_ops.iter_mut() {
            c.wheres.push(Expr::False);
        }
    } else if offset.is_some() && limit.is_none() {
        limit = Some(UNBOUNDED_LIMIT);
    }

    if limit.is_some() && orders.is_empty() {
        orders.push(Ordering::asc(Expr::Raw("1".to_string())));
    }

    if limit == Some(1) {
        core.set_quantifier = None;
        for (_, c) in set_ops.iter_mut() {
            c.set_quantifier = None;
        }
    }

    SelectStatement {
        core,
        set_ops,
        orders,
        limit,
        offset,
        lock,
    }
}

/// Resolve distinct markers and normalize nested statements.
fn normalize_core(core: SelectCore) -> SelectCore {
    let SelectCore {
        mut set_quantifier,
        projections,
        source,
        joins,
        wheres,
        groups,
        havings,
    } = core;

    let mut marked = false;
    let projections: Vec<Expr> = projections
        .into_iter()
        .filter_map(|p| match p {
            Expr::Raw(sql) => match strip_distinct_marker(&sql) {
                Some(stripped) => {
                    marked = true;
                    (!stripped.is_empty()).then(|| Expr::Raw(stripped))
                }
                None => Some(Expr::Raw(sql)),
            },
            other => Some(nested(other)),
        })
        .collect();
    if marked {
        set_quantifier = Some(SetQuantifier::Distinct);
    }

    SelectCore {
        set_quantifier,
        projections,
        source: source.map(normalize_source),
        joins: joins
            .into_iter()
            .map(|j| Join {
                kind: j.kind,
                source: normalize_source(j.source),
                on: j.on.map(nested),
            })
            .collect(),
        wheres: wheres.into_iter().map(nested).collect(),
        groups: groups.into_iter().map(nested).collect(),
        havings: havings.into_iter().map(nested).collect(),
    }
}

fn normalize_source(source: Source) -> Source {
    match source {
        Source::Subquery { query, alias } => Source::Subquery {
            query: Box::new(normalize(*query)),
            alias,
        },
        other => other,
    }
}

fn nested(expr: Expr) -> Expr {
    expr.map_subqueries(&normalize)
}

/// Remove a leading-word `DISTINCT` from raw projection text.
///
/// Returns `None` when the text does not start with the marker. `DISTINCT`
/// further in, e.g. inside `COUNT(DISTINCT x)` or a string literal, is left
/// alone.
fn strip_distinct_marker(sql: &str) -> Option<String> {
    let trimmed = sql.trim_start();
    let head = trimmed.get(..DISTINCT_MARKER.len())?;
    if !head.eq_ignore_ascii_case(DISTINCT_MARKER) {
        return None;
    }
    let rest = &trimmed[DISTINCT_MARKER.len()..];
    if !rest.chars().next().is_none_or(|c| c.is_whitespace() || c == '(') {
        return None;
    }
    Some(rest.trim_start().to_string())
}
