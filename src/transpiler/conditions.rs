//! Expression rendering.

use crate::ast::{Expr, Source, Value};
use crate::types::{quote_column_name, quote_literal, quote_table_name};

use super::BoundParam;
use super::select::build_select;

/// Placeholder used for every bound parameter.
pub const PLACEHOLDER: &str = "?";

/// Collects bound parameters while SQL text is emitted.
#[derive(Debug, Default)]
pub struct ParamContext {
    params: Vec<BoundParam>,
}

impl ParamContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value and return the placeholder for it.
    pub fn add_param(&mut self, name: &str, value: &Value) -> &'static str {
        self.params.push(BoundParam {
            name: name.to_string(),
            logical_type: value.logical_type(),
            value: value.clone(),
        });
        PLACEHOLDER
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn into_params(self) -> Vec<BoundParam> {
        self.params
    }
}

/// Render an expression. Expects a tree already passed through
/// [`normalize`](super::normalize).
pub fn render_expr(expr: &Expr, params: &mut ParamContext) -> String {
    match expr {
        Expr::Star => "*".to_string(),
        Expr::TableStar(table) => format!("{}.*", quote_table_name(table)),
        Expr::Column { table: Some(t), name } => {
            format!("{}.{}", quote_table_name(t), quote_column_name(name))
        }
        Expr::Column { table: None, name } => quote_column_name(name),
        Expr::Literal(value) => match quote_literal(value) {
            Some(sql) => sql,
            // Binary and non-finite floats have no literal form
            None => params.add_param(value.logical_type().name(), value).to_string(),
        },
        Expr::Bind { name, value } => params.add_param(name, value).to_string(),
        Expr::True => "1=1".to_string(),
        Expr::False => "1=0".to_string(),
        Expr::Raw(sql) => sql.clone(),
        Expr::Binary { left, op, right } => {
            let l = render_expr(left, params);
            let r = render_expr(right, params);
            format!("{} {} {}", l, op.as_sql(), r)
        }
        Expr::And(items) => render_conjunction(items, params),
        Expr::Or(items) => format!("({})", render_list(items, " OR ", params)),
        Expr::Not(inner) => format!("NOT ({})", render_expr(inner, params)),
        Expr::IsNull(inner) => format!("{} IS NULL", render_expr(inner, params)),
        Expr::IsNotNull(inner) => format!("{} IS NOT NULL", render_expr(inner, params)),
        Expr::In { expr, list, negated } => {
            if list.is_empty() {
                // Nothing is IN an empty list
                return if *negated { "1=1" } else { "1=0" }.to_string();
            }
            let lhs = render_expr(expr, params);
            let items = render_list(list, ", ", params);
            let op = if *negated { "NOT IN" } else { "IN" };
            format!("{} {} ({})", lhs, op, items)
        }
        Expr::InSubquery { expr, query, negated } => {
            let lhs = render_expr(expr, params);
            let op = if *negated { "NOT IN" } else { "IN" };
            format!("{} {} ({})", lhs, op, build_select(query, params))
        }
        Expr::Exists(query) => format!("EXISTS ({})", build_select(query, params)),
        Expr::Subquery(query) => format!("({})", build_select(query, params)),
        Expr::Function { name, args, distinct } => {
            let args = render_list(args, ", ", params);
            if *distinct {
                format!("{}(DISTINCT {})", name.to_uppercase(), args)
            } else {
                format!("{}({})", name.to_uppercase(), args)
            }
        }
        Expr::Alias { expr, alias } => {
            format!("{} AS {}", render_expr(expr, params), quote_column_name(alias))
        }
        Expr::Grouping(inner) => format!("({})", render_expr(inner, params)),
    }
}

fn render_list(items: &[Expr], sep: &str, params: &mut ParamContext) -> String {
    items
        .iter()
        .map(|e| render_expr(e, params))
        .collect::<Vec<_>>()
        .join(sep)
}

/// Join predicates with `AND`.
///
/// Raw SQL is opaque and may contain `OR`, so raw items are parenthesized
/// whenever there is more than one predicate.
pub fn render_conjunction(items: &[Expr], params: &mut ParamContext) -> String {
    let wrap = items.len() > 1;
    items
        .iter()
        .map(|e| match e {
            Expr::Raw(sql) if wrap => format!("({})", sql),
            other => render_expr(other, params),
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Render a `FROM` or `JOIN` source.
pub fn render_source(source: &Source, params: &mut ParamContext) -> String {
    match source {
        Source::Table { name, alias: Some(a) } => {
            format!("{} {}", quote_table_name(name), quote_column_name(a))
        }
        Source::Table { name, alias: None } => quote_table_name(name),
        Source::Subquery { query, alias } => {
            format!("({}) {}", build_select(query, params), quote_column_name(alias))
        }
        Source::Raw(sql) => sql.clone(),
    }
}
