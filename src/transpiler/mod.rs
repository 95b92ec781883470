//! SQL Anywhere dialect visitor.
//!
//! Converts a portable query tree into dialect SQL text plus the ordered list
//! of bound parameters. Generation runs in two passes:
//!
//! 1. [`rewrite::normalize`] produces a new tree with the dialect's limit,
//!    offset and distinct rules applied to every nested statement.
//! 2. [`select::build_select`] emits text from the normalized tree.

pub mod conditions;
pub mod ddl;
pub mod distinct;
pub mod rewrite;
pub mod select;

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::ast::{SelectStatement, Value};
use crate::types::LogicalType;

pub use conditions::{ParamContext, render_expr};
pub use distinct::{columns_for_distinct, order_by_in_distinct};
pub use rewrite::{UNBOUNDED_LIMIT, normalize};

/// A placeholder value in the order it appears in the SQL text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundParam {
    pub name: String,
    pub logical_type: LogicalType,
    pub value: Value,
}

/// Emitted SQL text with its parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TranspileResult {
    pub sql: String,
    pub params: Vec<BoundParam>,
}

impl TranspileResult {
    /// Parameter values in placeholder order.
    pub fn values(&self) -> Vec<Value> {
        self.params.iter().map(|p| p.value.clone()).collect()
    }
}

/// Trait for converting query trees to dialect SQL.
pub trait ToSql {
    /// SQL text only. Bound values render as `?`.
    fn to_sql(&self) -> String {
        self.to_sql_parameterized().sql
    }

    /// SQL text with the parameters it expects, in placeholder order.
    fn to_sql_parameterized(&self) -> TranspileResult;
}

impl ToSql for SelectStatement {
    fn to_sql_parameterized(&self) -> TranspileResult {
        let normalized = normalize(self.clone());
        let mut params = ParamContext::new();
        let sql = select::build_select(&normalized, &mut params);
        TranspileResult {
            sql,
            params: params.into_params(),
        }
    }
}
