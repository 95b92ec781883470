//! Ergonomic constructors for query tree nodes.
//!
//! ```rust
//! use sqlany::ast::builders::*;
//! use sqlany::ast::{Ordering, SelectCore, SelectStatement};
//!
//! let stmt = SelectStatement::new(
//!     SelectCore::from_table("orders")
//!         .project(col("id"))
//!         .filter(col("status").eq(bind("status", "open"))),
//! )
//! .order_by(Ordering::desc(col("created_at")))
//! .limit(10);
//! assert_eq!(stmt.limit, Some(10));
//! ```

use super::expr::{BinaryOp, Expr};
use super::values::Value;

/// Unqualified column reference.
pub fn col(name: impl Into<String>) -> Expr {
    Expr::Column {
        table: None,
        name: name.into(),
    }
}

/// Table-qualified column reference.
pub fn table_col(table: impl Into<String>, name: impl Into<String>) -> Expr {
    Expr::Column {
        table: Some(table.into()),
        name: name.into(),
    }
}

/// Inline literal.
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

/// Bound parameter.
pub fn bind(name: impl Into<String>, value: impl Into<Value>) -> Expr {
    Expr::Bind {
        name: name.into(),
        value: value.into(),
    }
}

/// Raw SQL fragment.
pub fn raw(sql: impl Into<String>) -> Expr {
    Expr::Raw(sql.into())
}

pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
        distinct: false,
    }
}

pub fn count_star() -> Expr {
    func("COUNT", vec![Expr::Star])
}

/// Fluent operators on expressions.
pub trait ExprExt: Sized {
    fn binary(self, op: BinaryOp, right: Expr) -> Expr;
    fn eq(self, right: Expr) -> Expr {
        self.binary(BinaryOp::Eq, right)
    }
    fn not_eq(self, right: Expr) -> Expr {
        self.binary(BinaryOp::NotEq, right)
    }
    fn lt(self, right: Expr) -> Expr {
        self.binary(BinaryOp::Lt, right)
    }
    fn lt_eq(self, right: Expr) -> Expr {
        self.binary(BinaryOp::LtEq, right)
    }
    fn gt(self, right: Expr) -> Expr {
        self.binary(BinaryOp::Gt, right)
    }
    fn gt_eq(self, right: Expr) -> Expr {
        self.binary(BinaryOp::GtEq, right)
    }
    fn like(self, right: Expr) -> Expr {
        self.binary(BinaryOp::Like, right)
    }
    fn and(self, right: Expr) -> Expr;
    fn or(self, right: Expr) -> Expr;
    fn is_null(self) -> Expr;
    fn is_not_null(self) -> Expr;
    fn in_list(self, list: Vec<Expr>) -> Expr;
    fn alias(self, alias: impl Into<String>) -> Expr;
}

impl ExprExt for Expr {
    fn binary(self, op: BinaryOp, right: Expr) -> Expr {
        Expr::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    fn and(self, right: Expr) -> Expr {
        match self {
            Expr::And(mut items) => {
                items.push(right);
                Expr::And(items)
            }
            left => Expr::And(vec![left, right]),
        }
    }

    fn or(self, right: Expr) -> Expr {
        match self {
            Expr::Or(mut items) => {
                items.push(right);
                Expr::Or(items)
            }
            left => Expr::Or(vec![left, right]),
        }
    }

    fn is_null(self) -> Expr {
        Expr::IsNull(Box::new(self))
    }

    fn is_not_null(self) -> Expr {
        Expr::IsNotNull(Box::new(self))
    }

    fn in_list(self, list: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self),
            list,
            negated: false,
        }
    }

    fn alias(self, alias: impl Into<String>) -> Expr {
        Expr::Alias {
            expr: Box::new(self),
            alias: alias.into(),
        }
    }
}
