use serde::{Deserialize, Serialize};

use super::expr::{Expr, Join, Ordering, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetQuantifier {
    Distinct,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetOp {
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl SetOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SetOp::Union => "UNION",
            SetOp::UnionAll => "UNION ALL",
            SetOp::Intersect => "INTERSECT",
            SetOp::Except => "EXCEPT",
        }
    }
}

/// Row locking requested for the statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lock {
    ForUpdate,
    /// Lock clause text emitted verbatim (e.g. `FOR UPDATE BY LOCK`)
    Custom(String),
}

/// One `SELECT ... FROM ... WHERE ...` unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectCore {
    pub set_quantifier: Option<SetQuantifier>,
    pub projections: Vec<Expr>,
    pub source: Option<Source>,
    pub joins: Vec<Join>,
    pub wheres: Vec<Expr>,
    pub groups: Vec<Expr>,
    pub havings: Vec<Expr>,
}

impl SelectCore {
    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            source: Some(Source::table(table)),
            ..Default::default()
        }
    }

    pub fn project(mut self, expr: Expr) -> Self {
        self.projections.push(expr);
        self
    }

    pub fn filter(mut self, expr: Expr) -> Self {
        self.wheres.push(expr);
        self
    }

    pub fn group(mut self, expr: Expr) -> Self {
        self.groups.push(expr);
        self
    }

    pub fn having(mut self, expr: Expr) -> Self {
        self.havings.push(expr);
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.set_quantifier = Some(SetQuantifier::Distinct);
        self
    }
}

/// A complete query tree.
///
/// `limit` and `offset` are plain row counts; the visitor turns them into
/// `TOP` / `START AT` on the first select-core.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectStatement {
    pub core: SelectCore,
    pub set_ops: Vec<(SetOp, SelectCore)>,
    pub orders: Vec<Ordering>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub lock: Option<Lock>,
}

impl SelectStatement {
    pub fn new(core: SelectCore) -> Self {
        Self {
            core,
            ..Default::default()
        }
    }

    /// Shorthand for `SELECT * FROM table`.
    pub fn from_table(table: impl Into<String>) -> Self {
        Self::new(SelectCore::from_table(table).project(Expr::Star))
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    pub fn order_by(mut self, ordering: Ordering) -> Self {
        self.orders.push(ordering);
        self
    }

    pub fn lock(mut self, lock: Lock) -> Self {
        self.lock = Some(lock);
        self
    }

    pub fn set_op(mut self, op: SetOp, core: SelectCore) -> Self {
        self.set_ops.push((op, core));
        self
    }

    pub fn filter(mut self, expr: Expr) -> Self {
        self.core.wheres.push(expr);
        self
    }

    /// All select-cores in emission order.
    pub fn cores(&self) -> impl Iterator<Item = &SelectCore> {
        std::iter::once(&self.core).chain(self.set_ops.iter().map(|(_, c)| c))
    }

    pub fn cores_mut(&mut self) -> impl Iterator<Item = &mut SelectCore> {
        std::iter::once(&mut self.core).chain(self.set_ops.iter_mut().map(|(_, c)| c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cores_include_set_operands() {
        let stmt = SelectStatement::from_table("a")
            .set_op(SetOp::Union, SelectCore::from_table("b").project(Expr::Star));
        assert_eq!(stmt.cores().count(), 2);
    }

    #[test]
    fn test_deserialize_minimal_tree() {
        let json = r#"{
            "core": {
                "projections": ["star"],
                "source": {"table": {"name": "orders"}}
            },
            "limit": 10,
            "offset": 20
        }"#;
        let stmt: SelectStatement = serde_json::from_str(json).unwrap();
        assert_eq!(stmt, SelectStatement::from_table("orders").limit(10).offset(20));
    }
}
