use serde::{Deserialize, Serialize};

use super::select::SelectStatement;
use super::values::Value;

/// Comparison and pattern operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
    Add,
    Sub,
    Mul,
    Div,
    Concat,
}

impl BinaryOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Like => "LIKE",
            BinaryOp::NotLike => "NOT LIKE",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Concat => "||",
        }
    }
}

/// A node in a projection, predicate or ordering position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// `*`
    Star,
    /// `"table".*`
    TableStar(String),
    /// Column reference, optionally qualified
    Column {
        table: Option<String>,
        name: String,
    },
    /// Value rendered inline into the SQL text
    Literal(Value),
    /// Value sent as a bound parameter
    Bind { name: String, value: Value },
    /// Literal true node
    True,
    /// Literal false node
    False,
    /// SQL text passed through untouched
    Raw(String),
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
    IsNull(Box<Expr>),
    IsNotNull(Box<Expr>),
    In {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    InSubquery {
        expr: Box<Expr>,
        query: Box<SelectStatement>,
        negated: bool,
    },
    Exists(Box<SelectStatement>),
    Subquery(Box<SelectStatement>),
    Function {
        name: String,
        args: Vec<Expr>,
        distinct: bool,
    },
    Alias {
        expr: Box<Expr>,
        alias: String,
    },
    Grouping(Box<Expr>),
}

impl Expr {
    /// Walk this expression tree, visiting every node depth-first.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Expr)) {
        visit(self);
        match self {
            Expr::Binary { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            Expr::And(items) | Expr::Or(items) => {
                for item in items {
                    item.walk(visit);
                }
            }
            Expr::Not(inner)
            | Expr::IsNull(inner)
            | Expr::IsNotNull(inner)
            | Expr::Grouping(inner) => inner.walk(visit),
            Expr::Alias { expr, .. } => expr.walk(visit),
            Expr::In { expr, list, .. } => {
                expr.walk(visit);
                for item in list {
                    item.walk(visit);
                }
            }
            Expr::InSubquery { expr, .. } => expr.walk(visit),
            Expr::Function { args, .. } => {
                for arg in args {
                    arg.walk(visit);
                }
            }
            _ => {}
        }
    }

    /// Rebuild this expression, applying `f` to every nested select statement.
    pub fn map_subqueries(self, f: &dyn Fn(SelectStatement) -> SelectStatement) -> Expr {
        let map = |e: Box<Expr>| Box::new(e.map_subqueries(f));
        match self {
            Expr::Subquery(q) => Expr::Subquery(Box::new(f(*q))),
            Expr::Exists(q) => Expr::Exists(Box::new(f(*q))),
            Expr::InSubquery { expr, query, negated } => Expr::InSubquery {
                expr: map(expr),
                query: Box::new(f(*query)),
                negated,
            },
            Expr::Binary { left, op, right } => Expr::Binary {
                left: map(left),
                op,
                right: map(right),
            },
            Expr::And(items) => Expr::And(items.into_iter().map(|e| e.map_subqueries(f)).collect()),
            Expr::Or(items) => Expr::Or(items.into_iter().map(|e| e.map_subqueries(f)).collect()),
            Expr::Not(inner) => Expr::Not(map(inner)),
            Expr::IsNull(inner) => Expr::IsNull(map(inner)),
            Expr::IsNotNull(inner) => Expr::IsNotNull(map(inner)),
            Expr::Grouping(inner) => Expr::Grouping(map(inner)),
            Expr::Alias { expr, alias } => Expr::Alias { expr: map(expr), alias },
            Expr::In { expr, list, negated } => Expr::In {
                expr: map(expr),
                list: list.into_iter().map(|e| e.map_subqueries(f)).collect(),
                negated,
            },
            Expr::Function { name, args, distinct } => Expr::Function {
                name,
                args: args.into_iter().map(|e| e.map_subqueries(f)).collect(),
                distinct,
            },
            other => other,
        }
    }

    /// Strip an `AS alias` wrapper.
    pub fn unaliased(&self) -> &Expr {
        match self {
            Expr::Alias { expr, .. } => expr.unaliased(),
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullsOrder {
    First,
    Last,
}

/// One `ORDER BY` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ordering {
    pub expr: Expr,
    #[serde(default)]
    pub direction: SortOrder,
    #[serde(default)]
    pub nulls: Option<NullsOrder>,
}

impl Ordering {
    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            direction: SortOrder::Asc,
            nulls: None,
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            direction: SortOrder::Desc,
            nulls: None,
        }
    }

    pub fn nulls(mut self, nulls: NullsOrder) -> Self {
        self.nulls = Some(nulls);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

/// What a select-core reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Table {
        name: String,
        #[serde(default)]
        alias: Option<String>,
    },
    Subquery {
        query: Box<SelectStatement>,
        alias: String,
    },
    Raw(String),
}

impl Source {
    pub fn table(name: impl Into<String>) -> Self {
        Source::Table {
            name: name.into(),
            alias: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub source: Source,
    #[serde(default)]
    pub on: Option<Expr>,
}
