//! Portable relational query tree.

pub mod builders;
pub mod expr;
pub mod select;
pub mod values;

pub use self::expr::{BinaryOp, Expr, Join, JoinKind, NullsOrder, Ordering, SortOrder, Source};
pub use self::select::{Lock, SelectCore, SelectStatement, SetOp, SetQuantifier};
pub use self::values::Value;
