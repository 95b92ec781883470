//! # sqlany: SQL Anywhere adapter
//!
//! Turns a portable relational query tree into SQL Anywhere SQL and runs
//! statements through the vendor's native client API.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use sqlany::prelude::*;
//!
//! let stmt = SelectStatement::from_table("orders")
//!     .order_by(Ordering::asc(col("id")))
//!     .limit(10)
//!     .offset(20);
//!
//! let sql = stmt.to_sql();
//! // => SELECT TOP 10 START AT 21 * FROM "orders" ORDER BY "id"
//!
//! let interface = Arc::new(Interface::new(my_native_api)?);
//! let mut session = Session::connect(interface, "UID=dba;PWD=sql;DBN=demo")?;
//! let rows = session.select(&stmt, "Order Load")?;
//! ```
//!
//! ## Layers
//!
//! | Module         | Role                                             |
//! |----------------|--------------------------------------------------|
//! | `ast`          | Query tree and values                            |
//! | `transpiler`   | Dialect visitor and DDL builders                 |
//! | `types`        | Logical type mapping, quoting, bind conversion   |
//! | `driver`       | Sessions and the statement execution engine      |
//! | `native`       | Boundary to the vendor client library            |

pub mod ast;
pub mod config;
pub mod driver;
pub mod error;
pub mod native;
pub mod parser;
pub mod transpiler;
pub mod types;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::*;
    pub use crate::config::ConnectionConfig;
    pub use crate::driver::{Interface, ResultSet, Session};
    pub use crate::error::*;
    pub use crate::native::NativeApi;
    pub use crate::transpiler::{ToSql, TranspileResult};
    pub use crate::types::{LogicalType, TextEncoding, quote, type_to_sql};
    pub use std::sync::Arc;
}

/// Render a query tree as SQL Anywhere SQL with `?` placeholders.
///
/// # Example
///
/// ```
/// use sqlany::ast::SelectStatement;
///
/// let stmt = SelectStatement::from_table("orders").limit(1);
/// assert_eq!(sqlany::to_sql(&stmt), r#"SELECT TOP 1 * FROM "orders" ORDER BY 1"#);
/// ```
pub fn to_sql(stmt: &ast::SelectStatement) -> String {
    use transpiler::ToSql;
    stmt.to_sql()
}
