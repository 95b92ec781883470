//! Statement execution against the native client.
//!
//! Session methods are split across modules:
//! - `connection.rs` - Session struct, connect, liveness, reconnect
//! - `query.rs` - execute, exec_query, select, exec_update/exec_delete
//! - `statement.rs` - prepare → bind → execute → fetch state machine
//! - `transaction.rs` - begin, commit, rollback, referential integrity
//! - `schema.rs` - catalog introspection and schema changes
//! - `interface.rs` - native interface lifecycle
//! - `result.rs` - tabular results

mod connection;
mod interface;
mod query;
mod result;
mod schema;
mod statement;
mod transaction;

pub use connection::Session;
pub use interface::Interface;
pub use result::ResultSet;
pub use schema::{Column, ColumnStructure, IndexDefinition};
pub use statement::{ExecState, Execution, Outcome, RunOptions};
