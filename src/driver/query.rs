//! Statement execution methods.

use crate::ast::{SelectStatement, Value};
use crate::error::{AdapterError, SqlaResult};
use crate::native::NativeApi;
use crate::transpiler::ToSql;

use super::connection::Session;
use super::result::ResultSet;
use super::statement::{Execution, Outcome, RunOptions};

impl<A: NativeApi> Session<A> {
    fn run(&mut self, sql: &str, name: &str, binds: &[Value], fetch: bool) -> SqlaResult<Outcome> {
        if !self.is_connected() {
            return Err(AdapterError::Connection("session is disconnected".to_string()));
        }
        tracing::debug!(target: "sqlany::sql", statement = name, binds = binds.len(), "{}", sql);

        let options = RunOptions {
            auto_commit: self.auto_commit,
            encoding: self.encoding,
            fetch,
        };
        let api = self.interface.api();
        match Execution::new(api, sql).run(&mut self.conn, binds, options) {
            Ok(outcome) => {
                self.affected_rows = outcome.affected_rows;
                Ok(outcome)
            }
            Err(e) => {
                self.affected_rows = 0;
                Err(e)
            }
        }
    }

    /// Run a statement without binds or a result set, e.g. DDL.
    /// Returns the affected-row count.
    pub fn execute(&mut self, sql: &str, name: &str) -> SqlaResult<u64> {
        self.run(sql, name, &[], false).map(|o| o.affected_rows)
    }

    /// Run a statement with positional binds and collect its rows.
    pub fn exec_query(&mut self, sql: &str, name: &str, binds: &[Value]) -> SqlaResult<ResultSet> {
        self.run(sql, name, binds, true).map(|o| o.result)
    }

    /// Transpile a query tree and run it.
    pub fn select(&mut self, stmt: &SelectStatement, name: &str) -> SqlaResult<ResultSet> {
        let query = stmt.to_sql_parameterized();
        self.exec_query(&query.sql, name, &query.values())
    }

    pub fn exec_update(&mut self, sql: &str, name: &str, binds: &[Value]) -> SqlaResult<u64> {
        self.run(sql, name, binds, true).map(|o| o.affected_rows)
    }

    pub fn exec_delete(&mut self, sql: &str, name: &str, binds: &[Value]) -> SqlaResult<u64> {
        self.exec_update(sql, name, binds)
    }

    /// First column of the first row, if any.
    pub fn select_value(&mut self, sql: &str, name: &str) -> SqlaResult<Option<Value>> {
        let rs = self.exec_query(sql, name, &[])?;
        Ok(rs.first_value().cloned())
    }

    /// Identity value generated by the last insert on this connection.
    pub fn last_inserted_id(&mut self) -> SqlaResult<Option<i64>> {
        let value = self.select_value("SELECT @@IDENTITY", "SQL")?;
        Ok(value.and_then(|v| v.as_i64()))
    }
}
