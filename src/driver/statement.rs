//! Per-statement execution state machine.
//!
//! ```text
//! Idle → Prepared → Bound → Executed → Fetching → Freed → Committed
//!   └────────┴─────────┴───────┴──────────┴──────────┴──→ Freed → RolledBack
//! ```
//!
//! The statement handle is released before commit, since the driver keeps
//! locks for as long as the handle is open. On any failure the handle is
//! released and the connection rolled back before the error is returned.

use crate::ast::Value;
use crate::error::{AdapterError, NativeError, SqlaResult, translate};
use crate::native::NativeApi;
use crate::types::{TextEncoding, decode_cell, fill_bind_param};

use super::result::ResultSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    Idle,
    Prepared,
    Bound,
    Executed,
    Fetching,
    Committed,
    RolledBack,
    Freed,
}

/// How one statement should be run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub auto_commit: bool,
    pub encoding: TextEncoding,
    /// Read the result set. Statements run for their side effects skip it.
    pub fetch: bool,
}

#[derive(Debug, Default)]
pub struct Outcome {
    pub result: ResultSet,
    pub affected_rows: u64,
}

/// One execution of one SQL text.
pub struct Execution<'a, A: NativeApi> {
    api: &'a A,
    sql: &'a str,
    stmt: Option<A::Statement>,
    state: ExecState,
    affected_rows: u64,
}

impl<'a, A: NativeApi> Execution<'a, A> {
    pub fn new(api: &'a A, sql: &'a str) -> Self {
        Self {
            api,
            sql,
            stmt: None,
            state: ExecState::Idle,
            affected_rows: 0,
        }
    }

    pub fn state(&self) -> ExecState {
        self.state
    }

    /// Run to completion. On failure the connection has been rolled back.
    pub fn run(mut self, conn: &mut A::Connection, binds: &[Value], options: RunOptions) -> SqlaResult<Outcome> {
        match self.drive(conn, binds, options) {
            Ok(result) => Ok(Outcome {
                result,
                affected_rows: self.affected_rows,
            }),
            Err(e) => {
                tracing::warn!(state = ?self.state, error = %e, "statement failed, rolling back");
                self.abort(conn);
                Err(e)
            }
        }
    }

    fn drive(&mut self, conn: &mut A::Connection, binds: &[Value], options: RunOptions) -> SqlaResult<ResultSet> {
        self.prepare(conn)?;
        self.bind(conn, binds, options.encoding)?;
        self.execute(conn)?;
        let result = if options.fetch {
            self.fetch(conn, options.encoding)?
        } else {
            ResultSet::default()
        };
        self.count_affected(conn)?;
        self.finish(conn, options.auto_commit)?;
        Ok(result)
    }

    fn transition(&mut self, next: ExecState) {
        tracing::trace!(from = ?self.state, to = ?next, "statement state");
        self.state = next;
    }

    pub fn prepare(&mut self, conn: &mut A::Connection) -> SqlaResult<()> {
        match self.api.prepare(conn, self.sql) {
            Some(stmt) => {
                self.stmt = Some(stmt);
                self.transition(ExecState::Prepared);
                Ok(())
            }
            None => Err(native_error(self.api, conn, self.sql)),
        }
    }

    pub fn bind(&mut self, conn: &mut A::Connection, binds: &[Value], encoding: TextEncoding) -> SqlaResult<()> {
        let api = self.api;
        let sql = self.sql;
        let stmt = self.stmt.as_mut().ok_or_else(|| not_prepared(sql))?;

        for (i, value) in binds.iter().enumerate() {
            let index = u32::try_from(i)
                .map_err(|_| AdapterError::Argument(format!("too many bind parameters: {}", binds.len())))?;
            let mut param = api
                .describe_bind_param(stmt, index)
                .ok_or_else(|| native_error(api, conn, sql))?;
            fill_bind_param(&mut param, value, encoding);
            if !api.bind_param(stmt, index, &param) {
                return Err(native_error(api, conn, sql));
            }
        }

        self.transition(ExecState::Bound);
        Ok(())
    }

    pub fn execute(&mut self, conn: &mut A::Connection) -> SqlaResult<()> {
        let stmt = self.stmt.as_mut().ok_or_else(|| not_prepared(self.sql))?;
        if !self.api.execute(stmt) {
            return Err(native_error(self.api, conn, self.sql));
        }
        self.transition(ExecState::Executed);
        Ok(())
    }

    pub fn fetch(&mut self, conn: &mut A::Connection, encoding: TextEncoding) -> SqlaResult<ResultSet> {
        let api = self.api;
        let sql = self.sql;

        let columns = {
            let stmt = self.stmt.as_ref().ok_or_else(|| not_prepared(sql))?;
            let num_cols = api.num_cols(stmt);
            if num_cols < 0 {
                return Err(native_error(api, conn, sql));
            }
            let mut columns = Vec::with_capacity(num_cols as usize);
            for i in 0..num_cols as u32 {
                let info = api
                    .get_column_info(stmt, i)
                    .ok_or_else(|| native_error(api, conn, sql))?;
                columns.push(info);
            }
            columns
        };

        self.transition(ExecState::Fetching);
        tracing::trace!(columns = columns.len(), "fetching");

        let stmt = self.stmt.as_mut().ok_or_else(|| not_prepared(sql))?;
        let mut rows = Vec::new();
        while api.fetch_next(stmt) {
            let mut row = Vec::with_capacity(columns.len());
            for (i, info) in columns.iter().enumerate() {
                let cell = api
                    .get_column(stmt, i as u32)
                    .ok_or_else(|| native_error(api, conn, sql))?;
                row.push(decode_cell(info.native_type, cell, encoding)?);
            }
            rows.push(row);
        }

        let names = columns.into_iter().map(|c| c.name).collect();
        Ok(ResultSet::new(names, rows))
    }

    fn count_affected(&mut self, conn: &mut A::Connection) -> SqlaResult<()> {
        let stmt = self.stmt.as_ref().ok_or_else(|| not_prepared(self.sql))?;
        let n = self.api.affected_rows(stmt);
        if n < 0 {
            return Err(native_error(self.api, conn, self.sql));
        }
        self.affected_rows = n as u64;
        Ok(())
    }

    /// Release the handle, then commit when auto-commit is on.
    fn finish(&mut self, conn: &mut A::Connection, auto_commit: bool) -> SqlaResult<()> {
        self.free();
        if auto_commit {
            if !self.api.commit(conn) {
                return Err(native_error(self.api, conn, self.sql));
            }
            self.transition(ExecState::Committed);
        }
        Ok(())
    }

    fn abort(&mut self, conn: &mut A::Connection) {
        self.affected_rows = 0;
        self.free();
        if !self.api.rollback(conn) {
            tracing::warn!("rollback after failed statement also failed");
        }
        self.transition(ExecState::RolledBack);
    }

    /// Release the statement handle. Safe to call more than once.
    pub fn free(&mut self) {
        if let Some(stmt) = self.stmt.take() {
            self.api.free_stmt(stmt);
            self.transition(ExecState::Freed);
        }
    }
}

impl<A: NativeApi> Drop for Execution<'_, A> {
    fn drop(&mut self) {
        self.free();
    }
}

/// Build the adapter error for the connection's last native failure.
///
/// A failure status with no recorded error code still raises.
pub(crate) fn native_error<A: NativeApi>(api: &A, conn: &A::Connection, sql: &str) -> AdapterError {
    let (code, message) = api.error(conn);
    let message = if message.is_empty() {
        "the native driver reported a failure without an error message".to_string()
    } else {
        message
    };
    translate(NativeError::new(code, message, sql))
}

fn not_prepared(sql: &str) -> AdapterError {
    AdapterError::Statement(NativeError::new(0, "statement is not prepared", sql))
}
