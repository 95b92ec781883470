//! Transaction control.
//!
//! Transactions are session-scoped and flat. `begin` only turns auto-commit
//! off; the server opens a transaction implicitly with the next statement.

use crate::ast::Value;
use crate::error::SqlaResult;
use crate::native::NativeApi;

use super::connection::Session;
use super::statement::native_error;

impl<A: NativeApi> Session<A> {
    /// Stop committing after every statement.
    pub fn begin(&mut self) {
        tracing::debug!("begin transaction");
        self.auto_commit = false;
    }

    /// Commit and return to auto-commit mode.
    pub fn commit(&mut self) -> SqlaResult<()> {
        self.auto_commit = true;
        let api = self.interface.api();
        if !api.commit(&mut self.conn) {
            return Err(native_error(api, &self.conn, "COMMIT"));
        }
        tracing::debug!("commit");
        Ok(())
    }

    /// Roll back and return to auto-commit mode.
    pub fn rollback(&mut self) -> SqlaResult<()> {
        self.auto_commit = true;
        let api = self.interface.api();
        if !api.rollback(&mut self.conn) {
            return Err(native_error(api, &self.conn, "ROLLBACK"));
        }
        tracing::debug!("rollback");
        Ok(())
    }

    pub fn in_transaction(&self) -> bool {
        !self.auto_commit
    }

    pub fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    /// Run `f` with foreign key checks deferred to commit time.
    ///
    /// The previous `wait_for_commit` setting is restored afterwards, also
    /// when `f` fails.
    pub fn disable_referential_integrity<T, F>(&mut self, f: F) -> SqlaResult<T>
    where
        F: FnOnce(&mut Self) -> SqlaResult<T>,
    {
        let old = match self.select_value("SELECT connection_property( 'wait_for_commit' )", "SCHEMA")? {
            Some(Value::Text(s)) if s.eq_ignore_ascii_case("on") => "ON",
            _ => "OFF",
        };

        self.execute("SET TEMPORARY OPTION wait_for_commit = ON", "SCHEMA")?;
        let result = f(self);
        let restore = self.execute(&format!("SET TEMPORARY OPTION wait_for_commit = {}", old), "SCHEMA");

        match (result, restore) {
            (Ok(value), Ok(_)) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), restore) => {
                if let Err(restore_err) = restore {
                    tracing::warn!(error = %restore_err, "could not restore wait_for_commit");
                }
                Err(e)
            }
        }
    }
}
