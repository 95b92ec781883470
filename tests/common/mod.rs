//! Scripted in-memory native client for driving sessions in tests.
//!
//! Every native call is appended to a shared log. Canned result tables are
//! matched by a substring of the prepared SQL; statements containing `1=0`
//! return no rows. Failures are scripted per stage and SQL substring.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use sqlany::driver::{Interface, Session};
use sqlany::native::{BindParam, ColumnInfo, DataType, Direction, NativeApi, NativeType, WireValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Connect,
    ExecuteImmediate,
    Prepare,
    Bind,
    Execute,
    Fetch,
    AffectedRows,
    Commit,
    Rollback,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<(String, NativeType)>,
    pub rows: Vec<Vec<WireValue>>,
    pub affected: i64,
}

impl Table {
    pub fn new(columns: &[(&str, NativeType)]) -> Self {
        Self {
            columns: columns.iter().map(|(n, t)| (n.to_string(), *t)).collect(),
            rows: Vec::new(),
            affected: 0,
        }
    }

    pub fn row(mut self, row: Vec<WireValue>) -> Self {
        self.rows.push(row);
        self.affected = self.rows.len() as i64;
        self
    }

    pub fn affected(mut self, n: i64) -> Self {
        self.affected = n;
        self
    }
}

pub fn text(s: &str) -> WireValue {
    WireValue::Text(s.as_bytes().to_vec())
}

#[derive(Debug, Default)]
pub struct Script {
    pub log: Vec<String>,
    pub responses: Vec<(String, Table)>,
    pub failures: Vec<(Stage, String, i32, String)>,
    pub last_error: (i32, String),
    pub bound: Vec<BindParam>,
    pub freed: Vec<u32>,
    pub init_ok: bool,
    pub inits: u32,
    pub finis: u32,
    next_stmt: u32,
}

impl Script {
    fn failure(&self, stage: Stage, sql: &str) -> Option<(i32, String)> {
        self.failures
            .iter()
            .find(|(s, needle, _, _)| *s == stage && sql.contains(needle.as_str()))
            .map(|(_, _, code, msg)| (*code, msg.clone()))
    }

    fn response(&self, sql: &str) -> Table {
        if sql.contains("1=0") {
            let columns = self
                .responses
                .iter()
                .find(|(needle, _)| sql.contains(needle.as_str()))
                .map(|(_, t)| t.columns.clone())
                .unwrap_or_default();
            return Table {
                columns,
                ..Table::default()
            };
        }
        self.responses
            .iter()
            .find(|(needle, _)| sql.contains(needle.as_str()))
            .map(|(_, t)| t.clone())
            .unwrap_or_default()
    }

    /// Log entries starting with `prefix`.
    pub fn calls(&self, prefix: &str) -> Vec<&str> {
        self.log.iter().filter(|l| l.starts_with(prefix)).map(String::as_str).collect()
    }

    /// Position of the first log entry starting with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.log.iter().position(|l| l.starts_with(prefix))
    }
}

#[derive(Debug)]
pub struct FakeConn {
    pub connected: bool,
}

#[derive(Debug)]
pub struct FakeStmt {
    id: u32,
    sql: String,
    table: Table,
    cursor: Option<usize>,
}

/// Cloning shares the script.
#[derive(Debug, Clone)]
pub struct FakeApi {
    pub script: Rc<RefCell<Script>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            script: Rc::new(RefCell::new(Script {
                init_ok: true,
                ..Script::default()
            })),
        }
    }

    pub fn respond(&self, needle: &str, table: Table) -> &Self {
        self.script.borrow_mut().responses.push((needle.to_string(), table));
        self
    }

    pub fn fail(&self, stage: Stage, needle: &str, code: i32, message: &str) -> &Self {
        self.script
            .borrow_mut()
            .failures
            .push((stage, needle.to_string(), code, message.to_string()));
        self
    }

    pub fn clear_log(&self) {
        self.script.borrow_mut().log.clear();
    }

    fn record(&self, entry: String) {
        self.script.borrow_mut().log.push(entry);
    }

    /// Record a failure for `stage` if one is scripted. Returns true on failure.
    fn check(&self, stage: Stage, sql: &str) -> bool {
        let mut script = self.script.borrow_mut();
        match script.failure(stage, sql) {
            Some(err) => {
                script.last_error = err;
                true
            }
            None => false,
        }
    }
}

impl NativeApi for FakeApi {
    type Connection = FakeConn;
    type Statement = FakeStmt;

    fn init(&self) -> bool {
        let mut script = self.script.borrow_mut();
        script.inits += 1;
        script.init_ok
    }

    fn fini(&self) {
        self.script.borrow_mut().finis += 1;
    }

    fn new_connection(&self) -> Option<FakeConn> {
        Some(FakeConn { connected: false })
    }

    fn connect(&self, conn: &mut FakeConn, connection_string: &str) -> bool {
        self.record(format!("connect: {}", connection_string));
        if self.check(Stage::Connect, connection_string) {
            return false;
        }
        conn.connected = true;
        true
    }

    fn disconnect(&self, conn: &mut FakeConn) {
        self.record("disconnect".to_string());
        conn.connected = false;
    }

    fn execute_immediate(&self, _conn: &mut FakeConn, sql: &str) -> bool {
        self.record(format!("execute_immediate: {}", sql));
        !self.check(Stage::ExecuteImmediate, sql)
    }

    fn prepare(&self, _conn: &mut FakeConn, sql: &str) -> Option<FakeStmt> {
        self.record(format!("prepare: {}", sql));
        if self.check(Stage::Prepare, sql) {
            return None;
        }
        let mut script = self.script.borrow_mut();
        script.next_stmt += 1;
        Some(FakeStmt {
            id: script.next_stmt,
            sql: sql.to_string(),
            table: script.response(sql),
            cursor: None,
        })
    }

    fn describe_bind_param(&self, _stmt: &mut FakeStmt, index: u32) -> Option<BindParam> {
        Some(BindParam {
            name: format!("p{}", index),
            direction: Direction::Input,
            data_type: DataType::Invalid,
            value: None,
        })
    }

    fn bind_param(&self, stmt: &mut FakeStmt, index: u32, param: &BindParam) -> bool {
        self.record(format!("bind {}: {:?}", index, param.data_type));
        if self.check(Stage::Bind, &stmt.sql) {
            return false;
        }
        self.script.borrow_mut().bound.push(param.clone());
        true
    }

    fn execute(&self, stmt: &mut FakeStmt) -> bool {
        self.record(format!("execute #{}", stmt.id));
        !self.check(Stage::Execute, &stmt.sql)
    }

    fn num_cols(&self, stmt: &FakeStmt) -> i32 {
        if self.check(Stage::Fetch, &stmt.sql) {
            return -1;
        }
        stmt.table.columns.len() as i32
    }

    fn get_column_info(&self, stmt: &FakeStmt, index: u32) -> Option<ColumnInfo> {
        let (name, native_type) = stmt.table.columns.get(index as usize)?.clone();
        Some(ColumnInfo {
            index,
            name,
            data_type: DataType::String,
            native_type,
            precision: 0,
            scale: 0,
            max_size: 0,
            nullable: true,
        })
    }

    fn fetch_next(&self, stmt: &mut FakeStmt) -> bool {
        let next = stmt.cursor.map_or(0, |c| c + 1);
        stmt.cursor = Some(next);
        let more = next < stmt.table.rows.len();
        if more {
            self.record(format!("fetch #{}", stmt.id));
        }
        more
    }

    fn get_column(&self, stmt: &FakeStmt, index: u32) -> Option<WireValue> {
        stmt.table.rows.get(stmt.cursor?)?.get(index as usize).cloned()
    }

    fn affected_rows(&self, stmt: &FakeStmt) -> i64 {
        if self.check(Stage::AffectedRows, &stmt.sql) {
            return -1;
        }
        stmt.table.affected
    }

    fn free_stmt(&self, stmt: FakeStmt) {
        self.record(format!("free #{}", stmt.id));
        self.script.borrow_mut().freed.push(stmt.id);
    }

    fn commit(&self, _conn: &mut FakeConn) -> bool {
        self.record("commit".to_string());
        !self.check(Stage::Commit, "")
    }

    fn rollback(&self, _conn: &mut FakeConn) -> bool {
        self.record("rollback".to_string());
        !self.check(Stage::Rollback, "")
    }

    fn error(&self, _conn: &FakeConn) -> (i32, String) {
        self.script.borrow().last_error.clone()
    }
}

pub const CONNECTION_STRING: &str = "UID=dba;PWD=sql;DBN=demo";

/// A connected session plus a handle on its script, with the connect-time
/// calls cleared from the log.
pub fn session() -> (Session<FakeApi>, FakeApi) {
    let api = FakeApi::new();
    let interface = Arc::new(Interface::new(api.clone()).expect("interface"));
    let session = Session::connect(interface, CONNECTION_STRING).expect("connect");
    api.clear_log();
    (session, api)
}
