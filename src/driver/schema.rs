//! Catalog introspection and schema changes.
//!
//! User objects are everything not owned by `SYS` (0), `dbo` (3) or
//! `rs_systabgroup` (5). Table names are embedded as string literals.

use serde::Serialize;

use crate::ast::Value;
use crate::error::{AdapterError, NativeError, SqlaResult};
use crate::native::NativeApi;
use crate::parser::decode_hex_escapes;
use crate::transpiler::ddl::{self, ColumnOptions};
use crate::types::{LogicalType, TypeMetadata, fetch_type_metadata, quote_string};

use super::connection::Session;

const SCHEMA: &str = "SCHEMA";

/// An index and its member columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexDefinition {
    pub table: String,
    pub name: String,
    pub unique: bool,
    pub columns: Vec<String>,
}

/// One catalog row describing a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnStructure {
    pub name: String,
    /// Default without surrounding quotes; `None` for autoincrement columns
    pub default: Option<String>,
    /// `type`, `type(width)` or `type(width,scale)`
    pub domain: String,
    pub nullable: bool,
}

/// A column resolved to its logical type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub table: String,
    pub name: String,
    pub default: Option<String>,
    pub metadata: TypeMetadata,
    pub nullable: bool,
}

impl Column {
    pub fn logical_type(&self) -> LogicalType {
        self.metadata.logical
    }
}

fn literal(s: &str) -> String {
    format!("'{}'", quote_string(s))
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::Text(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl<A: NativeApi> Session<A> {
    pub fn tables(&mut self) -> SqlaResult<Vec<String>> {
        let rs = self.exec_query(
            "SELECT table_name FROM SYS.SYSTABLE WHERE creator NOT IN (0,3,5)",
            SCHEMA,
            &[],
        )?;
        Ok(rs.column_values("table_name").into_iter().filter_map(|v| text(Some(v))).collect())
    }

    pub fn views(&mut self) -> SqlaResult<Vec<String>> {
        let rs = self.exec_query(
            "SELECT table_name FROM SYS.SYSTAB WHERE table_type_str = 'VIEW' AND creator NOT IN (0,3,5)",
            SCHEMA,
            &[],
        )?;
        Ok(rs.column_values("table_name").into_iter().filter_map(|v| text(Some(v))).collect())
    }

    /// Secondary indexes of a table. Primary and foreign keys are excluded.
    pub fn indexes(&mut self, table: &str) -> SqlaResult<Vec<IndexDefinition>> {
        let sql = format!(
            "SELECT DISTINCT index_name, \"unique\" FROM SYS.SYSTABLE \
             INNER JOIN SYS.SYSIDXCOL ON SYS.SYSTABLE.table_id = SYS.SYSIDXCOL.table_id \
             INNER JOIN SYS.SYSIDX ON SYS.SYSTABLE.table_id = SYS.SYSIDX.table_id \
             AND SYS.SYSIDXCOL.index_id = SYS.SYSIDX.index_id \
             WHERE table_name = {} AND index_category > 2",
            literal(table)
        );
        let rs = self.exec_query(&sql, SCHEMA, &[])?;

        let mut indexes = Vec::with_capacity(rs.len());
        for row in 0..rs.len() {
            let Some(name) = text(rs.get(row, "index_name")) else {
                continue;
            };
            let unique = rs.get(row, "unique").and_then(Value::as_i64) == Some(1);

            let columns_sql = format!(
                "SELECT column_name FROM SYS.SYSIDX \
                 INNER JOIN SYS.SYSIDXCOL ON SYS.SYSIDXCOL.table_id = SYS.SYSIDX.table_id \
                 AND SYS.SYSIDXCOL.index_id = SYS.SYSIDX.index_id \
                 INNER JOIN SYS.SYSCOLUMN ON SYS.SYSCOLUMN.table_id = SYS.SYSIDXCOL.table_id \
                 AND SYS.SYSCOLUMN.column_id = SYS.SYSIDXCOL.column_id \
                 WHERE index_name = {} ORDER BY SYS.SYSIDXCOL.sequence",
                literal(&name)
            );
            let cols = self.exec_query(&columns_sql, SCHEMA, &[])?;
            let columns = cols
                .column_values("column_name")
                .into_iter()
                .filter_map(|v| text(Some(v)))
                .collect();

            indexes.push(IndexDefinition {
                table: table.to_string(),
                name,
                unique,
                columns,
            });
        }
        Ok(indexes)
    }

    /// First primary key column.
    pub fn primary_key(&mut self, table: &str) -> SqlaResult<Option<String>> {
        let sql = format!(
            "SELECT cname FROM SYS.SYSCOLUMNS WHERE tname = {} AND in_primary_key = 'Y'",
            literal(table)
        );
        let rs = self.exec_query(&sql, SCHEMA, &[])?;
        Ok(text(rs.get(0, "cname")))
    }

    /// All primary key columns in key order. Empty when there is no key.
    pub fn primary_keys(&mut self, table: &str) -> SqlaResult<Vec<String>> {
        let sql = format!(
            "SELECT list(c.column_name ORDER BY ixc.sequence) AS pk_columns \
             FROM SYSIDX ix, SYSTABLE t, SYSIDXCOL ixc, SYSCOLUMN c \
             WHERE ix.table_id = t.table_id \
             AND ixc.table_id = t.table_id \
             AND ixc.index_id = ix.index_id \
             AND ixc.table_id = c.table_id \
             AND ixc.column_id = c.column_id \
             AND ix.index_category IN (1,2) \
             AND t.table_name = {} \
             GROUP BY ix.index_name, ix.index_id, ix.index_category \
             ORDER BY ix.index_id",
            literal(table)
        );
        let rs = self.exec_query(&sql, SCHEMA, &[])?;
        Ok(text(rs.get(0, "pk_columns"))
            .map(|list| list.split(',').map(|c| c.trim().to_string()).collect())
            .unwrap_or_default())
    }

    /// Raw column rows for a table.
    pub fn table_structure(&mut self, table: &str) -> SqlaResult<Vec<ColumnStructure>> {
        let sql = format!(
            "SELECT SYS.SYSCOLUMN.column_name AS name, \
             IF left(\"default\",1)='''' THEN substring(\"default\", 2, length(\"default\")-2) \
             ELSE NULLIF(SYS.SYSCOLUMN.\"default\", 'autoincrement') \
             ENDIF AS \"default\", \
             IF SYS.SYSCOLUMN.domain_id IN (7,8,9,11,33,34,35,3,27) THEN \
               IF SYS.SYSCOLUMN.domain_id IN (3,27) THEN \
                 SYS.SYSDOMAIN.domain_name || '(' || SYS.SYSCOLUMN.width || ',' || SYS.SYSCOLUMN.scale || ')' \
               ELSE \
                 SYS.SYSDOMAIN.domain_name || '(' || SYS.SYSCOLUMN.width || ')' \
               ENDIF \
             ELSE \
               SYS.SYSDOMAIN.domain_name \
             ENDIF AS domain, \
             IF SYS.SYSCOLUMN.nulls = 'Y' THEN 1 ELSE 0 ENDIF AS nulls \
             FROM SYS.SYSCOLUMN \
             INNER JOIN SYS.SYSTABLE ON SYS.SYSCOLUMN.table_id = SYS.SYSTABLE.table_id \
             INNER JOIN SYS.SYSDOMAIN ON SYS.SYSCOLUMN.domain_id = SYS.SYSDOMAIN.domain_id \
             WHERE table_name = {}",
            literal(table)
        );
        let rs = self.exec_query(&sql, SCHEMA, &[])?;
        if rs.is_empty() {
            return Err(AdapterError::Statement(NativeError::new(
                0,
                format!("Could not find table '{}'", table),
                sql,
            )));
        }

        let mut structure = Vec::with_capacity(rs.len());
        for row in 0..rs.len() {
            structure.push(ColumnStructure {
                name: text(rs.get(row, "name")).unwrap_or_default(),
                default: text(rs.get(row, "default")).map(|d| decode_hex_escapes(&d)),
                domain: text(rs.get(row, "domain")).unwrap_or_default(),
                nullable: rs.get(row, "nulls").and_then(Value::as_i64) == Some(1),
            });
        }
        Ok(structure)
    }

    /// Columns of a table with their logical types.
    pub fn columns(&mut self, table: &str) -> SqlaResult<Vec<Column>> {
        self.table_structure(table)?
            .into_iter()
            .map(|field| {
                Ok(Column {
                    table: table.to_string(),
                    metadata: fetch_type_metadata(&field.domain)?,
                    name: field.name,
                    default: field.default,
                    nullable: field.nullable,
                })
            })
            .collect()
    }

    pub fn table_exists(&mut self, table: &str) -> SqlaResult<bool> {
        Ok(self.tables()?.iter().any(|t| t.eq_ignore_ascii_case(table)))
    }

    pub fn rename_table(&mut self, name: &str, new_name: &str) -> SqlaResult<()> {
        self.execute(&ddl::rename_table(name, new_name), SCHEMA)?;
        Ok(())
    }

    pub fn rename_column(&mut self, table: &str, column: &str, new_column: &str) -> SqlaResult<()> {
        for sql in ddl::rename_column(table, column, new_column) {
            self.execute(&sql, SCHEMA)?;
        }
        Ok(())
    }

    pub fn change_column_default(&mut self, table: &str, column: &str, default: &Value) -> SqlaResult<()> {
        self.execute(&ddl::change_column_default(table, column, default)?, SCHEMA)?;
        Ok(())
    }

    pub fn change_column_null(
        &mut self,
        table: &str,
        column: &str,
        null: bool,
        default: Option<&Value>,
    ) -> SqlaResult<()> {
        for sql in ddl::change_column_null(table, column, null, default)? {
            self.execute(&sql, SCHEMA)?;
        }
        Ok(())
    }

    pub fn change_column(
        &mut self,
        table: &str,
        column: &str,
        logical: LogicalType,
        options: &ColumnOptions,
    ) -> SqlaResult<()> {
        self.execute(&ddl::change_column(table, column, logical, options)?, SCHEMA)?;
        Ok(())
    }

    /// Drop columns, dropping the indexes that reference each one first.
    pub fn remove_column(&mut self, table: &str, columns: &[&str]) -> SqlaResult<()> {
        if columns.is_empty() {
            return Err(AdapterError::Argument("missing column name(s) for remove_column".to_string()));
        }
        for column in columns {
            let rs = self.exec_query(&ddl::column_indexes_query(table, column), SCHEMA, &[])?;
            let index_names: Vec<String> = rs
                .column_values("index_name")
                .into_iter()
                .filter_map(|v| text(Some(v)))
                .collect();
            for index in index_names {
                self.execute(&ddl::remove_index(table, &index), SCHEMA)?;
            }
            self.execute(&ddl::remove_column(table, column), SCHEMA)?;
        }
        Ok(())
    }

    pub fn remove_index(&mut self, table: &str, index_name: &str) -> SqlaResult<()> {
        self.execute(&ddl::remove_index(table, index_name), SCHEMA)?;
        Ok(())
    }
}
