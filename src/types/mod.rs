//! Mapping between portable logical types and SQL Anywhere column types.
//!
//! - [`conversion`]: value encoding for binds and decoding of fetched cells
//! - [`quoting`]: literal and identifier quoting for SQL text

pub mod conversion;
pub mod quoting;

use serde::{Deserialize, Serialize};

use crate::error::SqlaResult;
use crate::parser::parse_sql_type;

pub use conversion::{TextEncoding, decode_cell, encode_bind, fill_bind_param};
pub use quoting::{quote, quote_column_name, quote_literal, quote_string, quote_table_name};

/// Portable column types the adapter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalType {
    PrimaryKey,
    String,
    Text,
    Integer,
    Float,
    Decimal,
    DateTime,
    Timestamp,
    Time,
    Date,
    Binary,
    Boolean,
}

impl LogicalType {
    pub const ALL: [LogicalType; 12] = [
        LogicalType::PrimaryKey,
        LogicalType::String,
        LogicalType::Text,
        LogicalType::Integer,
        LogicalType::Float,
        LogicalType::Decimal,
        LogicalType::DateTime,
        LogicalType::Timestamp,
        LogicalType::Time,
        LogicalType::Date,
        LogicalType::Binary,
        LogicalType::Boolean,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LogicalType::PrimaryKey => "primary_key",
            LogicalType::String => "string",
            LogicalType::Text => "text",
            LogicalType::Integer => "integer",
            LogicalType::Float => "float",
            LogicalType::Decimal => "decimal",
            LogicalType::DateTime => "datetime",
            LogicalType::Timestamp => "timestamp",
            LogicalType::Time => "time",
            LogicalType::Date => "date",
            LogicalType::Binary => "binary",
            LogicalType::Boolean => "boolean",
        }
    }

    /// Default column type and size limit for this logical type.
    ///
    /// Booleans are stored as `tinyint` because `bit` columns reject NULL.
    pub fn native_default(&self) -> (&'static str, Option<u32>) {
        match self {
            LogicalType::PrimaryKey => ("INTEGER PRIMARY KEY DEFAULT AUTOINCREMENT NOT NULL", None),
            LogicalType::String => ("varchar", Some(255)),
            LogicalType::Text => ("long varchar", None),
            LogicalType::Integer => ("integer", Some(4)),
            LogicalType::Float => ("float", None),
            LogicalType::Decimal => ("decimal", None),
            LogicalType::DateTime | LogicalType::Timestamp => ("datetime", None),
            LogicalType::Time => ("time", None),
            LogicalType::Date => ("date", None),
            LogicalType::Binary => ("binary", None),
            LogicalType::Boolean => ("tinyint", Some(1)),
        }
    }
}

impl std::str::FromStr for LogicalType {
    type Err = crate::error::AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicalType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::error::AdapterError::Argument(format!("Unknown logical type: '{}'", s)))
    }
}

/// Column definition SQL for a logical type.
///
/// SQL Anywhere has no `INTEGER(size)`, so integer limits pick the type.
pub fn type_to_sql(
    logical: LogicalType,
    limit: Option<u32>,
    precision: Option<u32>,
    scale: Option<u32>,
) -> String {
    match logical {
        LogicalType::Integer => {
            let name = match limit {
                Some(1) => "tinyint",
                Some(2) => "smallint",
                Some(3..=4) => "integer",
                Some(5..=8) => "bigint",
                _ => "integer",
            };
            name.to_string()
        }
        LogicalType::String => match limit {
            Some(n) => format!("varchar ({})", n),
            None => "varchar(255)".to_string(),
        },
        LogicalType::Boolean => "tinyint".to_string(),
        LogicalType::Binary => match limit {
            Some(n) => format!("binary ({})", n),
            None => "long binary".to_string(),
        },
        LogicalType::Decimal => match (precision, scale) {
            (Some(p), Some(s)) => format!("decimal({},{})", p, s),
            (Some(p), None) => format!("decimal({})", p),
            _ => "decimal".to_string(),
        },
        other => other.native_default().0.to_string(),
    }
}

/// A native column type resolved to its logical type and modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeMetadata {
    pub sql_type: String,
    pub logical: LogicalType,
    pub limit: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

/// Resolve a catalog domain string such as `varchar(80)` or `numeric(10,2)`.
pub fn fetch_type_metadata(sql_type: &str) -> SqlaResult<TypeMetadata> {
    let spec = parse_sql_type(sql_type)?;
    let logical = logical_type_for(&spec.name);

    let (limit, precision, scale) = match logical {
        LogicalType::Decimal => (None, spec.width, spec.scale),
        LogicalType::Integer | LogicalType::Boolean => (extract_limit(&spec.name), None, None),
        _ => (spec.width, None, None),
    };

    Ok(TypeMetadata {
        sql_type: sql_type.trim().to_string(),
        logical,
        limit,
        precision,
        scale,
    })
}

/// Map a lowercased native type name to a logical type.
///
/// `tinyint` and `bit` are booleans: single-byte integer columns are not
/// supported.
pub fn logical_type_for(name: &str) -> LogicalType {
    match name {
        "boolean" | "tinyint" | "bit" => LogicalType::Boolean,
        "char" | "varchar" | "nchar" | "nvarchar" | "xml" | "uniqueidentifierstr" => LogicalType::String,
        "text" | "long varchar" | "long nvarchar" | "ntext" => LogicalType::Text,
        "binary" | "varbinary" | "long binary" | "image" => LogicalType::Binary,
        "date" => LogicalType::Date,
        "time" => LogicalType::Time,
        "timestamp" | "timestamp with time zone" => LogicalType::Timestamp,
        "datetime" | "smalldatetime" => LogicalType::DateTime,
        "decimal" | "numeric" | "money" | "smallmoney" => LogicalType::Decimal,
        "float" | "double" | "real" => LogicalType::Float,
        "int" | "integer" | "smallint" | "bigint" | "unsigned int" | "unsigned smallint"
        | "unsigned bigint" | "uniqueidentifier" => LogicalType::Integer,
        other if other.contains("int") => LogicalType::Integer,
        other if other.contains("char") => LogicalType::String,
        other if other.contains("binary") => LogicalType::Binary,
        _ => LogicalType::String,
    }
}

/// Byte width implied by an integer type name.
pub fn extract_limit(name: &str) -> Option<u32> {
    let name = name.to_ascii_lowercase();
    let base = name.trim_start_matches("unsigned ").trim();
    if base.starts_with("tinyint") || base.starts_with("bit") {
        Some(1)
    } else if base.starts_with("smallint") {
        Some(2)
    } else if base.starts_with("integer") || base == "int" {
        Some(4)
    } else if base.starts_with("bigint") {
        Some(8)
    } else {
        None
    }
}
