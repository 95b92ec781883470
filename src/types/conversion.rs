//! Value conversion across the native boundary.
//!
//! Outbound: [`Value`] → [`WireValue`] for bind slots. Booleans become `1`/`0`,
//! decimals and temporal values their canonical text. Binary payloads are
//! passed through untouched and the slot is tagged [`DataType::Binary`]; they
//! are never escaped into text.
//!
//! Inbound: [`WireValue`] → [`Value`] keyed on the column's [`NativeType`].
//! Decimals parse into [`Decimal`], character data is decoded with the
//! session's [`TextEncoding`], everything else passes through.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::ast::Value;
use crate::error::{AdapterError, SqlaResult};
use crate::native::{BindParam, DataType, Direction, NativeType, WireValue};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
// Matches the session's `timestamp_format` option.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Character set applied to character columns after fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1, one byte per code point
    Latin1,
}

impl TextEncoding {
    /// Resolve a `CharSet` connection parameter.
    pub fn from_charset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf8" | "utf-8" => Some(TextEncoding::Utf8),
            "iso-1" | "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "cp1252" | "windows-1252" => {
                Some(TextEncoding::Latin1)
            }
            _ => None,
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }

    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
        }
    }
}

/// Convert a value to its wire form. `None` is SQL NULL.
pub fn encode_bind(value: &Value, encoding: TextEncoding) -> Option<WireValue> {
    let wire = match value {
        Value::Null => return None,
        Value::Bool(b) => WireValue::Int(i64::from(*b)),
        Value::Int(n) => WireValue::Int(*n),
        Value::Float(f) => WireValue::Double(*f),
        Value::Decimal(d) => WireValue::Text(d.to_string().into_bytes()),
        Value::Date(d) => WireValue::Text(d.format(DATE_FORMAT).to_string().into_bytes()),
        Value::Time(t) => WireValue::Text(t.format(TIME_FORMAT).to_string().into_bytes()),
        Value::DateTime(dt) => WireValue::Text(dt.format(TIMESTAMP_FORMAT).to_string().into_bytes()),
        Value::Text(s) => WireValue::Text(encoding.encode(s)),
        Value::Binary(bytes) => WireValue::Binary(bytes.clone()),
    };
    Some(wire)
}

/// Fill a described bind slot with an input value.
pub fn fill_bind_param(param: &mut BindParam, value: &Value, encoding: TextEncoding) {
    param.set_direction(Direction::Input);
    let wire = encode_bind(value, encoding);
    let is_binary = matches!(wire, Some(WireValue::Binary(_)));
    param.set_value(wire);
    if is_binary {
        param.set_type(DataType::Binary);
    }
}

/// Convert a fetched cell into a host value.
pub fn decode_cell(native_type: NativeType, cell: WireValue, encoding: TextEncoding) -> SqlaResult<Value> {
    if matches!(cell, WireValue::Null) {
        return Ok(Value::Null);
    }

    match native_type {
        NativeType::DECIMAL => decode_decimal(cell).map(Value::Decimal),
        // Boolean columns are stored as tinyint or bit
        NativeType::TINYINT | NativeType::BIT => Ok(match cell {
            WireValue::Int(n) => Value::Bool(n != 0),
            WireValue::UInt(n) => Value::Bool(n != 0),
            other => passthrough(other, encoding),
        }),
        t if t.is_character() => Ok(match cell {
            WireValue::Text(bytes) | WireValue::Binary(bytes) => Value::Text(encoding.decode(&bytes)),
            other => passthrough(other, encoding),
        }),
        NativeType::DATE => Ok(decode_temporal(cell, encoding, |s| {
            NaiveDate::parse_from_str(s, DATE_FORMAT).ok().map(Value::Date)
        })),
        NativeType::TIME => Ok(decode_temporal(cell, encoding, |s| {
            NaiveTime::parse_from_str(s, TIME_FORMAT).ok().map(Value::Time)
        })),
        NativeType::TIMESTAMP => Ok(decode_temporal(cell, encoding, |s| {
            NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok().map(Value::DateTime)
        })),
        _ => Ok(passthrough(cell, encoding)),
    }
}

fn decode_decimal(cell: WireValue) -> SqlaResult<Decimal> {
    match cell {
        WireValue::Int(n) => Ok(Decimal::from(n)),
        WireValue::UInt(n) => Ok(Decimal::from(n)),
        WireValue::Double(f) => Decimal::try_from(f)
            .map_err(|e| AdapterError::Argument(format!("Invalid decimal {}: {}", f, e))),
        WireValue::Text(bytes) | WireValue::Binary(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            let text = text.trim();
            Decimal::from_str(text)
                .or_else(|_| Decimal::from_scientific(text))
                .map_err(|e| AdapterError::Argument(format!("Invalid decimal '{}': {}", text, e)))
        }
        WireValue::Null => Ok(Decimal::ZERO),
    }
}

/// Temporal columns arrive as text; anything unparseable is kept as text.
fn decode_temporal(cell: WireValue, encoding: TextEncoding, parse: impl Fn(&str) -> Option<Value>) -> Value {
    match cell {
        WireValue::Text(bytes) => {
            let text = encoding.decode(&bytes);
            parse(text.trim()).unwrap_or(Value::Text(text))
        }
        other => passthrough(other, encoding),
    }
}

fn passthrough(cell: WireValue, encoding: TextEncoding) -> Value {
    match cell {
        WireValue::Null => Value::Null,
        WireValue::Int(n) => Value::Int(n),
        WireValue::UInt(n) => i64::try_from(n)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Decimal(Decimal::from(n))),
        WireValue::Double(f) => Value::Float(f),
        WireValue::Text(bytes) => Value::Text(encoding.decode(&bytes)),
        WireValue::Binary(bytes) => Value::Binary(bytes),
    }
}
