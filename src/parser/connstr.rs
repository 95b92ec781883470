//! Connection string parser.
//!
//! ```text
//! ServerName=demo;DatabaseName=demo;UserID=dba;Password=sql;Idle=0
//! ───┬────── ─┬──
//!    │        └── value: anything up to the next ';'
//!    └── key: anything up to '=' (trimmed)
//! ```

use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    sequence::separated_pair,
    IResult,
};

use crate::error::{AdapterError, SqlaResult};

/// Parsed connection string, keys kept in their original order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionString {
    pairs: Vec<(String, String)>,
}

impl ConnectionString {
    /// Look up a key, ignoring ASCII case like the driver does.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn charset(&self) -> Option<&str> {
        self.get("CharSet")
    }

    /// Render back to `key=value;...` form with the password replaced.
    pub fn masked(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| {
                if k.eq_ignore_ascii_case("Password") || k.eq_ignore_ascii_case("PWD") {
                    format!("{}=********", k)
                } else {
                    format!("{}={}", k, v)
                }
            })
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Parse a complete connection string.
pub fn parse_connection_string(input: &str) -> SqlaResult<ConnectionString> {
    let mut pairs = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix(';') {
            rest = after;
            continue;
        }
        let position = input.len() - rest.len();
        match parse_entry(rest) {
            Ok((remaining, (key, value))) => {
                let key = key.trim();
                if key.is_empty() {
                    return Err(AdapterError::parse(position, "empty connection parameter name"));
                }
                pairs.push((key.to_string(), value.trim().to_string()));
                rest = remaining;
            }
            Err(_) => {
                return Err(AdapterError::parse(
                    position,
                    format!("expected key=value, found '{}'", rest.split(';').next().unwrap_or(rest)),
                ));
            }
        }
    }

    Ok(ConnectionString { pairs })
}

/// Parse one `key=value` entry.
fn parse_entry(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        take_while1(|c: char| c != '=' && c != ';'),
        char('='),
        take_while(|c: char| c != ';'),
    )(input)
}
