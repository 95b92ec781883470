//! Small parsers built with nom.
//!
//! - [`connstr`]: `Key=value;Key=value` connection strings
//! - [`sql_type`]: native column type names such as `numeric(10,2)`
//! - [`escapes`]: `\xHH` escapes found in catalog default values

pub mod connstr;
pub mod escapes;
pub mod sql_type;

pub use connstr::{ConnectionString, parse_connection_string};
pub use escapes::decode_hex_escapes;
pub use sql_type::{SqlTypeSpec, parse_sql_type};
