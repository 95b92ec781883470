//! Error types for the SQL Anywhere adapter.

use std::fmt;

use thiserror::Error;

/// Native error code raised when a feature is not supported in the
/// statement's context.
pub const FEATURE_NOT_SUPPORTED: i32 = -143;
/// Native error code for a failed invalid-argument check.
pub const BAD_ARGUMENT: i32 = -183;
/// Native error code for a foreign key violation.
pub const FOREIGN_KEY_VIOLATION: i32 = -194;
/// Native error code for a primary key or unique index violation.
pub const UNIQUE_VIOLATION: i32 = -196;

/// A failure reported by the native client, with the SQL that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    pub code: i32,
    pub message: String,
    pub sql: String,
}

impl NativeError {
    pub fn new(code: i32, message: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            sql: sql.into(),
        }
    }

    /// True when the originating statement is a read query.
    pub fn is_select(&self) -> bool {
        self.sql
            .trim_start()
            .get(..6)
            .is_some_and(|head| head.eq_ignore_ascii_case("SELECT"))
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {}): {}", self.message, self.code, self.sql)
    }
}

/// The main error type for adapter operations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// A session could not be established or re-established.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The native driver interface could not be loaded or initialized.
    #[error("Interface error: {0}")]
    Interface(String),

    /// Prepare, bind, execute or fetch failed.
    #[error("Statement error: {0}")]
    Statement(NativeError),

    /// Foreign key constraint violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(NativeError),

    /// Primary key or unique index violated.
    #[error("Uniqueness violation: {0}")]
    UniqueViolation(NativeError),

    /// The native driver rejected an argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(NativeError),

    /// A malformed call caught before reaching the driver.
    #[error("Argument error: {0}")]
    Argument(String),

    /// Generic adapter failure.
    #[error("Adapter error: {0}")]
    Adapter(NativeError),

    /// Failed to parse a connection string, type name or escape sequence.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdapterError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// The native error behind this failure, if any.
    pub fn native(&self) -> Option<&NativeError> {
        match self {
            Self::Statement(e)
            | Self::ForeignKeyViolation(e)
            | Self::UniqueViolation(e)
            | Self::InvalidArgument(e)
            | Self::Adapter(e) => Some(e),
            _ => None,
        }
    }

    /// True for foreign key and uniqueness violations.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ForeignKeyViolation(_) | Self::UniqueViolation(_))
    }
}

/// Map a native error onto the adapter taxonomy.
pub fn translate(error: NativeError) -> AdapterError {
    match error.code {
        FEATURE_NOT_SUPPORTED if !error.is_select() => AdapterError::Adapter(error),
        FOREIGN_KEY_VIOLATION => AdapterError::ForeignKeyViolation(error),
        UNIQUE_VIOLATION => AdapterError::UniqueViolation(error),
        BAD_ARGUMENT => AdapterError::InvalidArgument(error),
        _ => AdapterError::Statement(error),
    }
}

/// Result type alias for adapter operations.
pub type SqlaResult<T> = Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AdapterError::parse(5, "unexpected character");
        assert_eq!(
            err.to_string(),
            "Parse error at position 5: unexpected character"
        );
    }

    #[test]
    fn test_translate_constraint_codes() {
        let fk = translate(NativeError::new(-194, "no primary key value", "INSERT INTO t VALUES (1)"));
        assert!(matches!(fk, AdapterError::ForeignKeyViolation(_)));
        assert!(fk.is_constraint_violation());

        let uq = translate(NativeError::new(-196, "index not unique", "INSERT INTO t VALUES (1)"));
        assert!(matches!(uq, AdapterError::UniqueViolation(_)));

        let arg = translate(NativeError::new(-183, "bad arg", "CALL p()"));
        assert!(matches!(arg, AdapterError::InvalidArgument(_)));
    }

    #[test]
    fn test_translate_feature_code_depends_on_statement() {
        let read = translate(NativeError::new(-143, "not supported", "  select * from t"));
        assert!(matches!(read, AdapterError::Statement(_)));

        let write = translate(NativeError::new(-143, "not supported", "UPDATE t SET a = 1"));
        assert!(matches!(write, AdapterError::Adapter(_)));
    }

    #[test]
    fn test_unmapped_code_keeps_context() {
        let err = translate(NativeError::new(-141, "Table 'x' not found", "SELECT * FROM x"));
        let native = err.native().unwrap();
        assert_eq!(native.code, -141);
        assert_eq!(native.sql, "SELECT * FROM x");
        assert!(matches!(err, AdapterError::Statement(_)));
    }
}
