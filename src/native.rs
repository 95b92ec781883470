//! Boundary to the vendor client library.
//!
//! The adapter never talks to the database itself. Everything goes through a
//! [`NativeApi`] implementation that wraps the vendor's connection, prepared
//! statement and column cursor primitives. Status returns follow the C
//! interface: `false`/`None`/`-1` means "failed, ask [`NativeApi::error`]".

/// Column type codes reported in column descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeType(pub i32);

impl NativeType {
    pub const NO_TYPE: Self = Self(0);
    pub const DATE: Self = Self(384);
    pub const TIME: Self = Self(388);
    pub const TIMESTAMP: Self = Self(392);
    pub const VARCHAR: Self = Self(448);
    pub const FIXCHAR: Self = Self(452);
    pub const LONGVARCHAR: Self = Self(456);
    pub const STRING: Self = Self(460);
    pub const DOUBLE: Self = Self(480);
    pub const FLOAT: Self = Self(482);
    pub const DECIMAL: Self = Self(484);
    pub const INT: Self = Self(496);
    pub const SMALLINT: Self = Self(500);
    pub const BINARY: Self = Self(524);
    pub const LONGBINARY: Self = Self(528);
    pub const TINYINT: Self = Self(604);
    pub const BIGINT: Self = Self(608);
    pub const UNSINT: Self = Self(612);
    pub const UNSSMALLINT: Self = Self(616);
    pub const UNSBIGINT: Self = Self(620);
    pub const BIT: Self = Self(624);
    pub const LONGNVARCHAR: Self = Self(640);

    /// Character columns whose bytes need an encoding applied after fetch.
    pub fn is_character(self) -> bool {
        matches!(
            self,
            Self::VARCHAR | Self::FIXCHAR | Self::LONGVARCHAR | Self::STRING | Self::LONGNVARCHAR
        )
    }
}

/// Host-side representation of a bound or fetched value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    #[default]
    Invalid,
    Binary,
    String,
    Double,
    Val64,
    UVal64,
    Val32,
    UVal32,
    Val16,
    UVal16,
    Val8,
    UVal8,
}

/// Bind slot direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Invalid,
    Input,
    Output,
    InputOutput,
}

/// A cell as the driver hands it over, before host type conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Null,
    Int(i64),
    UInt(u64),
    Double(f64),
    /// Character data in the connection's character set
    Text(Vec<u8>),
    Binary(Vec<u8>),
}

impl WireValue {
    /// The data type the driver would infer for this value.
    pub fn data_type(&self) -> DataType {
        match self {
            WireValue::Null => DataType::String,
            WireValue::Int(_) => DataType::Val64,
            WireValue::UInt(_) => DataType::UVal64,
            WireValue::Double(_) => DataType::Double,
            WireValue::Text(_) => DataType::String,
            WireValue::Binary(_) => DataType::Binary,
        }
    }
}

/// A bind slot described by the driver and filled in by the adapter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BindParam {
    pub name: String,
    pub direction: Direction,
    pub data_type: DataType,
    pub value: Option<WireValue>,
}

impl BindParam {
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Store a value. Like the vendor's `set_value`, every byte buffer is
    /// typed as a string; binary payloads must be re-tagged with
    /// [`BindParam::set_type`]. `None` binds SQL NULL.
    pub fn set_value(&mut self, value: Option<WireValue>) {
        self.data_type = match &value {
            Some(WireValue::Binary(_)) | None => DataType::String,
            Some(v) => v.data_type(),
        };
        self.value = value;
    }

    /// Override the inferred data type.
    pub fn set_type(&mut self, data_type: DataType) {
        self.data_type = data_type;
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, None | Some(WireValue::Null))
    }
}

/// Per-column descriptor for a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub index: u32,
    pub name: String,
    pub data_type: DataType,
    pub native_type: NativeType,
    pub precision: u32,
    pub scale: u32,
    pub max_size: usize,
    pub nullable: bool,
}

/// The vendor client library, consumed as an opaque capability.
///
/// Implementations wrap real driver handles; the adapter owns the lifecycle
/// and never assumes anything about the handle types.
pub trait NativeApi {
    type Connection;
    type Statement;

    /// Load and initialize the library. `false` means it is unusable.
    fn init(&self) -> bool;
    /// Release library-wide resources.
    fn fini(&self);

    fn new_connection(&self) -> Option<Self::Connection>;
    fn connect(&self, conn: &mut Self::Connection, connection_string: &str) -> bool;
    fn disconnect(&self, conn: &mut Self::Connection);
    fn execute_immediate(&self, conn: &mut Self::Connection, sql: &str) -> bool;

    fn prepare(&self, conn: &mut Self::Connection, sql: &str) -> Option<Self::Statement>;
    fn describe_bind_param(&self, stmt: &mut Self::Statement, index: u32) -> Option<BindParam>;
    fn bind_param(&self, stmt: &mut Self::Statement, index: u32, param: &BindParam) -> bool;
    fn execute(&self, stmt: &mut Self::Statement) -> bool;
    /// Number of result columns, `-1` on failure.
    fn num_cols(&self, stmt: &Self::Statement) -> i32;
    fn get_column_info(&self, stmt: &Self::Statement, index: u32) -> Option<ColumnInfo>;
    fn fetch_next(&self, stmt: &mut Self::Statement) -> bool;
    fn get_column(&self, stmt: &Self::Statement, index: u32) -> Option<WireValue>;
    /// Rows touched by the last execution, `-1` on failure.
    fn affected_rows(&self, stmt: &Self::Statement) -> i64;
    /// Release a statement. Takes ownership so a handle is freed at most once.
    fn free_stmt(&self, stmt: Self::Statement);

    fn commit(&self, conn: &mut Self::Connection) -> bool;
    fn rollback(&self, conn: &mut Self::Connection) -> bool;
    /// Last error on the connection as `(code, message)`; code `0` means none.
    fn error(&self, conn: &Self::Connection) -> (i32, String);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value_tracks_type() {
        let mut param = BindParam::default();
        param.set_value(Some(WireValue::Binary(b"abc".to_vec())));
        assert_eq!(param.data_type, DataType::String);
        param.set_type(DataType::Binary);
        assert_eq!(param.data_type, DataType::Binary);
        param.set_value(None);
        assert!(param.is_null());
    }

    #[test]
    fn test_character_codes() {
        for code in [448, 452, 456, 460, 640] {
            assert!(NativeType(code).is_character());
        }
        assert!(!NativeType::DECIMAL.is_character());
    }
}
