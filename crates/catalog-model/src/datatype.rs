//! The column datatype catalogue.
//!
//! A closed enumeration of the datatypes a [`crate::Column`] can carry. Each
//! variant answers `has_length`, `has_precision`, `is_serial`, `is_string`,
//! and `is_temporal` without any runtime initialization: the catalogue is a
//! plain `match`, not a lazily-built table, so there is no first-use race to
//! guard against.

use std::fmt;
use std::str::FromStr;

/// One of the PostgreSQL-derived column datatypes this system understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum DataType {
    BigInt,
    BigSerial,
    Bit,
    VarBit,
    SmallInt,
    Serial,
    Boolean,
    Double,
    Integer,
    Real,
    Numeric,
    ByteArray,
    Character,
    VarChar,
    Text,
    Interval,
    Date,
    Time,
    TimeTZ,
    Timestamp,
    TimestampTZ,
}

/// A target language for the per-datatype native-type mapping used by the
/// object-model and Java emitters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NativeTarget {
    Cpp,
    Java,
}

impl DataType {
    /// All datatypes, in declaration order. Used by tooling (e.g. a GUI
    /// drop-down) that wants to enumerate the whole catalogue.
    pub const ALL: &'static [DataType] = &[
        DataType::BigInt,
        DataType::BigSerial,
        DataType::Bit,
        DataType::VarBit,
        DataType::SmallInt,
        DataType::Serial,
        DataType::Boolean,
        DataType::Double,
        DataType::Integer,
        DataType::Real,
        DataType::Numeric,
        DataType::ByteArray,
        DataType::Character,
        DataType::VarChar,
        DataType::Text,
        DataType::Interval,
        DataType::Date,
        DataType::Time,
        DataType::TimeTZ,
        DataType::Timestamp,
        DataType::TimestampTZ,
    ];

    /// Case-insensitive lookup by canonical spelling, e.g. `"varchar"` or
    /// `"VarChar"`.
    pub fn from_name(name: &str) -> Option<DataType> {
        let lower = name.to_ascii_lowercase();
        Self::ALL.iter().copied().find(|dt| dt.lowercase_key() == lower)
    }

    /// Canonical spelling, as it appears in the model JSON and in SQL DDL.
    pub fn to_name(self) -> &'static str {
        match self {
            DataType::BigInt => "BigInt",
            DataType::BigSerial => "BigSerial",
            DataType::Bit => "Bit",
            DataType::VarBit => "VarBit",
            DataType::SmallInt => "SmallInt",
            DataType::Serial => "Serial",
            DataType::Boolean => "Boolean",
            DataType::Double => "Double",
            DataType::Integer => "Integer",
            DataType::Real => "Real",
            DataType::Numeric => "Numeric",
            DataType::ByteArray => "ByteArray",
            DataType::Character => "Character",
            DataType::VarChar => "VarChar",
            DataType::Text => "Text",
            DataType::Interval => "Interval",
            DataType::Date => "Date",
            DataType::Time => "Time",
            DataType::TimeTZ => "TimeTZ",
            DataType::Timestamp => "Timestamp",
            DataType::TimestampTZ => "TimestampTZ",
        }
    }

    fn lowercase_key(self) -> String {
        self.to_name().to_ascii_lowercase()
    }

    /// The DDL spelling of this type, e.g. `CREATE TABLE foo(bar <sql_name>)`.
    pub fn sql_name(self) -> &'static str {
        match self {
            DataType::BigInt => "bigint",
            DataType::BigSerial => "bigserial",
            DataType::Bit => "bit",
            DataType::VarBit => "varbit",
            DataType::SmallInt => "smallint",
            DataType::Serial => "serial",
            DataType::Boolean => "boolean",
            DataType::Double => "double precision",
            DataType::Integer => "integer",
            DataType::Real => "real",
            DataType::Numeric => "numeric",
            DataType::ByteArray => "bytea",
            DataType::Character => "character",
            DataType::VarChar => "varchar",
            DataType::Text => "text",
            DataType::Interval => "interval",
            DataType::Date => "date",
            DataType::Time => "time",
            DataType::TimeTZ => "time with time zone",
            DataType::Timestamp => "timestamp",
            DataType::TimestampTZ => "timestamp with time zone",
        }
    }

    /// Does this type take a `(length)` DDL parameter?
    pub fn has_length(self) -> bool {
        matches!(
            self,
            DataType::Bit | DataType::VarBit | DataType::Character | DataType::VarChar
        )
    }

    /// Does this type take a `(precision[, scale])` DDL parameter?
    pub fn has_precision(self) -> bool {
        matches!(self, DataType::Numeric)
    }

    /// Is this an autoincrementing serial type, i.e. does it own an implicit
    /// sequence and not require one to be synthesized?
    pub fn is_serial(self) -> bool {
        matches!(self, DataType::Serial | DataType::BigSerial)
    }

    /// Is this a character/string-category type?
    pub fn is_string(self) -> bool {
        matches!(
            self,
            DataType::Character | DataType::VarChar | DataType::Text
        )
    }

    /// Is this a date/time-category type?
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            DataType::Date
                | DataType::Time
                | DataType::TimeTZ
                | DataType::Timestamp
                | DataType::TimestampTZ
                | DataType::Interval
        )
    }

    /// The native type used for this column in a generated object-model
    /// class, for the given target language.
    pub fn native_type(self, target: NativeTarget) -> &'static str {
        use NativeTarget::*;
        match (self, target) {
            (DataType::BigInt, Cpp) | (DataType::BigSerial, Cpp) => "int64_t",
            (DataType::BigInt, Java) | (DataType::BigSerial, Java) => "Long",
            (DataType::SmallInt, Cpp) => "int16_t",
            (DataType::SmallInt, Java) => "Short",
            (DataType::Integer, Cpp) | (DataType::Serial, Cpp) => "int",
            (DataType::Integer, Java) | (DataType::Serial, Java) => "Integer",
            (DataType::Boolean, Cpp) => "bool",
            (DataType::Boolean, Java) => "Boolean",
            (DataType::Double, Cpp) => "double",
            (DataType::Double, Java) => "Double",
            (DataType::Real, Cpp) => "float",
            (DataType::Real, Java) => "Float",
            (DataType::Numeric, Cpp) => "double",
            (DataType::Numeric, Java) => "java.math.BigDecimal",
            (DataType::ByteArray, Cpp) => "std::vector<unsigned char>",
            (DataType::ByteArray, Java) => "byte[]",
            (DataType::Character, Cpp) | (DataType::VarChar, Cpp) | (DataType::Text, Cpp) => {
                "std::string"
            }
            (DataType::Character, Java) | (DataType::VarChar, Java) | (DataType::Text, Java) => {
                "String"
            }
            (DataType::Bit, Cpp) | (DataType::VarBit, Cpp) => "std::vector<bool>",
            (DataType::Bit, Java) | (DataType::VarBit, Java) => "java.util.BitSet",
            (DataType::Interval, Cpp) => "std::string",
            (DataType::Interval, Java) => "java.time.Duration",
            (DataType::Date, Cpp) => "std::string",
            (DataType::Date, Java) => "java.time.LocalDate",
            (DataType::Time, Cpp) | (DataType::TimeTZ, Cpp) => "std::string",
            (DataType::Time, Java) | (DataType::TimeTZ, Java) => "java.time.LocalTime",
            (DataType::Timestamp, Cpp) | (DataType::TimestampTZ, Cpp) => "std::string",
            (DataType::Timestamp, Java) | (DataType::TimestampTZ, Java) => "java.time.LocalDateTime",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

impl FromStr for DataType {
    type Err = UnknownDataType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::from_name(s).ok_or_else(|| UnknownDataType(s.to_string()))
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown column datatype: {0:?}")]
pub struct UnknownDataType(pub String);
