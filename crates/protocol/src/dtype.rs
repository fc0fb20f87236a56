//! Tag data types
//!
//! Every tag carries one of a closed set of payload types, fixed at
//! creation time. The discriminant values are part of the wire format and
//! must never be renumbered. Value `1` is unassigned for historical
//! reasons.

use crate::{ProtocolError, Result};

/// The closed set of tag payload types
///
/// The discriminant is set when a tag is created and is immutable for the
/// lifetime of the tag; writes carrying a different discriminant are
/// rejected by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    /// Sentinel for "no valid type" (never a live tag's type)
    Invalid = 0,
    /// Signed 8-bit integer
    Int8 = 2,
    /// Unsigned 8-bit integer
    Uint8 = 3,
    /// Signed 16-bit integer
    Int16 = 4,
    /// Unsigned 16-bit integer
    Uint16 = 5,
    /// Signed 32-bit integer
    Int32 = 6,
    /// Unsigned 32-bit integer
    Uint32 = 7,
    /// Signed 64-bit integer
    Int64 = 8,
    /// Unsigned 64-bit integer
    Uint64 = 9,
    /// 32-bit floating point
    Real32 = 10,
    /// 64-bit floating point
    Real64 = 11,
    /// Milliseconds since the Unix epoch, unsigned 64-bit
    Timestamp = 12,
    /// Fixed-width byte string, up to 16 bytes, not null-terminated
    String = 13,
}

impl DataType {
    /// All creatable data types, in discriminant order
    pub const CREATABLE: [DataType; 12] = [
        DataType::Int8,
        DataType::Uint8,
        DataType::Int16,
        DataType::Uint16,
        DataType::Int32,
        DataType::Uint32,
        DataType::Int64,
        DataType::Uint64,
        DataType::Real32,
        DataType::Real64,
        DataType::Timestamp,
        DataType::String,
    ];

    /// Parse a data type from its wire discriminant
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            2 => Some(Self::Int8),
            3 => Some(Self::Uint8),
            4 => Some(Self::Int16),
            5 => Some(Self::Uint16),
            6 => Some(Self::Int32),
            7 => Some(Self::Uint32),
            8 => Some(Self::Int64),
            9 => Some(Self::Uint64),
            10 => Some(Self::Real32),
            11 => Some(Self::Real64),
            12 => Some(Self::Timestamp),
            13 => Some(Self::String),
            _ => None,
        }
    }

    /// Convert to the wire discriminant
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check whether a tag of this type may be created
    #[inline]
    pub const fn is_creatable(self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Get the human-readable name of this data type
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Int8 => "int8",
            Self::Uint8 => "uint8",
            Self::Int16 => "int16",
            Self::Uint16 => "uint16",
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Real32 => "real32",
            Self::Real64 => "real64",
            Self::Timestamp => "timestamp",
            Self::String => "string",
        }
    }

    /// Parse a data type from its human-readable name
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "int8" => Ok(Self::Int8),
            "uint8" => Ok(Self::Uint8),
            "int16" => Ok(Self::Int16),
            "uint16" => Ok(Self::Uint16),
            "int32" => Ok(Self::Int32),
            "uint32" => Ok(Self::Uint32),
            "int64" => Ok(Self::Int64),
            "uint64" => Ok(Self::Uint64),
            "real32" => Ok(Self::Real32),
            "real64" => Ok(Self::Real64),
            "timestamp" => Ok(Self::Timestamp),
            "string" => Ok(Self::String),
            _ => Err(ProtocolError::UnknownDataTypeName(name.to_string())),
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DataType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}
