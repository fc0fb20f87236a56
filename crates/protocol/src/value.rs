//! Tag payload values
//!
//! `TagValue` is the tagged-sum form of the 16-byte payload union in the
//! wire record. The active variant always agrees with the record's data
//! type discriminant; the exchange rejects writes where it does not.

use crate::dtype::DataType;
use crate::{ProtocolError, Result, PAYLOAD_SIZE, STRING_VALUE_SIZE};

/// A tag payload, discriminated by [`DataType`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TagValue {
    /// Signed 8-bit integer
    Int8(i8),
    /// Unsigned 8-bit integer
    Uint8(u8),
    /// Signed 16-bit integer
    Int16(i16),
    /// Unsigned 16-bit integer
    Uint16(u16),
    /// Signed 32-bit integer
    Int32(i32),
    /// Unsigned 32-bit integer
    Uint32(u32),
    /// Signed 64-bit integer
    Int64(i64),
    /// Unsigned 64-bit integer
    Uint64(u64),
    /// 32-bit floating point
    Real32(f32),
    /// 64-bit floating point
    Real64(f64),
    /// Milliseconds since the Unix epoch
    Timestamp(u64),
    /// Fixed-width byte string, zero-padded, not null-terminated
    String([u8; STRING_VALUE_SIZE]),
}

impl TagValue {
    /// Get the data type of this value
    #[inline]
    pub const fn dtype(&self) -> DataType {
        match self {
            Self::Int8(_) => DataType::Int8,
            Self::Uint8(_) => DataType::Uint8,
            Self::Int16(_) => DataType::Int16,
            Self::Uint16(_) => DataType::Uint16,
            Self::Int32(_) => DataType::Int32,
            Self::Uint32(_) => DataType::Uint32,
            Self::Int64(_) => DataType::Int64,
            Self::Uint64(_) => DataType::Uint64,
            Self::Real32(_) => DataType::Real32,
            Self::Real64(_) => DataType::Real64,
            Self::Timestamp(_) => DataType::Timestamp,
            Self::String(_) => DataType::String,
        }
    }

    /// The zero value of the given data type (the payload a new tag starts with)
    ///
    /// Returns `None` for [`DataType::Invalid`], which has no values.
    pub const fn zero(dtype: DataType) -> Option<Self> {
        match dtype {
            DataType::Invalid => None,
            DataType::Int8 => Some(Self::Int8(0)),
            DataType::Uint8 => Some(Self::Uint8(0)),
            DataType::Int16 => Some(Self::Int16(0)),
            DataType::Uint16 => Some(Self::Uint16(0)),
            DataType::Int32 => Some(Self::Int32(0)),
            DataType::Uint32 => Some(Self::Uint32(0)),
            DataType::Int64 => Some(Self::Int64(0)),
            DataType::Uint64 => Some(Self::Uint64(0)),
            DataType::Real32 => Some(Self::Real32(0.0)),
            DataType::Real64 => Some(Self::Real64(0.0)),
            DataType::Timestamp => Some(Self::Timestamp(0)),
            DataType::String => Some(Self::String([0; STRING_VALUE_SIZE])),
        }
    }

    /// Build a string value from raw bytes, zero-padding to the fixed width
    ///
    /// Fails if the input is longer than [`STRING_VALUE_SIZE`].
    pub fn string(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > STRING_VALUE_SIZE {
            return Err(ProtocolError::StringTooLong {
                actual: bytes.len(),
                max: STRING_VALUE_SIZE,
            });
        }
        let mut buf = [0u8; STRING_VALUE_SIZE];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self::String(buf))
    }

    /// Write this value into a payload area
    ///
    /// The value occupies the low-order bytes of the area (little-endian);
    /// the remainder is zeroed.
    pub fn encode_payload(&self, payload: &mut [u8; PAYLOAD_SIZE]) {
        payload.fill(0);
        match *self {
            Self::Int8(v) => payload[0] = v as u8,
            Self::Uint8(v) => payload[0] = v,
            Self::Int16(v) => payload[..2].copy_from_slice(&v.to_le_bytes()),
            Self::Uint16(v) => payload[..2].copy_from_slice(&v.to_le_bytes()),
            Self::Int32(v) => payload[..4].copy_from_slice(&v.to_le_bytes()),
            Self::Uint32(v) => payload[..4].copy_from_slice(&v.to_le_bytes()),
            Self::Int64(v) => payload[..8].copy_from_slice(&v.to_le_bytes()),
            Self::Uint64(v) => payload[..8].copy_from_slice(&v.to_le_bytes()),
            Self::Real32(v) => payload[..4].copy_from_slice(&v.to_le_bytes()),
            Self::Real64(v) => payload[..8].copy_from_slice(&v.to_le_bytes()),
            Self::Timestamp(v) => payload[..8].copy_from_slice(&v.to_le_bytes()),
            Self::String(v) => payload.copy_from_slice(&v),
        }
    }

    /// Read a value of the given type out of a payload area
    ///
    /// Fails only for [`DataType::Invalid`].
    pub fn decode_payload(dtype: DataType, payload: &[u8; PAYLOAD_SIZE]) -> Result<Self> {
        let v = match dtype {
            DataType::Invalid => {
                return Err(ProtocolError::InvalidDataType(DataType::Invalid.as_u8()))
            }
            DataType::Int8 => Self::Int8(payload[0] as i8),
            DataType::Uint8 => Self::Uint8(payload[0]),
            DataType::Int16 => Self::Int16(i16::from_le_bytes([payload[0], payload[1]])),
            DataType::Uint16 => Self::Uint16(u16::from_le_bytes([payload[0], payload[1]])),
            DataType::Int32 => {
                Self::Int32(i32::from_le_bytes(payload[..4].try_into().expect("4 bytes")))
            }
            DataType::Uint32 => {
                Self::Uint32(u32::from_le_bytes(payload[..4].try_into().expect("4 bytes")))
            }
            DataType::Int64 => {
                Self::Int64(i64::from_le_bytes(payload[..8].try_into().expect("8 bytes")))
            }
            DataType::Uint64 => {
                Self::Uint64(u64::from_le_bytes(payload[..8].try_into().expect("8 bytes")))
            }
            DataType::Real32 => {
                Self::Real32(f32::from_le_bytes(payload[..4].try_into().expect("4 bytes")))
            }
            DataType::Real64 => {
                Self::Real64(f64::from_le_bytes(payload[..8].try_into().expect("8 bytes")))
            }
            DataType::Timestamp => {
                Self::Timestamp(u64::from_le_bytes(payload[..8].try_into().expect("8 bytes")))
            }
            DataType::String => Self::String(*payload),
        };
        Ok(v)
    }

    /// String-value bytes with trailing zero padding stripped
    ///
    /// Returns `None` for non-string values.
    pub fn string_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::String(buf) => {
                let end = buf.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
                Some(&buf[..end])
            }
            _ => None,
        }
    }
}
