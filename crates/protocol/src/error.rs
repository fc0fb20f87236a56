//! Protocol error types
//!
//! Errors that can occur when encoding or decoding tagfd wire structures.

use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Buffer is too short to contain the expected structure
    #[error("record too short: expected at least {expected} bytes, got {actual}")]
    RecordTooShort { expected: usize, actual: usize },

    /// Unknown data type discriminant on the wire
    #[error("invalid data type discriminant: {0}")]
    InvalidDataType(u8),

    /// Unknown human-readable data type name
    #[error("unknown data type name: {0:?}")]
    UnknownDataTypeName(String),

    /// Creation record with an action byte other than `+`
    #[error("invalid creation action: {0:#04x}")]
    InvalidAction(u8),

    /// Creation record whose name field is not null-terminated
    #[error("creation name is not null-terminated")]
    NameNotTerminated,

    /// Tag name rejected by the naming rules
    #[error("invalid tag name: {reason}")]
    InvalidName { reason: &'static str },

    /// String value longer than the fixed payload area
    #[error("string value too long: {actual} bytes (max {max})")]
    StringTooLong { actual: usize, max: usize },

    /// Text form that does not parse as a value of the expected type
    #[error("cannot parse {dtype} value from {input:?}")]
    ParseValue { dtype: &'static str, input: String },

    /// Text form with a malformed timestamp
    #[error("cannot parse timestamp from {0:?}")]
    ParseTimestamp(String),

    /// Text form with too few fields
    #[error("malformed text record: {0}")]
    MalformedText(&'static str),

    /// Unknown status code byte on the wire
    #[error("unknown status code: {0}")]
    UnknownStatusCode(u8),
}

impl ProtocolError {
    /// Create a record-too-short error
    #[inline]
    pub fn too_short(expected: usize, actual: usize) -> Self {
        Self::RecordTooShort { expected, actual }
    }
}
