//! Error types for the exchange engine
//!
//! Every condition a client can hit maps to exactly one variant, and every
//! variant has a stable wire form in `tagfd_protocol::StatusCode`. Nothing
//! here is fatal to the engine; errors are returned to the calling session
//! and never retried internally.

use tagfd_protocol::{DataType, ProtocolError, StatusCode};
use thiserror::Error;

/// Errors that can occur in the exchange engine
#[derive(Debug, Error)]
pub enum CoreError {
    /// Client transfer smaller than one full record
    #[error("buffer too small: need {expected} bytes, got {actual}")]
    BufferTooSmall { expected: usize, actual: usize },

    /// Non-blocking read with no unseen value
    #[error("no new value available")]
    WouldBlock,

    /// Blocking read cancelled externally
    #[error("read interrupted")]
    Interrupted,

    /// Write whose data type differs from the tag's
    #[error("data type mismatch: tag is {expected}, write is {got}")]
    TypeMismatch { expected: DataType, got: DataType },

    /// Write whose timestamp does not advance the stored one
    #[error("stale timestamp: stored {current}, write carries {offered}")]
    StaleTimestamp { current: u64, offered: u64 },

    /// Creation with a name that is already registered
    #[error("tag name already exists: {name}")]
    NameTaken { name: String },

    /// Creation with an illegal, empty or over-long name
    #[error("invalid tag name: {reason}")]
    NameInvalid { reason: &'static str },

    /// Creation with an unknown data type discriminant
    #[error("invalid data type discriminant: {0}")]
    DtypeInvalid(u8),

    /// Registry is at its configured capacity
    #[error("registry at capacity ({capacity} tags)")]
    CapacityExhausted { capacity: usize },

    /// The master endpoint is already held by another session
    #[error("master endpoint already in use")]
    AdminBusy,

    /// The registry's backing storage could not grow
    #[error("out of memory while growing the registry")]
    OutOfMemory,

    /// Open of a name with no live tag behind it
    #[error("no such tag: {name}")]
    TagNotFound { name: String },

    /// Structurally invalid request record (bad action byte)
    #[error("malformed request: {0}")]
    MalformedRequest(&'static str),
}

impl CoreError {
    /// Check whether this error means "retry the read later"
    #[inline]
    pub fn is_would_block(&self) -> bool {
        matches!(self, Self::WouldBlock)
    }

    /// The stable wire byte for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BufferTooSmall { .. } => StatusCode::BufferTooSmall,
            Self::WouldBlock => StatusCode::WouldBlock,
            Self::Interrupted => StatusCode::Interrupted,
            Self::TypeMismatch { .. } => StatusCode::TypeMismatch,
            Self::StaleTimestamp { .. } => StatusCode::StaleTimestamp,
            Self::NameTaken { .. } => StatusCode::NameTaken,
            Self::NameInvalid { .. } => StatusCode::NameInvalid,
            Self::DtypeInvalid(_) => StatusCode::DtypeInvalid,
            Self::CapacityExhausted { .. } => StatusCode::CapacityExhausted,
            Self::AdminBusy => StatusCode::AdminBusy,
            Self::OutOfMemory => StatusCode::OutOfMemory,
            // These never cross the wire as a status byte in practice;
            // TransferFault is the catch-all for unusable client requests.
            Self::TagNotFound { .. } | Self::MalformedRequest(_) => StatusCode::TransferFault,
        }
    }

    /// Map a wire-decode failure onto the operation-level taxonomy
    ///
    /// `record_size` is the full size of the record that was being
    /// decoded, reported in the buffer-too-small case.
    pub fn from_decode(err: ProtocolError, record_size: usize) -> Self {
        match err {
            ProtocolError::RecordTooShort { actual, .. } => Self::BufferTooSmall {
                expected: record_size,
                actual,
            },
            ProtocolError::InvalidDataType(raw) => Self::DtypeInvalid(raw),
            ProtocolError::InvalidAction(_) => Self::MalformedRequest("unknown action byte"),
            ProtocolError::NameNotTerminated => Self::NameInvalid {
                reason: "name is not null-terminated",
            },
            ProtocolError::InvalidName { reason } => Self::NameInvalid { reason },
            // Remaining protocol errors cannot come out of record decoding.
            _ => Self::MalformedRequest("undecodable request"),
        }
    }
}
