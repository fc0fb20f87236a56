//! Operation status codes on the wire
//!
//! Every write-style request to a tagfd endpoint is answered with a single
//! status byte. The values are stable wire constants; `Ok` is zero so a
//! zeroed reply means success.

use crate::{ProtocolError, Result};

/// Outcome of a tagfd operation, as a stable wire byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StatusCode {
    /// Operation succeeded
    Ok = 0,
    /// Client transfer smaller than one record
    BufferTooSmall = 1,
    /// Non-blocking read with no new value available
    WouldBlock = 2,
    /// Blocking read cancelled externally
    Interrupted = 3,
    /// Write whose data type differs from the tag's
    TypeMismatch = 4,
    /// Write whose timestamp does not advance the tag's
    StaleTimestamp = 5,
    /// Client buffer unreadable or unwritable mid-transfer
    TransferFault = 6,
    /// Creation with a name that already exists
    NameTaken = 7,
    /// Creation with an illegal, empty or over-long name
    NameInvalid = 8,
    /// Creation with an unknown data type discriminant
    DtypeInvalid = 9,
    /// Registry is at its configured capacity
    CapacityExhausted = 10,
    /// The master endpoint is already held by another session
    AdminBusy = 11,
    /// Allocation failure in the registry
    OutOfMemory = 12,
}

impl StatusCode {
    /// Parse a status code from its wire byte
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Ok),
            1 => Ok(Self::BufferTooSmall),
            2 => Ok(Self::WouldBlock),
            3 => Ok(Self::Interrupted),
            4 => Ok(Self::TypeMismatch),
            5 => Ok(Self::StaleTimestamp),
            6 => Ok(Self::TransferFault),
            7 => Ok(Self::NameTaken),
            8 => Ok(Self::NameInvalid),
            9 => Ok(Self::DtypeInvalid),
            10 => Ok(Self::CapacityExhausted),
            11 => Ok(Self::AdminBusy),
            12 => Ok(Self::OutOfMemory),
            other => Err(ProtocolError::UnknownStatusCode(other)),
        }
    }

    /// Convert to the wire byte
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check whether this code means success
    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Get a short description of this code
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::BufferTooSmall => "buffer too small",
            Self::WouldBlock => "no new value",
            Self::Interrupted => "interrupted",
            Self::TypeMismatch => "data type mismatch",
            Self::StaleTimestamp => "stale timestamp",
            Self::TransferFault => "transfer fault",
            Self::NameTaken => "name already exists",
            Self::NameInvalid => "invalid name",
            Self::DtypeInvalid => "invalid data type",
            Self::CapacityExhausted => "registry at capacity",
            Self::AdminBusy => "master endpoint busy",
            Self::OutOfMemory => "out of memory",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
