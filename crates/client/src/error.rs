//! Error types for the client crate

use std::io;
use thiserror::Error;

use tagfd_protocol::{ProtocolError, StatusCode};

/// Errors that can occur on the client side of the exchange
#[derive(Debug, Error)]
pub enum ClientError {
    /// I/O error (socket or filesystem operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed data on the wire
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The server rejected the operation
    #[error("operation rejected: {0}")]
    Rejected(StatusCode),
}

impl ClientError {
    /// The server-side status behind this error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Rejected(code) => Some(*code),
            _ => None,
        }
    }
}
