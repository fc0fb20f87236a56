//! Error types for the server crate

use std::io;
use thiserror::Error;

/// Errors that can occur while serving the namespace
#[derive(Debug, Error)]
pub enum ServerError {
    /// I/O error (socket or filesystem operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error from the exchange engine
    #[error(transparent)]
    Core(#[from] tagfd_core::CoreError),

    /// A blocking task was cancelled or panicked
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Invalid server configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
