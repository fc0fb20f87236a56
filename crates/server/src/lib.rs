//! Tagfd Server - the socket namespace boundary
//!
//! This crate exposes a `tagfd_core::Core` to other processes as a
//! directory of file-like Unix socket endpoints:
//!
//! ```text
//! <root>/<tag_name>   one socket per tag, world read/write (0666)
//! <root>.master       the creation endpoint, owner-only (0600)
//! ```
//!
//! A tag connection declares a mode byte on connect: `r` streams every
//! record the session has not yet observed (blocking read-latest
//! semantics), `w` sends records and receives a one-byte status reply per
//! record. The master socket admits one session at a time and accepts
//! fixed-size creation records; sockets for new tags appear immediately.
//!
//! Blocking endpoint reads run on the blocking thread pool so the async
//! accept loops never stall; a disconnecting client cancels its session.

mod config;
mod error;
mod master_listener;
mod namespace;
mod server;
mod tag_listener;

pub use config::ServerConfig;
pub use error::ServerError;
pub use server::TagfdServer;

/// Result type for server operations
pub type Result<T> = std::result::Result<T, ServerError>;
