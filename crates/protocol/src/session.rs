//! Session wire constants
//!
//! A connection to a tag endpoint opens with a single mode byte choosing
//! the session kind. A read session then submits one request byte per
//! read; the endpoint answers `[status]` followed by one full record when
//! the status is `Ok`. A write session submits full records and receives
//! one status byte each.

/// Mode byte: this connection is a read session
pub const MODE_READ: u8 = b'r';

/// Mode byte: this connection is a write session
pub const MODE_WRITE: u8 = b'w';

/// Read request: block until an unobserved value exists
pub const READ_BLOCKING: u8 = b'b';

/// Read request: answer `WouldBlock` instead of suspending
pub const READ_NONBLOCKING: u8 = b'n';
