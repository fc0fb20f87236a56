//! Tagfd Protocol - shared wire types for the tag exchange
//!
//! This crate provides the types that every tagfd participant agrees on:
//!
//! - `DataType` - the closed set of tag payload types
//! - `Quality` - the 16-bit quality word (level bits + vendor bits)
//! - `TagValue` - a tag payload as a tagged sum over the closed type set
//! - `TagRecord` - the fixed-size record exchanged on every read/write
//! - `CreateRequest` - the creation record accepted by the master endpoint
//! - `StatusCode` - stable wire bytes for operation outcomes
//! - Text codecs - human-readable and machine-readable value forms
//!
//! # Wire Format
//!
//! A value record is exactly [`TAG_RECORD_SIZE`] bytes:
//!
//! ```text
//! ┌──────────────┬────────────────┬─────────────┬────────┬─────────┐
//! │ 16 bytes     │ 8 bytes        │ 2 bytes     │ 1 byte │ 5 bytes │
//! │ payload      │ timestamp (LE) │ quality (LE)│ dtype  │ padding │
//! └──────────────┴────────────────┴─────────────┴────────┴─────────┘
//! ```
//!
//! Reads and writes transfer exactly one record; short transfers fail.

mod admin;
mod dtype;
mod error;
mod name;
pub mod paths;
mod quality;
mod record;
pub mod session;
mod status;
mod text;
mod value;

pub use admin::{CreateRequest, CREATE_ACTION_ADD, CREATE_REQUEST_SIZE};
pub use dtype::DataType;
pub use error::ProtocolError;
pub use name::validate_tag_name;
pub use quality::{Quality, QualityLevel, LEVEL_MASK, VENDOR_MASK};
pub use record::{TagRecord, TAG_RECORD_SIZE};
pub use status::StatusCode;
pub use text::{
    format_human_value, format_machine_record, format_machine_value, format_timestamp,
    parse_human_quality, parse_human_value, parse_machine_record, parse_machine_value,
    parse_timestamp,
};
pub use value::TagValue;

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Size of the payload area in a value record, in bytes
pub const PAYLOAD_SIZE: usize = 16;

/// Maximum length of a string-typed tag value, in bytes
pub const STRING_VALUE_SIZE: usize = 16;

/// Size of the name field in a creation record (zero-padded, null-terminated)
pub const NAME_FIELD_SIZE: usize = 256;

/// Maximum length of a tag name, in bytes (one byte is reserved for the terminator)
pub const TAG_NAME_MAX: usize = NAME_FIELD_SIZE - 1;

#[cfg(test)]
mod status_test;
#[cfg(test)]
mod value_test;
