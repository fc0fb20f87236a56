//! Text forms for the relay boundary
//!
//! Two encodings are defined for stream consumers. The machine form is
//! `<quality_u16> <timestamp_u64> <value>` with every field numeric except
//! string payloads; parsing it requires the tag's data type out of band.
//! The human form renders the data type by name, timestamps as
//! `YYYY-MM-DD HH:MM:SS.mmm` (UTC) and the quality by level name. Both
//! forms round-trip for every data type and every representable value:
//! floating point uses Rust's shortest round-trip formatting rather than
//! a fixed precision, and string payload bytes outside printable ASCII
//! are escaped reversibly rather than substituted.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::dtype::DataType;
use crate::quality::{Quality, QualityLevel};
use crate::record::TagRecord;
use crate::value::TagValue;
use crate::{ProtocolError, Result};

/// Format of the human-readable timestamp form, to millisecond precision
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

// ============================================================================
// Timestamps
// ============================================================================

/// Render milliseconds-since-epoch as `YYYY-MM-DD HH:MM:SS.mmm` (UTC)
pub fn format_timestamp(millis: u64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis as i64) {
        Some(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
        // Out of chrono's range; fall back to the raw count.
        None => millis.to_string(),
    }
}

/// Parse the human-readable timestamp form back to milliseconds-since-epoch
pub fn parse_timestamp(s: &str) -> Result<u64> {
    let naive = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|_| ProtocolError::ParseTimestamp(s.to_string()))?;
    let millis = naive.and_utc().timestamp_millis();
    u64::try_from(millis).map_err(|_| ProtocolError::ParseTimestamp(s.to_string()))
}

// ============================================================================
// Values
// ============================================================================

/// Render a value in the machine form
///
/// Numeric for every type. String payloads are byte blobs with no
/// character-set constraint, so they are emitted with padding stripped
/// and every byte outside printable ASCII escaped as `\xNN` (backslash
/// itself as `\\`); the escape is lossless and undone by the parser.
pub fn format_machine_value(value: &TagValue) -> String {
    match *value {
        TagValue::Int8(v) => v.to_string(),
        TagValue::Uint8(v) => v.to_string(),
        TagValue::Int16(v) => v.to_string(),
        TagValue::Uint16(v) => v.to_string(),
        TagValue::Int32(v) => v.to_string(),
        TagValue::Uint32(v) => v.to_string(),
        TagValue::Int64(v) => v.to_string(),
        TagValue::Uint64(v) => v.to_string(),
        TagValue::Real32(v) => v.to_string(),
        TagValue::Real64(v) => v.to_string(),
        TagValue::Timestamp(v) => v.to_string(),
        TagValue::String(_) => {
            escape_string_bytes(value.string_bytes().expect("string value"))
        }
    }
}

/// Escape a string payload for the text forms
fn escape_string_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7E => out.push(b as char),
            _ => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out
}

/// Undo [`escape_string_bytes`]
///
/// Bytes outside the escape syntax pass through verbatim, so unescaped
/// input round-trips too. Returns `None` on a truncated or malformed
/// escape.
fn unescape_string_bytes(s: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(s.len());
    let mut input = s.bytes();
    while let Some(b) = input.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }
        match input.next()? {
            b'\\' => out.push(b'\\'),
            b'x' => {
                let hi = (input.next()? as char).to_digit(16)?;
                let lo = (input.next()? as char).to_digit(16)?;
                out.push((hi * 16 + lo) as u8);
            }
            _ => return None,
        }
    }
    Some(out)
}

/// Render a value in the human form
///
/// Same as the machine form except timestamp payloads appear as formatted
/// dates.
pub fn format_human_value(value: &TagValue) -> String {
    match *value {
        TagValue::Timestamp(v) => format_timestamp(v),
        _ => format_machine_value(value),
    }
}

fn parse_err(dtype: DataType, input: &str) -> ProtocolError {
    ProtocolError::ParseValue {
        dtype: dtype.as_str(),
        input: input.to_string(),
    }
}

/// Parse a machine-form value of the given type
pub fn parse_machine_value(dtype: DataType, s: &str) -> Result<TagValue> {
    let v = match dtype {
        DataType::Invalid => return Err(ProtocolError::InvalidDataType(dtype.as_u8())),
        DataType::Int8 => TagValue::Int8(s.parse().map_err(|_| parse_err(dtype, s))?),
        DataType::Uint8 => TagValue::Uint8(s.parse().map_err(|_| parse_err(dtype, s))?),
        DataType::Int16 => TagValue::Int16(s.parse().map_err(|_| parse_err(dtype, s))?),
        DataType::Uint16 => TagValue::Uint16(s.parse().map_err(|_| parse_err(dtype, s))?),
        DataType::Int32 => TagValue::Int32(s.parse().map_err(|_| parse_err(dtype, s))?),
        DataType::Uint32 => TagValue::Uint32(s.parse().map_err(|_| parse_err(dtype, s))?),
        DataType::Int64 => TagValue::Int64(s.parse().map_err(|_| parse_err(dtype, s))?),
        DataType::Uint64 => TagValue::Uint64(s.parse().map_err(|_| parse_err(dtype, s))?),
        DataType::Real32 => TagValue::Real32(s.parse().map_err(|_| parse_err(dtype, s))?),
        DataType::Real64 => TagValue::Real64(s.parse().map_err(|_| parse_err(dtype, s))?),
        DataType::Timestamp => TagValue::Timestamp(s.parse().map_err(|_| parse_err(dtype, s))?),
        DataType::String => {
            let bytes = unescape_string_bytes(s).ok_or_else(|| parse_err(dtype, s))?;
            TagValue::string(&bytes).map_err(|_| parse_err(dtype, s))?
        }
    };
    Ok(v)
}

/// Parse a human-form value of the given type
pub fn parse_human_value(dtype: DataType, s: &str) -> Result<TagValue> {
    match dtype {
        DataType::Timestamp => Ok(TagValue::Timestamp(parse_timestamp(s)?)),
        _ => parse_machine_value(dtype, s),
    }
}

// ============================================================================
// Quality
// ============================================================================

/// Parse the human quality form `LEVEL (vendor)` produced by
/// [`Quality::display`]
pub fn parse_human_quality(s: &str) -> Result<Quality> {
    let malformed = || ProtocolError::MalformedText("quality is not `LEVEL (vendor)`");

    let (level_str, rest) = s.split_once(' ').ok_or_else(malformed)?;
    let level = match level_str {
        "UNCERTAIN" => QualityLevel::Uncertain,
        "BAD" => QualityLevel::Bad,
        "DISCONNECTED" => QualityLevel::Disconnected,
        "GOOD" => QualityLevel::Good,
        _ => return Err(malformed()),
    };
    let vendor: u16 = rest
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .and_then(|r| r.parse().ok())
        .ok_or_else(malformed)?;

    Ok(Quality::new(level, vendor))
}

// ============================================================================
// Whole records (machine form)
// ============================================================================

/// Render a record in the machine form: `<quality> <timestamp> <value>`
pub fn format_machine_record(record: &TagRecord) -> String {
    format!(
        "{} {} {}",
        record.quality.raw(),
        record.timestamp,
        format_machine_value(&record.value)
    )
}

/// Parse a machine-form record of the given type
///
/// The value field is everything after the second space, so string
/// payloads may contain spaces.
pub fn parse_machine_record(dtype: DataType, s: &str) -> Result<TagRecord> {
    let mut parts = s.splitn(3, ' ');
    let quality_str = parts
        .next()
        .ok_or(ProtocolError::MalformedText("missing quality field"))?;
    let timestamp_str = parts
        .next()
        .ok_or(ProtocolError::MalformedText("missing timestamp field"))?;
    let value_str = parts
        .next()
        .ok_or(ProtocolError::MalformedText("missing value field"))?;

    let quality: u16 = quality_str
        .parse()
        .map_err(|_| ProtocolError::MalformedText("quality is not a u16"))?;
    let timestamp: u64 = timestamp_str
        .parse()
        .map_err(|_| ProtocolError::MalformedText("timestamp is not a u64"))?;
    let value = parse_machine_value(dtype, value_str)?;

    Ok(TagRecord {
        value,
        timestamp,
        quality: Quality::from_raw(quality),
    })
}
