//! Tag name validation
//!
//! Tag names are 1..=255 bytes from `[A-Za-z0-9._-]`, unique across the
//! registry, and never reused. The same rule is applied by the registry,
//! the master endpoint and clients, so a name that validates anywhere
//! validates everywhere.

use crate::{ProtocolError, Result, TAG_NAME_MAX};

/// Check whether a byte is allowed in a tag name
#[inline]
const fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'-'
}

/// Validate a tag name against the naming rules
///
/// Returns the name unchanged on success so call sites can validate in an
/// expression position.
pub fn validate_tag_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(ProtocolError::InvalidName {
            reason: "name is empty",
        });
    }
    if name.len() > TAG_NAME_MAX {
        return Err(ProtocolError::InvalidName {
            reason: "name exceeds 255 bytes",
        });
    }
    if !name.bytes().all(is_name_byte) {
        return Err(ProtocolError::InvalidName {
            reason: "name contains a character outside [A-Za-z0-9._-]",
        });
    }
    Ok(name)
}
