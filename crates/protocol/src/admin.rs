//! The creation record accepted by the master endpoint
//!
//! Tag creation is a fixed-size write to the master endpoint: a one-byte
//! action (only `+` is defined), a one-byte data type discriminant, and a
//! 256-byte zero-padded, null-terminated name field. Short writes are
//! rejected outright.

use bytes::{Buf, BufMut};

use crate::dtype::DataType;
use crate::name::validate_tag_name;
use crate::{ProtocolError, Result, NAME_FIELD_SIZE};

/// The only defined creation action: add a tag
pub const CREATE_ACTION_ADD: u8 = b'+';

/// Size of an encoded creation record, in bytes
pub const CREATE_REQUEST_SIZE: usize = 2 + NAME_FIELD_SIZE;

/// A request to create one tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    /// Data type of the new tag
    pub dtype: DataType,
    /// Name of the new tag
    pub name: String,
}

impl CreateRequest {
    /// Build a creation request, validating the name and type up front
    pub fn new(dtype: DataType, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_tag_name(&name)?;
        if !dtype.is_creatable() {
            return Err(ProtocolError::InvalidDataType(dtype.as_u8()));
        }
        Ok(Self { dtype, name })
    }

    /// Encode into a wire buffer
    ///
    /// Appends exactly [`CREATE_REQUEST_SIZE`] bytes.
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(CREATE_ACTION_ADD);
        buf.put_u8(self.dtype.as_u8());

        let mut name_field = [0u8; NAME_FIELD_SIZE];
        name_field[..self.name.len()].copy_from_slice(self.name.as_bytes());
        buf.put_slice(&name_field);
    }

    /// Encode into a fresh fixed-size array
    pub fn encode_to_array(&self) -> [u8; CREATE_REQUEST_SIZE] {
        let mut out = [0u8; CREATE_REQUEST_SIZE];
        let mut cursor = &mut out[..];
        self.encode(&mut cursor);
        out
    }

    /// Decode from a wire buffer
    ///
    /// Consumes exactly [`CREATE_REQUEST_SIZE`] bytes. Validation order
    /// is part of the contract and matches the registry: action byte,
    /// then the naming rules, then the type discriminant; the first
    /// violated condition is reported.
    pub fn decode<B: Buf>(buf: &mut B) -> Result<Self> {
        if buf.remaining() < CREATE_REQUEST_SIZE {
            return Err(ProtocolError::too_short(
                CREATE_REQUEST_SIZE,
                buf.remaining(),
            ));
        }

        let action = buf.get_u8();
        if action != CREATE_ACTION_ADD {
            return Err(ProtocolError::InvalidAction(action));
        }

        let dtype_raw = buf.get_u8();

        let mut name_field = [0u8; NAME_FIELD_SIZE];
        buf.copy_to_slice(&mut name_field);

        // The last byte of the field is reserved for the terminator.
        if name_field[NAME_FIELD_SIZE - 1] != 0 {
            return Err(ProtocolError::NameNotTerminated);
        }
        let len = name_field
            .iter()
            .position(|&b| b == 0)
            .expect("field is null-terminated");
        let name = std::str::from_utf8(&name_field[..len])
            .map_err(|_| ProtocolError::InvalidName {
                reason: "name is not valid UTF-8",
            })?
            .to_string();
        validate_tag_name(&name)?;

        let dtype =
            DataType::from_u8(dtype_raw).ok_or(ProtocolError::InvalidDataType(dtype_raw))?;

        Ok(Self { dtype, name })
    }
}
