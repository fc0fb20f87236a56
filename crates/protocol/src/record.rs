//! The value record exchanged on every tag read and write
//!
//! The wire layout mirrors the original exchange structure and its natural
//! alignment: a 16-byte payload area, a little-endian u64 timestamp, a
//! little-endian u16 quality word, a one-byte data type discriminant, and
//! five bytes of padding, 32 bytes in total. Decoders must accept the
//! padding as arbitrary and encoders must zero it.

use bytes::{Buf, BufMut};

use crate::dtype::DataType;
use crate::quality::Quality;
use crate::value::TagValue;
use crate::{ProtocolError, Result, PAYLOAD_SIZE};

/// Size of an encoded value record, in bytes
pub const TAG_RECORD_SIZE: usize = 32;

/// One tag value together with its timestamp and quality
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagRecord {
    /// The payload
    pub value: TagValue,
    /// Milliseconds since the Unix epoch; strictly increases across commits
    pub timestamp: u64,
    /// The 16-bit quality word
    pub quality: Quality,
}

impl TagRecord {
    /// Create a record
    pub fn new(value: TagValue, timestamp: u64, quality: Quality) -> Self {
        Self {
            value,
            timestamp,
            quality,
        }
    }

    /// The initial record of a freshly created tag: zero payload,
    /// UNCERTAIN quality, the given creation timestamp
    ///
    /// Returns `None` for [`DataType::Invalid`].
    pub fn initial(dtype: DataType, timestamp: u64) -> Option<Self> {
        Some(Self {
            value: TagValue::zero(dtype)?,
            timestamp,
            quality: Quality::UNCERTAIN,
        })
    }

    /// Get the data type of this record's payload
    #[inline]
    pub fn dtype(&self) -> DataType {
        self.value.dtype()
    }

    /// Encode into a wire buffer
    ///
    /// Appends exactly [`TAG_RECORD_SIZE`] bytes.
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        let mut payload = [0u8; PAYLOAD_SIZE];
        self.value.encode_payload(&mut payload);

        buf.put_slice(&payload);
        buf.put_u64_le(self.timestamp);
        buf.put_u16_le(self.quality.raw());
        buf.put_u8(self.dtype().as_u8());
        buf.put_slice(&[0u8; 5]);
    }

    /// Encode into a fresh fixed-size array
    pub fn encode_to_array(&self) -> [u8; TAG_RECORD_SIZE] {
        let mut out = [0u8; TAG_RECORD_SIZE];
        let mut cursor = &mut out[..];
        self.encode(&mut cursor);
        out
    }

    /// Decode from a wire buffer
    ///
    /// Consumes exactly [`TAG_RECORD_SIZE`] bytes. Fails on short buffers
    /// and on unknown data type discriminants.
    pub fn decode<B: Buf>(buf: &mut B) -> Result<Self> {
        if buf.remaining() < TAG_RECORD_SIZE {
            return Err(ProtocolError::too_short(TAG_RECORD_SIZE, buf.remaining()));
        }

        let mut payload = [0u8; PAYLOAD_SIZE];
        buf.copy_to_slice(&mut payload);
        let timestamp = buf.get_u64_le();
        let quality = Quality::from_raw(buf.get_u16_le());
        let dtype_raw = buf.get_u8();
        buf.advance(5);

        let dtype =
            DataType::from_u8(dtype_raw).ok_or(ProtocolError::InvalidDataType(dtype_raw))?;
        let value = TagValue::decode_payload(dtype, &payload)?;

        Ok(Self {
            value,
            timestamp,
            quality,
        })
    }
}
