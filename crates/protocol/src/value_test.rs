//! Tests for tag payload values

use crate::dtype::DataType;
use crate::value::TagValue;
use crate::{ProtocolError, PAYLOAD_SIZE, STRING_VALUE_SIZE};

#[test]
fn test_dtype_agreement() {
    assert_eq!(TagValue::Int8(-3).dtype(), DataType::Int8);
    assert_eq!(TagValue::Uint32(7).dtype(), DataType::Uint32);
    assert_eq!(TagValue::Real64(1.5).dtype(), DataType::Real64);
    assert_eq!(
        TagValue::String([0; STRING_VALUE_SIZE]).dtype(),
        DataType::String
    );
}

#[test]
fn test_zero_values() {
    assert_eq!(TagValue::zero(DataType::Invalid), None);
    assert_eq!(TagValue::zero(DataType::Int32), Some(TagValue::Int32(0)));
    assert_eq!(TagValue::zero(DataType::Real32), Some(TagValue::Real32(0.0)));
    assert_eq!(
        TagValue::zero(DataType::String),
        Some(TagValue::String([0; STRING_VALUE_SIZE]))
    );
}

#[test]
fn test_payload_round_trip_all_types() {
    let samples = [
        TagValue::Int8(-7),
        TagValue::Uint8(200),
        TagValue::Int16(-12345),
        TagValue::Uint16(54321),
        TagValue::Int32(-2_000_000_000),
        TagValue::Uint32(4_000_000_000),
        TagValue::Int64(i64::MIN),
        TagValue::Uint64(u64::MAX),
        TagValue::Real32(3.25),
        TagValue::Real64(-1.0e100),
        TagValue::Timestamp(1_600_000_000_123),
        TagValue::string(b"hello").unwrap(),
    ];

    for value in samples {
        let mut payload = [0u8; PAYLOAD_SIZE];
        value.encode_payload(&mut payload);
        let decoded = TagValue::decode_payload(value.dtype(), &payload).unwrap();
        assert_eq!(decoded, value, "round trip failed for {:?}", value.dtype());
    }
}

#[test]
fn test_payload_is_little_endian() {
    let mut payload = [0u8; PAYLOAD_SIZE];
    TagValue::Uint32(0x0102_0304).encode_payload(&mut payload);
    assert_eq!(&payload[..4], &[0x04, 0x03, 0x02, 0x01]);
    assert_eq!(&payload[4..], &[0u8; 12]);
}

#[test]
fn test_encode_zeroes_stale_bytes() {
    let mut payload = [0xAAu8; PAYLOAD_SIZE];
    TagValue::Uint8(1).encode_payload(&mut payload);
    assert_eq!(payload[0], 1);
    assert_eq!(&payload[1..], &[0u8; 15]);
}

#[test]
fn test_string_exactly_sixteen_bytes() {
    let full = [b'x'; STRING_VALUE_SIZE];
    let value = TagValue::string(&full).unwrap();
    assert_eq!(value.string_bytes().unwrap(), &full[..]);

    let mut payload = [0u8; PAYLOAD_SIZE];
    value.encode_payload(&mut payload);
    let decoded = TagValue::decode_payload(DataType::String, &payload).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn test_string_seventeen_bytes_rejected() {
    let too_long = [b'x'; STRING_VALUE_SIZE + 1];
    assert!(matches!(
        TagValue::string(&too_long),
        Err(ProtocolError::StringTooLong { actual: 17, .. })
    ));
}

#[test]
fn test_string_bytes_strips_padding() {
    let value = TagValue::string(b"ab").unwrap();
    assert_eq!(value.string_bytes().unwrap(), b"ab");
    assert_eq!(TagValue::Int8(0).string_bytes(), None);
}

#[test]
fn test_decode_invalid_dtype_fails() {
    let payload = [0u8; PAYLOAD_SIZE];
    assert!(TagValue::decode_payload(DataType::Invalid, &payload).is_err());
}
