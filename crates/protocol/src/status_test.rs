//! Tests for status code wire bytes

use crate::status::StatusCode;

const ALL: [StatusCode; 13] = [
    StatusCode::Ok,
    StatusCode::BufferTooSmall,
    StatusCode::WouldBlock,
    StatusCode::Interrupted,
    StatusCode::TypeMismatch,
    StatusCode::StaleTimestamp,
    StatusCode::TransferFault,
    StatusCode::NameTaken,
    StatusCode::NameInvalid,
    StatusCode::DtypeInvalid,
    StatusCode::CapacityExhausted,
    StatusCode::AdminBusy,
    StatusCode::OutOfMemory,
];

#[test]
fn test_round_trip() {
    for code in ALL {
        assert_eq!(StatusCode::from_u8(code.as_u8()).unwrap(), code);
    }
}

#[test]
fn test_ok_is_zero() {
    assert_eq!(StatusCode::Ok.as_u8(), 0);
    assert!(StatusCode::Ok.is_ok());
}

#[test]
fn test_codes_are_distinct() {
    let mut seen = std::collections::HashSet::new();
    for code in ALL {
        assert!(seen.insert(code.as_u8()), "duplicate wire byte for {code:?}");
    }
}

#[test]
fn test_unknown_byte_fails() {
    assert!(StatusCode::from_u8(13).is_err());
    assert!(StatusCode::from_u8(255).is_err());
}

#[test]
fn test_only_ok_is_ok() {
    for code in ALL {
        assert_eq!(code.is_ok(), code == StatusCode::Ok);
    }
}
