//! Tests for message types.

use super::*;

#[test]
fn test_queue_name_validation() {
    assert!(QueueName::new("APP.REQUEST.QUEUE".to_string()).is_ok());
    assert!(QueueName::new("SYSTEM/ADMIN%1_x".to_string()).is_ok());
    assert!(QueueName::new("Q".to_string()).is_ok());

    assert!(QueueName::new("".to_string()).is_err());
    assert!(QueueName::new("Q".repeat(49)).is_err());
    assert!(QueueName::new("has space".to_string()).is_err());
    assert!(QueueName::new("dash-name".to_string()).is_err());
}

#[test]
fn test_identifier_from_hex() {
    let id = MessageIdentifier::from_hex("0A0B", "message_id").unwrap();
    assert_eq!(id.as_bytes(), &[0x0a, 0x0b]);
    assert_eq!(id.to_hex(), "0a0b");
}

#[test]
fn test_identifier_rejects_bad_hex() {
    let result = MessageIdentifier::from_hex("zz", "message_id");
    assert!(matches!(
        result,
        Err(ValidationError::InvalidFormat { ref field, .. }) if field == "message_id"
    ));

    // odd length
    assert!(MessageIdentifier::from_hex("ABC", "message_id").is_err());
}

#[test]
fn test_identifier_rejects_oversized_value() {
    let result = MessageIdentifier::from_bytes(vec![1u8; 25], "correlation_id");
    assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));

    assert!(MessageIdentifier::from_bytes(vec![1u8; 24], "correlation_id").is_ok());
}

#[test]
fn test_generated_identifier_is_full_width_and_unique() {
    let a = MessageIdentifier::generate();
    let b = MessageIdentifier::generate();
    assert_eq!(a.as_bytes().len(), IDENTIFIER_LENGTH);
    assert_ne!(a, b);
}

#[test]
fn test_normalize_is_idempotent() {
    let from_hex = IdentifierInput::from("0A0B").normalize("message_id").unwrap();
    let from_binary = IdentifierInput::from(vec![0x0au8, 0x0b])
        .normalize("message_id")
        .unwrap();
    assert_eq!(from_hex, from_binary);

    let again = IdentifierInput::from(from_hex.clone().unwrap())
        .normalize("message_id")
        .unwrap();
    assert_eq!(again, from_hex);
}

#[test]
fn test_normalize_treats_empty_as_absent() {
    assert_eq!(IdentifierInput::from("").normalize("message_id"), Ok(None));
    assert_eq!(IdentifierInput::from("  ").normalize("message_id"), Ok(None));
    assert_eq!(
        IdentifierInput::from(Vec::<u8>::new()).normalize("message_id"),
        Ok(None)
    );
}

#[test]
fn test_browse_limit_bounds() {
    assert_eq!(BrowseLimit::new(1).unwrap().get(), 1);
    assert_eq!(BrowseLimit::new(100).unwrap().get(), 100);

    for value in [0, 101, -1, i64::MAX, i64::MIN] {
        assert!(
            matches!(BrowseLimit::new(value), Err(ValidationError::OutOfRange { .. })),
            "{} should be rejected",
            value
        );
    }
}

#[test]
fn test_identifier_serializes_as_hex() {
    let id = MessageIdentifier::from_hex("c3d4", "message_id").unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"c3d4\"");

    let parsed: MessageIdentifier = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn test_message_record_accessors() {
    let descriptor = MessageDescriptor::new(MessageIdentifier::from_hex("01", "id").unwrap())
        .with_correlation_id(MessageIdentifier::from_hex("02", "id").unwrap())
        .with_sequence(7);
    let record = MessageRecord::new(Bytes::from_static(b"hello"), descriptor);

    assert_eq!(record.payload_text(), Some("hello"));
    assert_eq!(record.message_id().to_hex(), "01");
    assert_eq!(record.correlation_id().map(|c| c.to_hex()), Some("02".to_string()));
    assert_eq!(record.descriptor().format, FORMAT_STRING);
    assert_eq!(record.descriptor().sequence, Some(7));
}

#[test]
fn test_payload_text_rejects_invalid_utf8() {
    let record = MessageRecord::new(
        Bytes::from_static(&[0xff, 0xfe]),
        MessageDescriptor::new(MessageIdentifier::generate()),
    );
    assert_eq!(record.payload_text(), None);
}
