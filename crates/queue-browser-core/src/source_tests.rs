//! Tests for source options and match criteria.

use super::*;
use crate::message::MessageDescriptor;
use bytes::Bytes;

fn id(hex: &str) -> MessageIdentifier {
    MessageIdentifier::from_hex(hex, "id").unwrap()
}

fn record(message_id: &str, correlation_id: Option<&str>) -> MessageRecord {
    let mut descriptor = MessageDescriptor::new(id(message_id));
    if let Some(correlation_id) = correlation_id {
        descriptor = descriptor.with_correlation_id(id(correlation_id));
    }
    MessageRecord::new(Bytes::from_static(b"body"), descriptor)
}

#[test]
fn test_match_mode_selection() {
    assert_eq!(MatchCriteria::any().mode(), MatchMode::None);
    assert_eq!(
        MatchCriteria::new(Some(id("01")), None).mode(),
        MatchMode::MessageId
    );
    assert_eq!(
        MatchCriteria::new(None, Some(id("02"))).mode(),
        MatchMode::CorrelationId
    );
    assert_eq!(
        MatchCriteria::new(Some(id("01")), Some(id("02"))).mode(),
        MatchMode::MessageIdAndCorrelationId
    );
}

#[test]
fn test_any_criteria_matches_everything() {
    assert!(MatchCriteria::any().matches(&record("01", None)));
    assert!(MatchCriteria::any().matches(&record("02", Some("03"))));
}

#[test]
fn test_message_id_match_is_exact() {
    let criteria = MatchCriteria::new(Some(id("0a0b")), None);
    assert!(criteria.matches(&record("0a0b", None)));
    assert!(!criteria.matches(&record("0a0b00", None)));
    assert!(!criteria.matches(&record("0a", None)));
}

#[test]
fn test_correlation_id_requires_present_value() {
    let criteria = MatchCriteria::new(None, Some(id("ff")));
    assert!(criteria.matches(&record("01", Some("ff"))));
    assert!(!criteria.matches(&record("01", None)));
    assert!(!criteria.matches(&record("01", Some("fe"))));
}

#[test]
fn test_combined_criteria_requires_both() {
    let criteria = MatchCriteria::new(Some(id("01")), Some(id("ff")));
    assert!(criteria.matches(&record("01", Some("ff"))));
    assert!(!criteria.matches(&record("01", Some("fe"))));
    assert!(!criteria.matches(&record("02", Some("ff"))));
}

#[test]
fn test_get_options_report_match_mode() {
    let options = GetOptions::new(
        Duration::milliseconds(100),
        MatchCriteria::new(None, Some(id("ff"))),
    );
    assert_eq!(options.match_mode(), MatchMode::CorrelationId);
    assert_eq!(options.wait_interval, Duration::milliseconds(100));
}
