//! Tests for browser configuration.

use super::*;

#[test]
fn test_defaults() {
    let config = BrowserConfig::default();
    assert_eq!(config.wait_interval_ms, 5000);
    assert!(!config.combine_limit_and_filter);
    assert!(config.validate().is_ok());
    assert_eq!(config.wait_interval(), Duration::seconds(5));
}

#[test]
fn test_wait_interval_bounds() {
    assert!(BrowserConfig::default()
        .with_wait_interval_ms(0)
        .validate()
        .is_err());
    assert!(BrowserConfig::default()
        .with_wait_interval_ms(MAX_WAIT_INTERVAL_MS + 1)
        .validate()
        .is_err());
    assert!(BrowserConfig::default()
        .with_wait_interval_ms(1)
        .validate()
        .is_ok());
}

#[test]
fn test_out_of_range_interval_is_invalid_configuration() {
    let error = BrowserConfig::default()
        .with_wait_interval_ms(0)
        .validate()
        .unwrap_err();

    let ConfigurationError::Invalid { message } = error;
    assert!(message.contains("wait_interval_ms"));
}

#[test]
fn test_partial_deserialization_uses_defaults() {
    let config: BrowserConfig =
        serde_json::from_str(r#"{ "wait_interval_ms": 250 }"#).unwrap();
    assert_eq!(config.wait_interval_ms, 250);
    assert!(!config.combine_limit_and_filter);
}
