//! Tests for error types.

use super::*;

#[test]
fn test_error_transience() {
    assert!(SourceError::ConnectionFailed {
        message: "network error".to_string(),
    }
    .is_transient());

    assert!(SourceError::Timeout {
        duration: Duration::seconds(5),
    }
    .is_transient());

    assert!(!SourceError::QueueNotFound {
        queue_name: "APP.REQUEST".to_string(),
    }
    .is_transient());

    assert!(!SourceError::PermissionDenied {
        operation: "browse".to_string(),
    }
    .is_transient());
}

#[test]
fn test_descriptor_from_source_error() {
    let error = SourceError::ProviderError {
        provider: "mq".to_string(),
        code: "2009".to_string(),
        message: "connection broken".to_string(),
    };

    let descriptor = ErrorDescriptor::from(&error);
    assert_eq!(descriptor.kind, "provider_error");
    assert!(descriptor.message.contains("2009"));
    assert!(descriptor.message.contains("connection broken"));
    assert!(descriptor.transient);
    assert_eq!(
        descriptor.to_string(),
        format!("provider_error: {}", error)
    );
}

#[test]
fn test_browse_error_wraps_validation() {
    let error: BrowseError = ValidationError::OutOfRange {
        field: "limit".to_string(),
        message: "must be between 1 and 100".to_string(),
    }
    .into();

    assert!(matches!(error, BrowseError::InvalidArgument(_)));
    assert!(error.to_string().starts_with("Invalid argument"));
}
