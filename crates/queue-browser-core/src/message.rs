//! Message types for browse operations including core domain identifiers.

use crate::error::ValidationError;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Width of message and correlation identifiers on the transport
pub const IDENTIFIER_LENGTH: usize = 24;

/// Format tag for character-string payloads
pub const FORMAT_STRING: &str = "MQSTR";

// ============================================================================
// Core Domain Identifiers
// ============================================================================

/// Validated queue name with length and character restrictions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueName(String);

impl QueueName {
    /// Maximum queue name length accepted by the transport
    pub const MAX_LENGTH: usize = 48;

    /// Create new queue name with validation
    pub fn new(name: String) -> Result<Self, ValidationError> {
        if name.is_empty() || name.len() > Self::MAX_LENGTH {
            return Err(ValidationError::OutOfRange {
                field: "queue_name".to_string(),
                message: format!("must be 1-{} characters", Self::MAX_LENGTH),
            });
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '/' | '_' | '%'))
        {
            return Err(ValidationError::InvalidFormat {
                field: "queue_name".to_string(),
                message: "only ASCII alphanumeric, '.', '/', '_' and '%' allowed".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Get queue name as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueueName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QueueName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// Binary message or correlation identifier
///
/// Serialises as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageIdentifier(Bytes);

impl MessageIdentifier {
    /// Create identifier from raw bytes
    pub fn from_bytes(bytes: impl Into<Bytes>, field: &str) -> Result<Self, ValidationError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ValidationError::Required {
                field: field.to_string(),
            });
        }

        if bytes.len() > IDENTIFIER_LENGTH {
            return Err(ValidationError::OutOfRange {
                field: field.to_string(),
                message: format!(
                    "identifier is {} bytes, maximum is {}",
                    bytes.len(),
                    IDENTIFIER_LENGTH
                ),
            });
        }

        Ok(Self(bytes))
    }

    /// Decode identifier from hex text
    pub fn from_hex(text: &str, field: &str) -> Result<Self, ValidationError> {
        let decoded = hex::decode(text.trim()).map_err(|e| ValidationError::InvalidFormat {
            field: field.to_string(),
            message: format!("not valid hex: {}", e),
        })?;
        Self::from_bytes(decoded, field)
    }

    /// Generate a random full-width identifier
    pub fn generate() -> Self {
        let mut bytes = Vec::with_capacity(IDENTIFIER_LENGTH);
        bytes.extend_from_slice(uuid::Uuid::new_v4().as_bytes());
        bytes.extend_from_slice(&uuid::Uuid::new_v4().as_bytes()[..IDENTIFIER_LENGTH - 16]);
        Self(Bytes::from(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex rendering
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl std::fmt::Display for MessageIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for MessageIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_hex().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MessageIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text, "identifier").map_err(serde::de::Error::custom)
    }
}

/// Identifier as supplied by a caller, before normalisation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierInput {
    /// Already-binary identifier
    Binary(Bytes),
    /// Hex-encoded identifier text
    Hex(String),
}

impl IdentifierInput {
    /// Normalise to a binary identifier
    ///
    /// Empty input is treated as absent. Normalising an already-binary value
    /// leaves it unchanged.
    pub fn normalize(&self, field: &str) -> Result<Option<MessageIdentifier>, ValidationError> {
        match self {
            Self::Binary(bytes) if bytes.is_empty() => Ok(None),
            Self::Binary(bytes) => MessageIdentifier::from_bytes(bytes.clone(), field).map(Some),
            Self::Hex(text) if text.trim().is_empty() => Ok(None),
            Self::Hex(text) => MessageIdentifier::from_hex(text, field).map(Some),
        }
    }
}

impl From<MessageIdentifier> for IdentifierInput {
    fn from(id: MessageIdentifier) -> Self {
        Self::Binary(id.0)
    }
}

impl From<&str> for IdentifierInput {
    fn from(text: &str) -> Self {
        Self::Hex(text.to_string())
    }
}

impl From<Vec<u8>> for IdentifierInput {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Binary(Bytes::from(bytes))
    }
}

/// Validated maximum result count for one retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BrowseLimit(u32);

impl BrowseLimit {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 100;

    /// Create limit from raw caller input
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value < i64::from(Self::MIN) || value > i64::from(Self::MAX) {
            return Err(ValidationError::OutOfRange {
                field: "limit".to_string(),
                message: format!(
                    "{} is not between {} and {}",
                    value,
                    Self::MIN,
                    Self::MAX
                ),
            });
        }

        Ok(Self(value as u32))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for BrowseLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp wrapper for consistent time handling
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create timestamp for current time
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create timestamp from DateTime
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get underlying DateTime
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dt = s.parse::<DateTime<Utc>>()?;
        Ok(Self::from_datetime(dt))
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Transport-supplied metadata for a retrieved message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDescriptor {
    pub message_id: MessageIdentifier,
    pub correlation_id: Option<MessageIdentifier>,
    pub format: String,
    pub sequence: Option<u64>,
    pub put_at: Option<Timestamp>,
}

impl MessageDescriptor {
    /// Create descriptor with string format and no correlation
    pub fn new(message_id: MessageIdentifier) -> Self {
        Self {
            message_id,
            correlation_id: None,
            format: FORMAT_STRING.to_string(),
            sequence: None,
            put_at: None,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: MessageIdentifier) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn with_format(mut self, format: String) -> Self {
        self.format = format;
        self
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = Some(sequence);
        self
    }

    pub fn with_put_at(mut self, put_at: Timestamp) -> Self {
        self.put_at = Some(put_at);
        self
    }
}

/// One retrieved message: payload plus descriptor
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(with = "bytes_serde")]
    payload: Bytes,
    descriptor: MessageDescriptor,
}

/// Custom serialization for Bytes
mod bytes_serde {
    use base64::{engine::general_purpose, Engine as _};
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = general_purpose::STANDARD.encode(bytes);
        encoded.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        let decoded = general_purpose::STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)?;
        Ok(Bytes::from(decoded))
    }
}

impl MessageRecord {
    pub fn new(payload: Bytes, descriptor: MessageDescriptor) -> Self {
        Self {
            payload,
            descriptor,
        }
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn descriptor(&self) -> &MessageDescriptor {
        &self.descriptor
    }

    pub fn message_id(&self) -> &MessageIdentifier {
        &self.descriptor.message_id
    }

    pub fn correlation_id(&self) -> Option<&MessageIdentifier> {
        self.descriptor.correlation_id.as_ref()
    }

    /// Payload as UTF-8 text, if it is valid UTF-8
    pub fn payload_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
