//! Queue snapshot files used to seed an in-memory source.
//!
//! ```json
//! {
//!   "queues": {
//!     "APP.REQUEST": [
//!       { "message_id": "0a0b", "correlation_id": "ff", "payload": "hello" },
//!       { "payload_hex": "00ff10", "format": "MQBIN" }
//!     ]
//!   }
//! }
//! ```

use bytes::Bytes;
use queue_browser_core::{
    InMemoryMessageSource, MessageDescriptor, MessageIdentifier, MessageRecord, QueueName,
    SourceError, ValidationError,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;

/// Errors while loading or applying a snapshot
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid queue '{queue}' in snapshot: {source}")]
    InvalidQueue {
        queue: String,
        source: ValidationError,
    },

    #[error("Invalid message {index} on queue '{queue}': {message}")]
    InvalidMessage {
        queue: String,
        index: usize,
        message: String,
    },

    #[error("Failed to seed source: {0}")]
    Source(#[from] SourceError),
}

/// Contents of a snapshot file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub queues: BTreeMap<String, Vec<SnapshotMessage>>,
}

/// One message entry in a snapshot
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotMessage {
    /// Hex; generated when absent
    pub message_id: Option<String>,
    /// Hex
    pub correlation_id: Option<String>,
    pub format: Option<String>,
    pub sequence: Option<u64>,
    /// UTF-8 payload
    pub payload: Option<String>,
    /// Hex payload, for binary content
    pub payload_hex: Option<String>,
}

impl SnapshotMessage {
    fn to_record(&self) -> Result<MessageRecord, String> {
        let payload = match (&self.payload, &self.payload_hex) {
            (Some(_), Some(_)) => {
                return Err("only one of 'payload' and 'payload_hex' may be set".to_string())
            }
            (Some(text), None) => Bytes::from(text.clone()),
            (None, Some(hex_text)) => Bytes::from(
                hex::decode(hex_text.trim()).map_err(|e| format!("payload_hex: {}", e))?,
            ),
            (None, None) => Bytes::new(),
        };

        let message_id = match &self.message_id {
            Some(text) => {
                MessageIdentifier::from_hex(text, "message_id").map_err(|e| e.to_string())?
            }
            None => MessageIdentifier::generate(),
        };

        let mut descriptor = MessageDescriptor::new(message_id);
        if let Some(text) = &self.correlation_id {
            descriptor = descriptor.with_correlation_id(
                MessageIdentifier::from_hex(text, "correlation_id").map_err(|e| e.to_string())?,
            );
        }
        if let Some(format) = &self.format {
            descriptor = descriptor.with_format(format.clone());
        }
        if let Some(sequence) = self.sequence {
            descriptor = descriptor.with_sequence(sequence);
        }

        Ok(MessageRecord::new(payload, descriptor))
    }
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = std::fs::read_to_string(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load every queue into the source, returning the number of messages
    pub fn seed(&self, source: &InMemoryMessageSource) -> Result<usize, SnapshotError> {
        let mut total = 0;

        for (name, messages) in &self.queues {
            let queue =
                QueueName::new(name.clone()).map_err(|source| SnapshotError::InvalidQueue {
                    queue: name.clone(),
                    source,
                })?;

            let records = messages
                .iter()
                .enumerate()
                .map(|(index, m)| {
                    m.to_record().map_err(|message| SnapshotError::InvalidMessage {
                        queue: name.clone(),
                        index,
                        message,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            total += records.len();
            source.seed(&queue, records)?;
        }

        info!(
            queues = self.queues.len(),
            messages = total,
            "Loaded queue snapshot"
        );
        Ok(total)
    }
}
