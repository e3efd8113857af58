//! Message source traits and per-read options.
//!
//! A [`MessageSource`] opens queues for browsing; the returned
//! [`BrowseHandle`] owns a browse cursor and answers get-next calls with a
//! [`GetOutcome`]. Reads never remove messages from the queue.

use crate::error::SourceError;
use crate::message::{MessageIdentifier, MessageRecord, QueueName};
use async_trait::async_trait;
use chrono::Duration;
use serde::Serialize;

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;

/// Which descriptor fields a read must match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    None,
    MessageId,
    CorrelationId,
    MessageIdAndCorrelationId,
}

/// Exact-match filter applied to a single read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchCriteria {
    pub message_id: Option<MessageIdentifier>,
    pub correlation_id: Option<MessageIdentifier>,
}

impl MatchCriteria {
    /// Criteria that accept any message
    pub fn any() -> Self {
        Self::default()
    }

    pub fn new(
        message_id: Option<MessageIdentifier>,
        correlation_id: Option<MessageIdentifier>,
    ) -> Self {
        Self {
            message_id,
            correlation_id,
        }
    }

    pub fn mode(&self) -> MatchMode {
        match (&self.message_id, &self.correlation_id) {
            (Some(_), Some(_)) => MatchMode::MessageIdAndCorrelationId,
            (Some(_), None) => MatchMode::MessageId,
            (None, Some(_)) => MatchMode::CorrelationId,
            (None, None) => MatchMode::None,
        }
    }

    /// Check whether a retrieved message satisfies these criteria
    pub fn matches(&self, record: &MessageRecord) -> bool {
        let message_id_ok = self
            .message_id
            .as_ref()
            .map_or(true, |id| record.message_id() == id);
        let correlation_id_ok = self
            .correlation_id
            .as_ref()
            .map_or(true, |id| record.correlation_id() == Some(id));
        message_id_ok && correlation_id_ok
    }
}

/// Options for one get-next call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOptions {
    /// Longest time the source may wait for a matching message
    pub wait_interval: Duration,
    pub criteria: MatchCriteria,
}

impl GetOptions {
    pub fn new(wait_interval: Duration, criteria: MatchCriteria) -> Self {
        Self {
            wait_interval,
            criteria,
        }
    }

    pub fn match_mode(&self) -> MatchMode {
        self.criteria.mode()
    }
}

/// Result of a single get-next call
#[derive(Debug, Clone)]
pub enum GetOutcome {
    /// A message satisfying the criteria
    Matched(MessageRecord),
    /// No matching message became available within the wait interval
    Exhausted,
    /// Any other failure
    Failed(SourceError),
}

/// Interface implemented by concrete message sources
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Open a queue for browsing and return a handle with a fresh cursor
    async fn open(&self, queue: &QueueName) -> Result<Box<dyn BrowseHandle>, SourceError>;

    /// Short name used in logs and error descriptors
    fn source_name(&self) -> &str;
}

/// Open queue handle owning a browse cursor
#[async_trait]
pub trait BrowseHandle: Send {
    /// Advance the cursor to the next message that satisfies the options
    async fn get_next(&mut self, options: &GetOptions) -> GetOutcome;
}
