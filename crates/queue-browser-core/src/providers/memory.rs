//! In-memory message source for testing and development.
//!
//! This module provides a fully functional in-process source that:
//! - Keeps messages per queue in arrival order
//! - Gives every open handle its own non-destructive browse cursor
//! - Applies message-id / correlation-id match criteria
//! - Reports exhaustion as soon as no matching message remains
//!
//! Nothing arrives while a get call waits, so the wait interval is never
//! slept on.

use crate::error::SourceError;
use crate::message::{MessageRecord, QueueName, Timestamp};
use crate::source::{BrowseHandle, GetOptions, GetOutcome, MessageSource};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use tracing::debug;

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

const PROVIDER_NAME: &str = "memory";

// ============================================================================
// Internal Storage Structures
// ============================================================================

/// Thread-safe storage for all queues
#[derive(Default)]
struct QueueStorage {
    queues: HashMap<QueueName, InMemoryQueue>,
}

/// Internal state for a single queue
#[derive(Default)]
struct InMemoryQueue {
    /// Messages in arrival order
    messages: VecDeque<StoredMessage>,
    next_sequence: u64,
}

impl InMemoryQueue {
    fn push(&mut self, record: MessageRecord) {
        self.next_sequence += 1;
        let sequence = record.descriptor().sequence.unwrap_or(self.next_sequence);

        let mut descriptor = record.descriptor().clone().with_sequence(sequence);
        if descriptor.put_at.is_none() {
            descriptor = descriptor.with_put_at(Timestamp::now());
        }

        self.messages.push_back(StoredMessage {
            position: self.next_sequence,
            record: MessageRecord::new(record.payload().clone(), descriptor),
        });
    }
}

/// A message stored in the queue with its arrival position
struct StoredMessage {
    position: u64,
    record: MessageRecord,
}

fn lock_poisoned() -> SourceError {
    SourceError::ProviderError {
        provider: PROVIDER_NAME.to_string(),
        code: "lock_poisoned".to_string(),
        message: "queue storage lock poisoned".to_string(),
    }
}

// ============================================================================
// InMemoryMessageSource
// ============================================================================

/// In-memory message source implementation
#[derive(Clone, Default)]
pub struct InMemoryMessageSource {
    storage: Arc<RwLock<QueueStorage>>,
}

impl InMemoryMessageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load fixture messages onto a queue, creating it if needed
    ///
    /// Records without a sequence number are numbered by arrival.
    pub fn seed(
        &self,
        queue: &QueueName,
        records: impl IntoIterator<Item = MessageRecord>,
    ) -> Result<(), SourceError> {
        let mut storage = self.storage.write().map_err(|_| lock_poisoned())?;
        let target = storage.queues.entry(queue.clone()).or_default();

        let before = target.messages.len();
        for record in records {
            target.push(record);
        }

        debug!(
            queue = %queue,
            added = target.messages.len() - before,
            depth = target.messages.len(),
            "Seeded in-memory queue"
        );
        Ok(())
    }

    /// Number of messages on a queue, `None` if the queue does not exist
    pub fn queue_depth(&self, queue: &QueueName) -> Option<usize> {
        let storage = self.storage.read().ok()?;
        storage.queues.get(queue).map(|q| q.messages.len())
    }
}

#[async_trait]
impl MessageSource for InMemoryMessageSource {
    async fn open(&self, queue: &QueueName) -> Result<Box<dyn BrowseHandle>, SourceError> {
        let storage = self.storage.read().map_err(|_| lock_poisoned())?;
        if !storage.queues.contains_key(queue) {
            return Err(SourceError::QueueNotFound {
                queue_name: queue.to_string(),
            });
        }

        Ok(Box::new(InMemoryBrowseHandle {
            storage: Arc::clone(&self.storage),
            queue: queue.clone(),
            last_position: 0,
        }))
    }

    fn source_name(&self) -> &str {
        PROVIDER_NAME
    }
}

// ============================================================================
// InMemoryBrowseHandle
// ============================================================================

/// Open handle with a private browse cursor
pub struct InMemoryBrowseHandle {
    storage: Arc<RwLock<QueueStorage>>,
    queue: QueueName,
    /// Arrival position of the last browsed message; 0 before the first read
    last_position: u64,
}

impl InMemoryBrowseHandle {
    fn browse_next(&mut self, options: &GetOptions) -> Result<Option<MessageRecord>, SourceError> {
        let storage = self.storage.read().map_err(|_| lock_poisoned())?;
        let queue = storage
            .queues
            .get(&self.queue)
            .ok_or_else(|| SourceError::QueueNotFound {
                queue_name: self.queue.to_string(),
            })?;

        let found = queue
            .messages
            .iter()
            .find(|m| m.position > self.last_position && options.criteria.matches(&m.record));

        Ok(found.map(|m| {
            self.last_position = m.position;
            m.record.clone()
        }))
    }
}

#[async_trait]
impl BrowseHandle for InMemoryBrowseHandle {
    async fn get_next(&mut self, options: &GetOptions) -> GetOutcome {
        match self.browse_next(options) {
            Ok(Some(record)) => GetOutcome::Matched(record),
            Ok(None) => GetOutcome::Exhausted,
            Err(e) => GetOutcome::Failed(e),
        }
    }
}
