//! Common test utilities for queue-browser integration tests
//!
//! This module provides:
//! - A recording wrapper around the in-memory source
//! - Helper functions for seeding queues

use async_trait::async_trait;
use queue_browser_core::{
    BrowseHandle, GetOptions, GetOutcome, InMemoryMessageSource, MessageDescriptor,
    MessageIdentifier, MessageRecord, MessageSource, QueueName, SourceError,
};
use std::sync::{Arc, Mutex};

pub const QUEUE: &str = "APP.REQUEST";

pub fn queue_name() -> QueueName {
    QueueName::new(QUEUE.to_string()).unwrap()
}

/// Build a record whose message id is `[index]` and correlation id `[group]`
pub fn record(index: u8, group: u8, payload: &str) -> MessageRecord {
    MessageRecord::new(
        payload.to_string().into(),
        MessageDescriptor::new(MessageIdentifier::from_bytes(vec![index], "message_id").unwrap())
            .with_correlation_id(
                MessageIdentifier::from_bytes(vec![group], "correlation_id").unwrap(),
            ),
    )
}

/// In-memory source seeded with `count` messages alternating between two
/// correlation groups (0x0a for odd positions, 0x0b for even ones)
pub fn seeded_source(count: u8) -> InMemoryMessageSource {
    let source = InMemoryMessageSource::new();
    let records = (1..=count).map(|i| {
        let group = if i % 2 == 1 { 0x0a } else { 0x0b };
        record(i, group, &format!("message {}", i))
    });
    source.seed(&queue_name(), records).unwrap();
    source
}

// ============================================================================
// Recording Source
// ============================================================================

#[derive(Default)]
struct Recorded {
    opens: usize,
    gets: Vec<GetOptions>,
}

/// Wraps an in-memory source, recording every call and optionally failing
/// the get call at a given (1-based) position
#[derive(Clone)]
#[allow(dead_code)]
pub struct RecordingSource {
    inner: InMemoryMessageSource,
    recorded: Arc<Mutex<Recorded>>,
    fail_on_call: Option<usize>,
}

#[allow(dead_code)]
impl RecordingSource {
    pub fn new(inner: InMemoryMessageSource) -> Self {
        Self {
            inner,
            recorded: Arc::new(Mutex::new(Recorded::default())),
            fail_on_call: None,
        }
    }

    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn open_count(&self) -> usize {
        self.recorded.lock().unwrap().opens
    }

    pub fn get_calls(&self) -> Vec<GetOptions> {
        self.recorded.lock().unwrap().gets.clone()
    }
}

#[async_trait]
impl MessageSource for RecordingSource {
    async fn open(&self, queue: &QueueName) -> Result<Box<dyn BrowseHandle>, SourceError> {
        self.recorded.lock().unwrap().opens += 1;
        let inner = self.inner.open(queue).await?;
        Ok(Box::new(RecordingHandle {
            inner,
            recorded: self.recorded.clone(),
            fail_on_call: self.fail_on_call,
        }))
    }

    fn source_name(&self) -> &str {
        "recording"
    }
}

struct RecordingHandle {
    inner: Box<dyn BrowseHandle>,
    recorded: Arc<Mutex<Recorded>>,
    fail_on_call: Option<usize>,
}

#[async_trait]
impl BrowseHandle for RecordingHandle {
    async fn get_next(&mut self, options: &GetOptions) -> GetOutcome {
        let call = {
            let mut recorded = self.recorded.lock().unwrap();
            recorded.gets.push(options.clone());
            recorded.gets.len()
        };

        if self.fail_on_call == Some(call) {
            return GetOutcome::Failed(SourceError::ConnectionFailed {
                message: "channel broken".to_string(),
            });
        }

        self.inner.get_next(options).await
    }
}
