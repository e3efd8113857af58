//! Bounded message browsing.
//!
//! [`BoundedMessageBrowser::retrieve`] walks a queue under a browse cursor,
//! leaving every message in place, and returns what it read. One call moves through
//! `Validating -> Browsing -> Complete | Exhausted | Failed`; invalid input goes
//! straight from `Validating` to `Failed` and never touches the source.
//!
//! # Filter modes
//!
//! Evaluated in priority order:
//!
//! 1. A `limit` reads up to that many messages. Identifier filters are ignored
//!    unless [`BrowserConfig::combine_limit_and_filter`] is set.
//! 2. Message id and correlation id: one read matching both.
//! 3. Message id only: one matching read.
//! 4. Correlation id only: one matching read.
//! 5. Nothing: one unfiltered read.
//!
//! When a limited browse reaches its limit the browser issues one more read to
//! fill in [`RetrievalResult::more_available`]; the extra message is not
//! returned. A failed look-ahead leaves the retrieval complete with
//! `more_available` unknown.
//!
//! Any other source failure aborts the call and discards anything already
//! collected. Nothing is retried.

use crate::config::BrowserConfig;
use crate::error::{BrowseError, ErrorDescriptor, SourceError, ValidationError};
use crate::message::{BrowseLimit, IdentifierInput, MessageRecord, QueueName};
use crate::source::{BrowseHandle, GetOptions, GetOutcome, MatchCriteria, MessageSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

#[cfg(test)]
#[path = "browser_tests.rs"]
mod tests;

// ============================================================================
// Request and Result
// ============================================================================

/// A caller's query against one queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalRequest {
    pub queue_identifier: String,
    pub message_id: Option<IdentifierInput>,
    pub correlation_id: Option<IdentifierInput>,
    /// Raw caller input; validated into a [`BrowseLimit`] on retrieval
    pub limit: Option<i64>,
}

impl RetrievalRequest {
    pub fn new(queue_identifier: impl Into<String>) -> Self {
        Self {
            queue_identifier: queue_identifier.into(),
            message_id: None,
            correlation_id: None,
            limit: None,
        }
    }

    pub fn with_message_id(mut self, message_id: impl Into<IdentifierInput>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<IdentifierInput>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// How a retrieval ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Limit reached or single read satisfied
    Complete,
    /// Source reported that no further messages were available
    Exhausted,
    /// Source failure
    Failed,
}

/// Outcome of one retrieval
///
/// Serialises with the `haserror` / `message` field names expected by
/// existing consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalResult {
    #[serde(rename = "haserror")]
    pub has_error: bool,

    /// Retrieved messages in retrieval order
    #[serde(rename = "message")]
    pub messages: Vec<MessageRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDescriptor>,

    pub termination: Termination,

    /// Number of get-next calls issued against the source
    pub get_calls: u32,

    /// Whether the look-ahead read after a reached limit found another
    /// message; `None` when no look-ahead applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more_available: Option<bool>,
}

impl RetrievalResult {
    fn success(
        messages: Vec<MessageRecord>,
        termination: Termination,
        get_calls: u32,
        more_available: Option<bool>,
    ) -> Self {
        Self {
            has_error: false,
            messages,
            error: None,
            termination,
            get_calls,
            more_available,
        }
    }

    fn failure(error: &SourceError, get_calls: u32) -> Self {
        Self {
            has_error: true,
            messages: Vec::new(),
            error: Some(ErrorDescriptor::from(error)),
            termination: Termination::Failed,
            get_calls,
            more_available: None,
        }
    }
}

// ============================================================================
// Internal Browse State
// ============================================================================

/// Read strategy chosen for one retrieval
#[derive(Debug, Clone, PartialEq, Eq)]
enum FilterMode {
    /// Up to `limit` reads, each using `criteria`
    Bounded {
        limit: BrowseLimit,
        criteria: MatchCriteria,
    },
    /// Exactly one read
    Single(MatchCriteria),
}

impl FilterMode {
    fn select(
        limit: Option<BrowseLimit>,
        criteria: MatchCriteria,
        combine_limit_and_filter: bool,
    ) -> Self {
        match limit {
            Some(limit) if combine_limit_and_filter => Self::Bounded { limit, criteria },
            Some(limit) => Self::Bounded {
                limit,
                criteria: MatchCriteria::any(),
            },
            None => Self::Single(criteria),
        }
    }

    fn label(&self) -> &'static str {
        use crate::source::MatchMode;

        match self {
            Self::Bounded { criteria, .. } if criteria.mode() == MatchMode::None => "bounded",
            Self::Bounded { .. } => "bounded_filtered",
            Self::Single(criteria) => match criteria.mode() {
                MatchMode::MessageIdAndCorrelationId => "message_and_correlation_id",
                MatchMode::MessageId => "message_id",
                MatchMode::CorrelationId => "correlation_id",
                MatchMode::None => "unfiltered",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseState {
    Validating,
    Browsing,
    Complete,
    Exhausted,
    Failed,
}

/// Per-call cursor bookkeeping; never outlives a `retrieve` call
struct BrowseCursor {
    state: BrowseState,
    retrieved: u32,
    get_calls: u32,
}

impl BrowseCursor {
    fn new() -> Self {
        Self {
            state: BrowseState::Validating,
            retrieved: 0,
            get_calls: 0,
        }
    }

    fn transition(&mut self, next: BrowseState) {
        debug!(from = ?self.state, to = ?next, "Browse state transition");
        self.state = next;
    }

    async fn next(&mut self, handle: &mut dyn BrowseHandle, options: &GetOptions) -> GetOutcome {
        self.get_calls += 1;
        let outcome = handle.get_next(options).await;
        debug!(
            call = self.get_calls,
            match_mode = ?options.match_mode(),
            outcome = match &outcome {
                GetOutcome::Matched(_) => "matched",
                GetOutcome::Exhausted => "exhausted",
                GetOutcome::Failed(_) => "failed",
            },
            "Get-next call returned"
        );
        outcome
    }
}

struct Collected {
    messages: Vec<MessageRecord>,
    more_available: Option<bool>,
}

// ============================================================================
// BoundedMessageBrowser
// ============================================================================

/// Drives bounded retrievals against any [`MessageSource`]
///
/// Holds only configuration; every call keeps its own cursor, so one browser
/// can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct BoundedMessageBrowser {
    config: BrowserConfig,
}

impl BoundedMessageBrowser {
    /// Create browser with validated configuration
    pub fn new(config: BrowserConfig) -> Result<Self, BrowseError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Run one retrieval
    ///
    /// # Errors
    ///
    /// Returns [`BrowseError::InvalidArgument`] when the queue name, limit or an
    /// identifier is invalid. No source call is made in that case. Source
    /// failures are reported through [`RetrievalResult::has_error`].
    #[instrument(skip(self, source, request), fields(
        queue = %request.queue_identifier,
        source = source.source_name(),
    ))]
    pub async fn retrieve(
        &self,
        source: &dyn MessageSource,
        request: &RetrievalRequest,
    ) -> Result<RetrievalResult, BrowseError> {
        let mut cursor = BrowseCursor::new();

        let (queue, mode) = match self.validate(request) {
            Ok(validated) => validated,
            Err(e) => {
                cursor.transition(BrowseState::Failed);
                debug!(error = %e, "Rejected retrieval request");
                return Err(BrowseError::InvalidArgument(e));
            }
        };

        let mut handle = match source.open(&queue).await {
            Ok(handle) => handle,
            Err(e) => {
                cursor.transition(BrowseState::Failed);
                warn!(error = %e, "Failed to open queue");
                return Ok(RetrievalResult::failure(&e, cursor.get_calls));
            }
        };

        cursor.transition(BrowseState::Browsing);
        match self.browse(handle.as_mut(), &mode, &mut cursor).await {
            Ok(collected) => {
                let termination = match cursor.state {
                    BrowseState::Exhausted => Termination::Exhausted,
                    _ => Termination::Complete,
                };
                info!(
                    filter_mode = mode.label(),
                    retrieved = collected.messages.len(),
                    get_calls = cursor.get_calls,
                    termination = ?termination,
                    "Retrieval finished"
                );
                Ok(RetrievalResult::success(
                    collected.messages,
                    termination,
                    cursor.get_calls,
                    collected.more_available,
                ))
            }
            Err(e) => {
                warn!(
                    filter_mode = mode.label(),
                    discarded = cursor.retrieved,
                    get_calls = cursor.get_calls,
                    error = %e,
                    "Retrieval failed"
                );
                Ok(RetrievalResult::failure(&e, cursor.get_calls))
            }
        }
    }

    fn validate(
        &self,
        request: &RetrievalRequest,
    ) -> Result<(QueueName, FilterMode), ValidationError> {
        let queue = QueueName::new(request.queue_identifier.clone())?;
        let limit = request.limit.map(BrowseLimit::new).transpose()?;

        let message_id = match &request.message_id {
            Some(input) => input.normalize("message_id")?,
            None => None,
        };
        let correlation_id = match &request.correlation_id {
            Some(input) => input.normalize("correlation_id")?,
            None => None,
        };

        let mode = FilterMode::select(
            limit,
            MatchCriteria::new(message_id, correlation_id),
            self.config.combine_limit_and_filter,
        );
        Ok((queue, mode))
    }

    async fn browse(
        &self,
        handle: &mut dyn BrowseHandle,
        mode: &FilterMode,
        cursor: &mut BrowseCursor,
    ) -> Result<Collected, SourceError> {
        match mode {
            FilterMode::Bounded { limit, criteria } => {
                let options = self.options(criteria.clone());
                let mut messages = Vec::with_capacity(limit.get() as usize);

                while cursor.retrieved < limit.get() {
                    match cursor.next(handle, &options).await {
                        GetOutcome::Matched(record) => {
                            messages.push(record);
                            cursor.retrieved += 1;
                        }
                        GetOutcome::Exhausted => {
                            cursor.transition(BrowseState::Exhausted);
                            return Ok(Collected {
                                messages,
                                more_available: Some(false),
                            });
                        }
                        GetOutcome::Failed(e) => {
                            cursor.transition(BrowseState::Failed);
                            return Err(e);
                        }
                    }
                }

                // Limit reached: look ahead once without keeping the message.
                // The limit already completed the retrieval, so a failure here
                // only leaves more_available unknown.
                let more_available = match cursor.next(handle, &options).await {
                    GetOutcome::Matched(_) => Some(true),
                    GetOutcome::Exhausted => Some(false),
                    GetOutcome::Failed(e) => {
                        warn!(
                            retrieved = cursor.retrieved,
                            error = %e,
                            "Look-ahead read failed after reaching the limit"
                        );
                        None
                    }
                };

                cursor.transition(BrowseState::Complete);
                Ok(Collected {
                    messages,
                    more_available,
                })
            }
            FilterMode::Single(criteria) => {
                let options = self.options(criteria.clone());
                match cursor.next(handle, &options).await {
                    GetOutcome::Matched(record) => {
                        cursor.retrieved = 1;
                        cursor.transition(BrowseState::Complete);
                        Ok(Collected {
                            messages: vec![record],
                            more_available: None,
                        })
                    }
                    GetOutcome::Exhausted => {
                        cursor.transition(BrowseState::Exhausted);
                        Ok(Collected {
                            messages: Vec::new(),
                            more_available: None,
                        })
                    }
                    GetOutcome::Failed(e) => {
                        cursor.transition(BrowseState::Failed);
                        Err(e)
                    }
                }
            }
        }
    }

    fn options(&self, criteria: MatchCriteria) -> GetOptions {
        GetOptions::new(self.config.wait_interval(), criteria)
    }
}

impl Default for BoundedMessageBrowser {
    fn default() -> Self {
        Self {
            config: BrowserConfig::default(),
        }
    }
}
