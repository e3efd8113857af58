//! # Queue Browser Core
//!
//! Bounded, filtered message retrieval over any ordered message source.
//!
//! This library provides:
//! - A retrieval loop with a result cap and exact-match identifier filters
//! - A clean split between "no more messages" and real source failures
//! - A provider-agnostic message source seam
//! - An in-memory source for tests and local development
//! - Hex-dump rendering of payloads
//!
//! ## Module Organization
//!
//! - [`error`] - Error types for all browse operations
//! - [`message`] - Identifiers, limits and message records
//! - [`source`] - Message source traits and per-read options
//! - [`config`] - Browser configuration
//! - [`browser`] - The bounded retrieval loop
//! - [`hexdump`] - Payload hex dumps
//! - [`providers`] - Concrete message sources

pub mod browser;
pub mod config;
pub mod error;
pub mod hexdump;
pub mod message;
pub mod providers;
pub mod source;

// Re-export commonly used types at crate root for convenience
pub use browser::{BoundedMessageBrowser, RetrievalRequest, RetrievalResult, Termination};
pub use config::BrowserConfig;
pub use error::{BrowseError, ConfigurationError, ErrorDescriptor, SourceError, ValidationError};
pub use hexdump::HexDump;
pub use message::{
    BrowseLimit, IdentifierInput, MessageDescriptor, MessageIdentifier, MessageRecord, QueueName,
    Timestamp,
};
pub use providers::InMemoryMessageSource;
pub use source::{
    BrowseHandle, GetOptions, GetOutcome, MatchCriteria, MatchMode, MessageSource,
};
