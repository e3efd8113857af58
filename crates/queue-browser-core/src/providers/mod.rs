//! Message source implementations.
//!
//! This module contains concrete implementations of the `MessageSource` and
//! `BrowseHandle` traits.

pub mod memory;

pub use memory::{InMemoryBrowseHandle, InMemoryMessageSource};
