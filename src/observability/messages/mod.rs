// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for consistent, human-readable
//! output. Messages worth filtering on also implement [`StructuredLog`], which
//! emits the message's fields alongside the text.
//!
//! # Organization
//!
//! * `engine` - Resolution requests, factory invocation, unit publication
//! * `loader` - Resource dispatch and completion
//! * `registry` - Unit registration and rejected registrations
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_includer::observability::messages::engine::ResolutionRequested;
//! use the_includer::observability::messages::StructuredLog;
//!
//! let msg = ResolutionRequested {
//!     unit: "App",
//!     prerequisite_count: 2,
//!     newly_tracked: 1,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod engine;
pub mod loader;
pub mod registry;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message at its level with its fields attached.
    fn log(&self);

    /// Build a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
