// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for resource loading events.
//!
//! This module contains message types for logging events related to:
//! * Dispatching a resource to the host
//! * Repeated requests for an already dispatched resource
//! * Resource completion, failure and detachment

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A resource was handed to the host for fetching.
///
/// # Log Level
/// `debug!` - Per-resource detail
///
/// # Example
/// ```
/// use the_includer::observability::messages::loader::ResourceDispatched;
///
/// let msg = ResourceDispatched {
///     unit: "jQuery",
///     url: "js/vendor/jquery.js",
///     attribute: "src",
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct ResourceDispatched<'a> {
    pub unit: &'a str,
    pub url: &'a str,
    pub attribute: &'a str,
}

impl Display for ResourceDispatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dispatched '{}' via {}={}",
            self.unit, self.attribute, self.url
        )
    }
}

/// A load was requested for a resource that is already dispatched.
///
/// # Log Level
/// `trace!` - Expected whenever units share prerequisites
pub struct ResourceAlreadyDispatched<'a> {
    pub unit: &'a str,
    pub key: &'a str,
    pub in_flight: bool,
}

impl Display for ResourceAlreadyDispatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let state = if self.in_flight { "in flight" } else { "already loaded" };
        write!(f, "Resource '{}' for '{}' is {}", self.key, self.unit, state)
    }
}

/// The host reported a resource as loaded.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ResourceLoaded<'a> {
    pub unit: &'a str,
    pub url: &'a str,
    pub remaining: usize,
}

impl Display for ResourceLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded '{}' from {} ({} remaining)",
            self.unit, self.url, self.remaining
        )
    }
}

impl StructuredLog for ResourceLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            unit = self.unit,
            url = self.url,
            remaining = self.remaining,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "resource_loaded",
            span_name = name,
            unit = self.unit,
            url = self.url,
            remaining = self.remaining,
        )
    }
}

/// The host reported a resource as failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ResourceLoadFailed<'a> {
    pub unit: &'a str,
    pub url: &'a str,
    pub reason: &'a str,
}

impl Display for ResourceLoadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to load '{}' from {}: {}",
            self.unit, self.url, self.reason
        )
    }
}

impl StructuredLog for ResourceLoadFailed<'_> {
    fn log(&self) {
        tracing::error!(
            unit = self.unit,
            url = self.url,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "resource_load_failed",
            span_name = name,
            unit = self.unit,
            url = self.url,
            reason = self.reason,
        )
    }
}

/// A loaded resource was detached from the host (auto-remove).
pub struct ResourceDetached<'a> {
    pub unit: &'a str,
    pub url: &'a str,
}

impl Display for ResourceDetached<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Detached '{}' ({})", self.unit, self.url)
    }
}
