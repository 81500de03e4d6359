// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for resolution engine lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Engine start and stop
//! * Resolution requests and their bookkeeping
//! * Factory invocation and unit publication
//! * Failed and expired requests

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// The owner task started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EngineStarted<'a> {
    pub version: &'a str,
    pub registered_units: usize,
}

impl Display for EngineStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolution engine {} started with {} registered units",
            self.version, self.registered_units
        )
    }
}

impl StructuredLog for EngineStarted<'_> {
    fn log(&self) {
        tracing::info!(
            version = self.version,
            registered_units = self.registered_units,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "engine",
            span_name = name,
            version = self.version,
            registered_units = self.registered_units,
        )
    }
}

/// The owner task stopped.
pub struct EngineStopped {
    pub in_flight_requests: usize,
}

impl Display for EngineStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolution engine stopped with {} requests still in flight",
            self.in_flight_requests
        )
    }
}

/// A resolution request was accepted.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_includer::observability::messages::engine::ResolutionRequested;
///
/// let msg = ResolutionRequested {
///     unit: "App",
///     prerequisite_count: 3,
///     newly_tracked: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ResolutionRequested<'a> {
    pub unit: &'a str,
    pub prerequisite_count: usize,
    pub newly_tracked: usize,
}

impl Display for ResolutionRequested<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolving '{}': {} prerequisites, {} newly tracked",
            self.unit, self.prerequisite_count, self.newly_tracked
        )
    }
}

impl StructuredLog for ResolutionRequested<'_> {
    fn log(&self) {
        tracing::info!(
            unit = self.unit,
            prerequisite_count = self.prerequisite_count,
            newly_tracked = self.newly_tracked,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "resolution",
            span_name = name,
            unit = self.unit,
            prerequisite_count = self.prerequisite_count,
        )
    }
}

/// A second definition of a unit was ignored.
///
/// # Log Level
/// `warn!` - Probably a caller mistake
pub struct DuplicateResolutionIgnored<'a> {
    pub unit: &'a str,
}

impl Display for DuplicateResolutionIgnored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Unit '{}' is already being resolved; ignoring the later definition",
            self.unit
        )
    }
}

/// A factory is about to run.
pub struct FactoryInvoked<'a> {
    pub unit: &'a str,
    pub argument_count: usize,
}

impl Display for FactoryInvoked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invoking factory for '{}' with {} arguments",
            self.unit, self.argument_count
        )
    }
}

/// A unit's value was stored and its waiters triggered.
pub struct UnitPublished<'a> {
    pub unit: &'a str,
    pub external: bool,
}

impl Display for UnitPublished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let kind = if self.external { "external unit" } else { "unit" };
        write!(f, "Published {} '{}'", kind, self.unit)
    }
}

/// A unit failed to resolve.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct UnitFailed<'a> {
    pub unit: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for UnitFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Unit '{}' failed: {}", self.unit, self.error)
    }
}

impl StructuredLog for UnitFailed<'_> {
    fn log(&self) {
        tracing::error!(
            unit = self.unit,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "unit_failed",
            span_name = name,
            unit = self.unit,
            error = %self.error,
        )
    }
}

/// A request was still pending when its timeout elapsed.
///
/// # Log Level
/// `warn!` - The request is failed, its dependents will see `TimedOut`
pub struct RequestExpired<'a> {
    pub unit: &'a str,
    pub satisfied: usize,
    pub prerequisite_count: usize,
    pub after: Duration,
}

impl Display for RequestExpired<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Request for '{}' expired after {:?} with {}/{} prerequisites satisfied",
            self.unit, self.after, self.satisfied, self.prerequisite_count
        )
    }
}

impl StructuredLog for RequestExpired<'_> {
    fn log(&self) {
        tracing::warn!(
            unit = self.unit,
            satisfied = self.satisfied,
            prerequisite_count = self.prerequisite_count,
            after_ms = self.after.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "request_expired",
            span_name = name,
            unit = self.unit,
            after = ?self.after,
        )
    }
}
