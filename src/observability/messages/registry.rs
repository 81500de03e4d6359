// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for path registry events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A unit was added to the registry.
///
/// # Log Level
/// `debug!` - Registration happens in bulk at startup
pub struct UnitRegistered<'a> {
    pub unit: &'a str,
    pub location: &'a str,
    pub external: bool,
}

impl Display for UnitRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let kind = if self.external { "external unit" } else { "unit" };
        write!(f, "Registered {} '{}' at '{}'", kind, self.unit, self.location)
    }
}

impl StructuredLog for UnitRegistered<'_> {
    fn log(&self) {
        tracing::debug!(
            unit = self.unit,
            location = self.location,
            external = self.external,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "unit_registered",
            span_name = name,
            unit = self.unit,
            location = self.location,
            external = self.external,
        )
    }
}

/// A registration conflicted with an existing location.
///
/// # Log Level
/// `error!` - Configuration mistake
///
/// # Example
/// ```
/// use the_includer::observability::messages::registry::DuplicateDefinitionRejected;
///
/// let msg = DuplicateDefinitionRejected {
///     unit: "jQuery",
///     existing: "vendor/jquery-1.9.1",
///     requested: "vendor/jquery-2.0.0",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct DuplicateDefinitionRejected<'a> {
    pub unit: &'a str,
    pub existing: &'a str,
    pub requested: &'a str,
}

impl Display for DuplicateDefinitionRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Duplicate source name '{}': already at '{}', rejected '{}'",
            self.unit, self.existing, self.requested
        )
    }
}

impl StructuredLog for DuplicateDefinitionRejected<'_> {
    fn log(&self) {
        tracing::error!(
            unit = self.unit,
            existing = self.existing,
            requested = self.requested,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "duplicate_definition",
            span_name = name,
            unit = self.unit,
            existing = self.existing,
            requested = self.requested,
        )
    }
}

/// An external registration was rejected because it closes a cycle.
///
/// # Log Level
/// `error!` - Configuration mistake
pub struct CyclicRegistrationRejected<'a> {
    pub cycle: &'a [String],
}

impl Display for CyclicRegistrationRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cyclic dependency detected: {}", self.cycle.join(" -> "))
    }
}

impl StructuredLog for CyclicRegistrationRejected<'_> {
    fn log(&self) {
        tracing::error!(
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "cyclic_registration",
            span_name = name,
            cycle = self.cycle.join(" -> "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let registered = UnitRegistered {
            unit: "jQuery",
            location: "vendor/jquery",
            external: true,
        };
        assert_eq!(
            registered.to_string(),
            "Registered external unit 'jQuery' at 'vendor/jquery'"
        );

        let cycle = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        let rejected = CyclicRegistrationRejected { cycle: &cycle };
        assert_eq!(rejected.to_string(), "Cyclic dependency detected: a -> b -> a");
    }
}
