// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for resolution requests and for units that could not be resolved.

use crate::errors::RegistryError;
use std::time::Duration;
use thiserror::Error;

/// Why a single unit never produced a value.
///
/// A `UnitFailure` is delivered through the same completion path as a
/// successful resolution, so every waiter on the unit sees it exactly once.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitFailure {
    /// The host reported that the backing resource could not be loaded.
    #[error("Failed to load '{name}' from '{url}': {reason}")]
    LoadFailure {
        name: String,
        url: String,
        reason: String,
    },

    /// The resource loaded but the external symbol was not exposed.
    #[error("External unit '{name}' loaded but symbol '{symbol}' was not found")]
    SymbolNotFound { name: String, symbol: String },

    /// A prerequisite of `name` failed.
    #[error("Unit '{name}' cannot resolve because '{dependency}' failed: {cause}")]
    DependencyFailed {
        name: String,
        dependency: String,
        cause: Box<UnitFailure>,
    },

    /// A plain unit's resource loaded without defining the unit.
    #[error("Resource '{location}' loaded but never defined unit '{name}'")]
    NotDefined { name: String, location: String },

    /// The engine refused to start resolving `name`.
    #[error("Resolution of '{name}' was rejected: {reason}")]
    Rejected { name: String, reason: String },

    /// The request for `name` was still pending when its timeout elapsed.
    #[error("Resolution of '{name}' timed out after {after:?}")]
    TimedOut { name: String, after: Duration },
}

impl UnitFailure {
    /// The deepest failure in a chain of `DependencyFailed` wrappers.
    pub fn root_cause(&self) -> &UnitFailure {
        match self {
            UnitFailure::DependencyFailed { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}

/// Errors returned by the `Includer` handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IncludeError {
    /// A prerequisite is neither registered nor known to the engine.
    #[error("Unit '{unit}' requires '{prerequisite}' which has no registered descriptor")]
    MissingDescriptor { unit: String, prerequisite: String },

    /// The request would wait on itself.
    #[error("Cyclic dependency detected: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// One of the requested units failed to resolve.
    #[error(transparent)]
    Failed(#[from] UnitFailure),

    /// `require` gave up waiting.
    #[error("Timed out after {after:?} waiting for [{}]", units.join(", "))]
    Timeout { units: Vec<String>, after: Duration },

    /// The owner task is gone (shut down or its runtime was dropped).
    #[error("The resolution engine has stopped")]
    EngineStopped,

    /// The engine was built outside of a tokio runtime.
    #[error("No tokio runtime is available to run the resolution engine")]
    NoRuntime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_cause_unwraps_nested_dependency_failures() {
        let load = UnitFailure::LoadFailure {
            name: "jQuery".to_string(),
            url: "vendor/jquery.js".to_string(),
            reason: "404".to_string(),
        };
        let nested = UnitFailure::DependencyFailed {
            name: "App".to_string(),
            dependency: "jQuery-UI".to_string(),
            cause: Box::new(UnitFailure::DependencyFailed {
                name: "jQuery-UI".to_string(),
                dependency: "jQuery".to_string(),
                cause: Box::new(load.clone()),
            }),
        };

        assert_eq!(nested.root_cause(), &load);
        assert_eq!(load.root_cause(), &load);
    }

    #[test]
    fn test_error_messages() {
        let err = IncludeError::MissingDescriptor {
            unit: "App".to_string(),
            prerequisite: "Ghost".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unit 'App' requires 'Ghost' which has no registered descriptor"
        );

        let err = IncludeError::from(RegistryError::CyclicDependency {
            cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        });
        assert_eq!(err.to_string(), "Cyclic dependency detected: a -> b -> a");
    }
}
