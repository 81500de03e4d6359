// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised synchronously by the path registry.

use thiserror::Error;

/// Errors that can occur while registering units.
///
/// Both variants are configuration mistakes: they are reported to the caller
/// of the registration call and nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The name is already mapped to a different resource location.
    #[error("Duplicate source name '{name}': already registered at '{existing}', refusing '{requested}'")]
    DuplicateDefinition {
        name: String,
        existing: String,
        requested: String,
    },

    /// Registering the unit would make it (transitively) require itself.
    #[error("Cyclic dependency detected: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },
}
