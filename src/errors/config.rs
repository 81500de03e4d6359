// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

/// Errors that can occur during whole-configuration validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A circular dependency was detected between external units
    CyclicDependency {
        /// The cycle path showing the circular dependency
        cycle: Vec<String>,
    },
    /// An external unit lists a prerequisite that is not declared anywhere
    UnresolvedDependency {
        /// The unit that has the unresolved prerequisite
        unit: String,
        /// The prerequisite that couldn't be resolved
        missing_dependency: String,
    },
    /// The same name is declared with two different locations
    DuplicateDefinition {
        unit: String,
        first: String,
        second: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::CyclicDependency { cycle } => {
                write!(f, "Cyclic dependency detected: {}", cycle.join(" -> "))
            }
            ValidationError::UnresolvedDependency {
                unit,
                missing_dependency,
            } => {
                write!(
                    f,
                    "Unit '{}' depends on '{}' which does not exist",
                    unit, missing_dependency
                )
            }
            ValidationError::DuplicateDefinition {
                unit,
                first,
                second,
            } => {
                write!(
                    f,
                    "Duplicate source name '{}': declared at both '{}' and '{}'",
                    unit, first, second
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while reading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported configuration format '{0}' (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(String),

    #[error("Configuration validation failed:\n{}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n"))]
    Invalid(Vec<ValidationError>),
}
