//! Whole-configuration validation.
//!
//! The path registry already rejects bad registrations one at a time. A
//! configuration file is validated as a whole first so that every problem is
//! reported at once instead of one per run.
//!
//! # Validation Pipeline
//!
//! 1. **Duplicate Validation**: a name declared under both `paths` and
//!    `externals` must use the same location
//! 2. **Reference Validation**: every external prerequisite is declared
//! 3. **Cycle Detection**: the registry's DFS, run from every external
//!
//! Cycle detection only runs when references resolve, since it walks the
//! declared graph.
//!
//! # Examples
//!
//! ```rust
//! use the_includer::config::{validate_config, Config, ExternalSpec};
//! use the_includer::errors::ValidationError;
//!
//! let mut config = Config::default();
//! config.externals.insert(
//!     "jQuery-UI".to_string(),
//!     ExternalSpec::Detailed {
//!         path: Some("vendor/jquery-ui".to_string()),
//!         prerequisites: vec!["jQuery".to_string()],
//!         symbol: Some("jQuery".to_string()),
//!     },
//! );
//!
//! let errors = validate_config(&config).unwrap_err();
//! assert!(matches!(errors[0], ValidationError::UnresolvedDependency { .. }));
//! ```

use crate::config::registry::find_cycle;
use crate::config::Config;
use crate::errors::ValidationError;
use std::collections::HashSet;

/// Validates a configuration for duplicate names, dangling prerequisites and cycles.
///
/// # Returns
///
/// * `Ok(())` - Configuration can be registered as-is
/// * `Err(Vec<ValidationError>)` - Every problem found
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(duplicate_errors) = validate_unique_locations(config) {
        errors.extend(duplicate_errors);
    }

    if let Err(unresolved_errors) = validate_dependency_references(config) {
        errors.extend(unresolved_errors);
    }

    if errors.is_empty() {
        if let Err(cycle_errors) = validate_acyclic_graph(config) {
            errors.extend(cycle_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A name may appear under both `paths` and `externals` only with the same location.
fn validate_unique_locations(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (name, spec) in &config.externals {
        if let Some(path) = config.paths.get(name) {
            let external_location = spec.location().unwrap_or(name);
            if path != external_location {
                errors.push(ValidationError::DuplicateDefinition {
                    unit: name.clone(),
                    first: path.clone(),
                    second: external_location.to_string(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Every external prerequisite must be declared under `paths` or `externals`.
fn validate_dependency_references(config: &Config) -> Result<(), Vec<ValidationError>> {
    let declared: HashSet<&String> = config.paths.keys().chain(config.externals.keys()).collect();
    let mut errors = Vec::new();

    for (name, spec) in &config.externals {
        for dependency in spec.prerequisites() {
            if !declared.contains(dependency) {
                errors.push(ValidationError::UnresolvedDependency {
                    unit: name.clone(),
                    missing_dependency: dependency.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates that external prerequisites are acyclic.
///
/// Walks back to each external from its own prerequisites with the search
/// the registry runs on every registration.
fn validate_acyclic_graph(config: &Config) -> Result<(), Vec<ValidationError>> {
    let edges = |name: &str| {
        config
            .externals
            .get(name)
            .map(|spec| spec.prerequisites().to_vec())
            .unwrap_or_default()
    };

    for (name, spec) in &config.externals {
        if let Some(cycle) = find_cycle(name, spec.prerequisites(), &edges) {
            return Err(vec![ValidationError::CyclicDependency { cycle }]);
        }
    }

    Ok(())
}
