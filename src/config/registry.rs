// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The path registry: logical unit names mapped to resource locations.
//!
//! The registry is append-only for the lifetime of an engine. Plain entries
//! describe units whose resource defines itself once loaded; external entries
//! describe units whose value is recovered from a global symbol after their
//! resource (and their own prerequisites) have loaded.

use crate::config::loader::{Config, ExternalSpec};
use crate::errors::RegistryError;
use crate::observability::messages::registry::{
    CyclicRegistrationRejected, DuplicateDefinitionRejected, UnitRegistered,
};
use crate::observability::messages::StructuredLog;
use std::collections::{HashMap, HashSet};

/// Descriptor for one registered unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDescriptor {
    /// Resource location; `None` means "use the unit name".
    pub location: Option<String>,
    /// Prerequisites of an external unit, in declared order.
    pub prerequisites: Vec<String>,
    pub external: bool,
    /// Global symbol recovered after an external unit loads.
    pub symbol: String,
}

impl UnitDescriptor {
    fn plain(name: &str, location: &str) -> Self {
        Self {
            location: Some(location.to_string()),
            prerequisites: Vec::new(),
            external: false,
            symbol: name.to_string(),
        }
    }

    fn external(name: &str, spec: &ExternalSpec) -> Self {
        Self {
            location: spec.location().map(str::to_string),
            prerequisites: spec.prerequisites().to_vec(),
            external: true,
            symbol: spec.symbol_or(name).to_string(),
        }
    }
}

/// Newtype over the name -> descriptor table.
#[derive(Debug, Clone, Default)]
pub struct PathRegistry {
    units: HashMap<String, UnitDescriptor>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry holding every path and external of `cfg`.
    pub fn from_config(cfg: &Config) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register_all(cfg.paths.iter().map(|(name, path)| (name.as_str(), path.as_str())))?;
        registry.register_externals(cfg.externals.iter().map(|(name, spec)| (name.as_str(), spec)))?;
        Ok(registry)
    }

    /// Map `name` to `location`.
    ///
    /// Re-registering the identical mapping is a no-op; mapping an existing
    /// name to a different location fails with `DuplicateDefinition`.
    pub fn register(&mut self, name: &str, location: &str) -> Result<(), RegistryError> {
        self.check_location(name, Some(location))?;
        if self.units.contains_key(name) {
            return Ok(());
        }

        self.units
            .insert(name.to_string(), UnitDescriptor::plain(name, location));
        UnitRegistered {
            unit: name,
            location,
            external: false,
        }
        .log();
        Ok(())
    }

    /// Batch form of [`register`](Self::register). Nothing is inserted unless
    /// every mapping in the batch is acceptable.
    pub fn register_all<'a, I>(&mut self, mappings: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mappings: Vec<_> = mappings.into_iter().collect();
        let mut staged: HashMap<&str, &str> = HashMap::new();
        for &(name, location) in &mappings {
            self.check_location(name, Some(location))?;
            if let Some(previous) = staged.insert(name, location) {
                if previous != location {
                    return Err(self.reject(name, previous, location));
                }
            }
        }

        for (name, location) in mappings {
            self.register(name, location)?;
        }
        Ok(())
    }

    /// Register an external unit.
    ///
    /// The structured form may declare prerequisites; a registration that would
    /// let the unit reach itself through them is rejected and leaves the
    /// registry untouched.
    pub fn register_external(&mut self, name: &str, spec: &ExternalSpec) -> Result<(), RegistryError> {
        self.check_location(name, spec.location())?;

        let descriptor = UnitDescriptor::external(name, spec);
        let previous = self.units.insert(name.to_string(), descriptor);

        if let Some(cycle) = self.cycle_through(name, spec.prerequisites()) {
            match previous {
                Some(previous) => self.units.insert(name.to_string(), previous),
                None => self.units.remove(name),
            };
            CyclicRegistrationRejected { cycle: &cycle }.log();
            return Err(RegistryError::CyclicDependency { cycle });
        }

        UnitRegistered {
            unit: name,
            location: spec.location().unwrap_or(name),
            external: true,
        }
        .log();
        Ok(())
    }

    /// Batch form of [`register_external`](Self::register_external); all or nothing.
    pub fn register_externals<'a, I>(&mut self, specs: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = (&'a str, &'a ExternalSpec)>,
    {
        let snapshot = self.units.clone();
        for (name, spec) in specs {
            if let Err(e) = self.register_external(name, spec) {
                self.units = snapshot;
                return Err(e);
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&UnitDescriptor> {
        self.units.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    pub fn is_external(&self, name: &str) -> bool {
        self.units.get(name).is_some_and(|d| d.external)
    }

    /// The resource location of `name`, falling back to the name itself.
    pub fn location_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.units
            .get(name)
            .and_then(|d| d.location.as_deref())
            .unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Find a path from any of `prerequisites` back to `target`.
    ///
    /// Only external units carry prerequisites, so the walk follows external
    /// descriptors. Returns the cycle as `target -> ... -> target`.
    pub fn cycle_through(&self, target: &str, prerequisites: &[String]) -> Option<Vec<String>> {
        find_cycle(target, prerequisites, |name| {
            self.units
                .get(name)
                .map(|d| d.prerequisites.clone())
                .unwrap_or_default()
        })
    }

    fn check_location(&self, name: &str, location: Option<&str>) -> Result<(), RegistryError> {
        let Some(existing) = self.units.get(name) else {
            return Ok(());
        };
        if existing.location.as_deref() == location {
            return Ok(());
        }

        Err(self.reject(
            name,
            existing.location.as_deref().unwrap_or(name),
            location.unwrap_or(name),
        ))
    }

    fn reject(&self, name: &str, existing: &str, requested: &str) -> RegistryError {
        DuplicateDefinitionRejected {
            unit: name,
            existing,
            requested,
        }
        .log();
        RegistryError::DuplicateDefinition {
            name: name.to_string(),
            existing: existing.to_string(),
            requested: requested.to_string(),
        }
    }
}

/// Depth-first search from `prerequisites` back to `target` over `edges`.
///
/// Returns the first path found as `target -> ... -> target`.
pub(crate) fn find_cycle<F>(target: &str, prerequisites: &[String], edges: F) -> Option<Vec<String>>
where
    F: Fn(&str) -> Vec<String>,
{
    let mut visited = HashSet::new();
    let mut path = vec![target.to_string()];

    for prerequisite in prerequisites {
        if dfs_to_target(prerequisite, target, &edges, &mut visited, &mut path) {
            return Some(path);
        }
    }
    None
}

fn dfs_to_target<F>(
    current: &str,
    target: &str,
    edges: &F,
    visited: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> bool
where
    F: Fn(&str) -> Vec<String>,
{
    path.push(current.to_string());
    if current == target {
        return true;
    }

    if visited.insert(current.to_string()) {
        for next in edges(current) {
            if dfs_to_target(&next, target, edges, visited, path) {
                return true;
            }
        }
    }

    path.pop();
    false
}
