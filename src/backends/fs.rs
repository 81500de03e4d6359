// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! A host that loads units from JSON files on disk.
//!
//! Each resource is a JSON document with two optional sections:
//!
//! ```json
//! {
//!   "globals": { "Lib": { "version": "1.0" } },
//!   "define": { "name": "app", "requires": ["Lib"], "value": "ready" }
//! }
//! ```
//!
//! `globals` are published into the host's [`GlobalTable`] (this is how
//! external units expose their value). `define` registers a unit through the
//! includer; its name defaults to the unit the resource was loaded for. A
//! definition with prerequisites resolves to `{"value": .., "uses": {..}}`
//! so the prerequisite values stay visible.

use crate::backends::{strip_query, GlobalTable};
use crate::engine::{CompletionSignal, Includer, UnitValue};
use crate::traits::{LoadableResource, ResourceHost};
use serde::Deserialize;
use serde_json::{json, Map};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
struct UnitFile {
    #[serde(default)]
    globals: BTreeMap<String, UnitValue>,
    #[serde(default)]
    define: Option<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    requires: Vec<String>,
    #[serde(default)]
    value: UnitValue,
}

impl Definition {
    fn build(value: UnitValue, requires: &[String], arguments: Vec<UnitValue>) -> UnitValue {
        if requires.is_empty() {
            return value;
        }
        let uses: Map<String, UnitValue> = requires.iter().cloned().zip(arguments).collect();
        json!({ "value": value, "uses": uses })
    }
}

/// Loads resources relative to a base directory.
pub struct FsResourceHost {
    base: PathBuf,
    globals: GlobalTable,
}

impl FsResourceHost {
    pub fn new(base: impl Into<PathBuf>, globals: GlobalTable) -> Self {
        Self {
            base: base.into(),
            globals,
        }
    }

    pub fn path_for(&self, url: &str) -> PathBuf {
        self.base.join(strip_query(url))
    }
}

async fn read_unit_file(path: &Path) -> Result<UnitFile, String> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("{}: {}", path.display(), e))
}

impl ResourceHost for FsResourceHost {
    fn attach(&self, resource: &LoadableResource, signal: CompletionSignal, includer: &Includer) {
        let path = self.path_for(&resource.url);
        let unit = resource.unit.clone();
        let globals = self.globals.clone();
        let includer = includer.clone();

        tokio::spawn(async move {
            let file = match read_unit_file(&path).await {
                Ok(file) => file,
                Err(reason) => {
                    signal.failed(reason);
                    return;
                }
            };

            for (symbol, value) in file.globals {
                globals.publish(symbol, value);
            }

            if let Some(definition) = file.define {
                let name = definition.name.unwrap_or(unit);
                let requires = definition.requires;
                let value = definition.value;
                let prerequisites = requires.clone();
                let result = includer
                    .resolve(name, prerequisites, move |arguments| {
                        Definition::build(value, &requires, arguments)
                    })
                    .await;
                if let Err(e) = result {
                    signal.failed(e.to_string());
                    return;
                }
            }

            signal.loaded();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderOptions;
    use crate::engine::IncluderBuilder;
    use crate::errors::{IncludeError, UnitFailure};
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, relative: &str, content: &str) {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn json_options() -> LoaderOptions {
        LoaderOptions {
            extension: ".json".to_string(),
            ..LoaderOptions::default()
        }
    }

    #[test]
    fn test_definition_value_shapes() {
        assert_eq!(Definition::build(json!(1), &[], vec![]), json!(1));

        let requires = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            Definition::build(json!("v"), &requires, vec![json!(1), json!(2)]),
            json!({"value": "v", "uses": {"a": 1, "b": 2}})
        );
    }

    #[test]
    fn test_path_ignores_cache_buster() {
        let host = FsResourceHost::new("/srv/units", GlobalTable::new());

        assert_eq!(
            host.path_for("vendor/lib.json?1700000000000"),
            PathBuf::from("/srv/units/vendor/lib.json")
        );
    }

    #[tokio::test]
    async fn test_loads_externals_and_self_defining_units() {
        let dir = TempDir::new().unwrap();
        write(&dir, "vendor/lib.json", r#"{"globals": {"Lib": {"version": "1.0"}}}"#);
        write(
            &dir,
            "app/main.json",
            r#"{"define": {"requires": ["Lib"], "value": "main"}}"#,
        );

        let globals = GlobalTable::new();
        let includer = IncluderBuilder::new(FsResourceHost::new(dir.path(), globals.clone()))
            .options(json_options())
            .locator(globals)
            .build()
            .unwrap();
        includer.register_external("Lib", "vendor/lib").await.unwrap();
        includer.register_path("main", "app/main").await.unwrap();

        let values = includer.require(["main"]).await.unwrap();

        assert_eq!(
            values,
            vec![json!({"value": "main", "uses": {"Lib": {"version": "1.0"}}})]
        );
        assert_eq!(includer.remaining().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_fails_the_unit() {
        let dir = TempDir::new().unwrap();
        let globals = GlobalTable::new();
        let includer = IncluderBuilder::new(FsResourceHost::new(dir.path(), globals.clone()))
            .options(json_options())
            .locator(globals)
            .build()
            .unwrap();
        includer.register_path("ghost", "nowhere/ghost").await.unwrap();

        let result = includer.require(["ghost"]).await;

        assert!(matches!(
            result,
            Err(IncludeError::Failed(UnitFailure::LoadFailure { ref name, .. })) if name == "ghost"
        ));
    }

    #[tokio::test]
    async fn test_invalid_json_fails_the_unit() {
        let dir = TempDir::new().unwrap();
        write(&dir, "broken.json", "{ not json");
        let includer = IncluderBuilder::new(FsResourceHost::new(dir.path(), GlobalTable::new()))
            .options(json_options())
            .build()
            .unwrap();
        includer.register_path("broken", "broken").await.unwrap();

        let result = includer.require(["broken"]).await;

        assert!(matches!(
            result,
            Err(IncludeError::Failed(UnitFailure::LoadFailure { .. }))
        ));
    }
}
