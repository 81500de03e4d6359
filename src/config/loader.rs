// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::DEFAULT_EXTENSION;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for the includer.
///
/// This struct represents the complete configuration for a loading session:
/// the loader options consulted when building resource URLs, the plain path
/// mappings and the external (global-exposing) units. It is typically loaded
/// from a YAML configuration file; `.toml` files are accepted as well.
///
/// # Fields
/// * `loader` - Options consulted by the resource loader (optional)
/// * `paths` - Logical name -> resource location for self-defining units
/// * `externals` - Logical name -> external unit specification
///
/// # Example
/// ```yaml
/// loader:
///   root: js/
///   cache_disabled: true
///   resolve_timeout_ms: 5000
/// paths:
///   app: src/app
/// externals:
///   jQuery: vendor/jquery-1.9.1.min
///   jQuery-UI:
///     path: vendor/jquery-ui-1.10.1.min
///     deps: [jQuery]
///     global: jQuery
/// ```
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub loader: LoaderOptions,
    #[serde(default)]
    pub paths: BTreeMap<String, String>,
    #[serde(default)]
    pub externals: BTreeMap<String, ExternalSpec>,
}

/// Options consulted by the resource loader.
///
/// These are process-wide for a running engine and may be replaced at runtime
/// through `Includer::update_options`.
///
/// # Fields
/// * `root` - Prefix prepended to every resource location
/// * `cache_disabled` - Append a `?<millis>` cache-busting token to URLs
/// * `auto_remove` - Detach a resource from the host once it has loaded
/// * `alternate_attachment` - Point resources at their URL through `xlink:href`
/// * `extension` - Suffix appended to every resource key (defaults to `.js`)
/// * `resolve_timeout_ms` - Fail requests still pending after this long
/// * `report_loading` - Also report a `loading` status when a fetch starts
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoaderOptions {
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub cache_disabled: bool,
    #[serde(default)]
    pub auto_remove: bool,
    #[serde(default)]
    pub alternate_attachment: bool,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub resolve_timeout_ms: Option<u64>,
    #[serde(default)]
    pub report_loading: bool,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            root: None,
            cache_disabled: false,
            auto_remove: false,
            alternate_attachment: false,
            extension: default_extension(),
            resolve_timeout_ms: None,
            report_loading: false,
        }
    }
}

impl LoaderOptions {
    /// The configured request timeout, if any.
    pub fn resolve_timeout(&self) -> Option<Duration> {
        self.resolve_timeout_ms.map(Duration::from_millis)
    }
}

/// Specification of an external unit.
///
/// Either a bare location (the external symbol defaults to the unit name and
/// there are no prerequisites) or a structured form.
///
/// # Example
/// ```yaml
/// Underscore:
///   path: vendor/underscore-1.4.4.min
///   global: _
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ExternalSpec {
    Location(String),
    Detailed {
        #[serde(default)]
        path: Option<String>,
        #[serde(default, alias = "deps")]
        prerequisites: Vec<String>,
        #[serde(default, alias = "global")]
        symbol: Option<String>,
    },
}

impl ExternalSpec {
    pub fn location(&self) -> Option<&str> {
        match self {
            ExternalSpec::Location(location) => Some(location),
            ExternalSpec::Detailed { path, .. } => path.as_deref(),
        }
    }

    pub fn prerequisites(&self) -> &[String] {
        match self {
            ExternalSpec::Location(_) => &[],
            ExternalSpec::Detailed { prerequisites, .. } => prerequisites,
        }
    }

    /// The global symbol to recover after loading; defaults to `name`.
    pub fn symbol_or<'a>(&'a self, name: &'a str) -> &'a str {
        match self {
            ExternalSpec::Detailed {
                symbol: Some(symbol),
                ..
            } => symbol,
            _ => name,
        }
    }
}

impl From<&str> for ExternalSpec {
    fn from(location: &str) -> Self {
        ExternalSpec::Location(location.to_string())
    }
}

/// Load a config from a YAML or TOML file, chosen by extension
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    match extension {
        "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
        "toml" => Ok(toml::from_str(&content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

/// Load and validate a config file
///
/// This function loads the configuration and validates it to ensure no name is
/// declared twice with different locations, every external prerequisite is
/// declared, and external units do not require themselves.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
loader:
  root: js/
  cache_disabled: true
paths:
  app: src/app
externals:
  jQuery: vendor/jquery
  jQuery-UI:
    path: vendor/jquery-ui
    deps: [jQuery]
    global: jQuery
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.loader.root.as_deref(), Some("js/"));
        assert!(cfg.loader.cache_disabled);
        assert_eq!(cfg.loader.extension, ".js");
        assert_eq!(cfg.paths["app"], "src/app");
        assert_eq!(cfg.externals["jQuery"], ExternalSpec::from("vendor/jquery"));

        let ui = &cfg.externals["jQuery-UI"];
        assert_eq!(ui.location(), Some("vendor/jquery-ui"));
        assert_eq!(ui.prerequisites(), ["jQuery".to_string()]);
        assert_eq!(ui.symbol_or("jQuery-UI"), "jQuery");
    }

    #[test]
    fn test_loader_options_defaults() {
        let cfg: Config = serde_yaml::from_str("paths: {}").unwrap();

        assert_eq!(cfg.loader, LoaderOptions::default());
        assert_eq!(cfg.loader.resolve_timeout(), None);
        assert!(cfg.externals.is_empty());
    }

    #[test]
    fn test_external_spec_symbol_defaults_to_name() {
        let yaml = r#"
externals:
  Underscore:
    path: vendor/underscore
  Backbone:
    path: vendor/backbone
    prerequisites: [Underscore]
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(cfg.externals["Underscore"].symbol_or("Underscore"), "Underscore");
        assert_eq!(
            cfg.externals["Backbone"].prerequisites(),
            ["Underscore".to_string()]
        );
    }

    #[test]
    fn test_load_toml_config() {
        let toml = r#"
[loader]
root = "static/"
resolve_timeout_ms = 250

[paths]
main = "app/main"

[externals]
Lib = "vendor/lib"
"#;
        let file = write_temp(".toml", toml);

        let cfg = load_and_validate_config(file.path()).unwrap();
        assert_eq!(cfg.loader.root.as_deref(), Some("static/"));
        assert_eq!(cfg.loader.resolve_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(cfg.paths["main"], "app/main");
    }

    #[test]
    fn test_load_unsupported_extension() {
        let file = write_temp(".json", "{}");

        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(ext)) if ext == "json"));
    }

    #[test]
    fn test_load_and_validate_cyclic_config() {
        let yaml = r#"
externals:
  a:
    path: lib/a
    deps: [b]
  b:
    path: lib/b
    deps: [a]
"#;
        let file = write_temp(".yaml", yaml);

        let result = load_and_validate_config(file.path());
        let error_msg = result.unwrap_err().to_string();
        assert!(error_msg.contains("Cyclic dependency detected"));
    }

    #[test]
    fn test_load_and_validate_unresolved_dependency() {
        let yaml = r#"
externals:
  plugin:
    path: lib/plugin
    deps: [nonexistent]
"#;
        let file = write_temp(".yml", yaml);

        let result = load_and_validate_config(file.path());
        let error_msg = result.unwrap_err().to_string();
        assert!(error_msg.contains("depends on 'nonexistent' which does not exist"));
    }
}
