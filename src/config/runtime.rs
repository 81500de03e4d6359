// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{Config, PathRegistry};
use crate::engine::IncluderBuilder;
use crate::errors::IncludeError;
use crate::traits::ResourceHost;
use std::sync::Arc;

/// Engine builder - turns a loaded configuration into a ready-to-start engine.
///
/// The `RuntimeBuilder` populates a [`PathRegistry`] from the configuration's
/// paths and externals and carries its loader options over, leaving the
/// locator and observer for the caller to attach.
///
/// # Examples
///
/// ## Building an engine from configuration
/// ```
/// use the_includer::backends::{GlobalTable, StubResourceHost};
/// use the_includer::config::{Config, ExternalSpec, RuntimeBuilder};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut config = Config::default();
/// config.externals.insert("Lib".to_string(), ExternalSpec::from("vendor/lib"));
///
/// let globals = GlobalTable::new();
/// let host = Arc::new(StubResourceHost::new(globals.clone()));
/// let includer = RuntimeBuilder::from_config(&config, host)
///     .unwrap()
///     .locator(globals)
///     .build()
///     .unwrap();
///
/// // The engine is running and knows every configured unit
/// assert!(includer.is_running());
/// # }
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Prepare an engine for `cfg` backed by `host`.
    ///
    /// # Arguments
    /// * `cfg` - Configuration with loader options, paths and externals
    /// * `host` - The fetch primitive resources are dispatched to
    ///
    /// # Returns
    /// An [`IncluderBuilder`] with options and registry set, or the first
    /// registration error.
    pub fn from_config(
        cfg: &Config,
        host: Arc<dyn ResourceHost>,
    ) -> Result<IncluderBuilder, IncludeError> {
        let registry = PathRegistry::from_config(cfg)?;
        Ok(IncluderBuilder::with_host(host)
            .options(cfg.loader.clone())
            .registry(registry))
    }
}
