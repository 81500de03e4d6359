// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The public face of the engine.
//!
//! An [`Includer`] is a cheap, cloneable handle. Each call is shipped to the
//! engine task as a job and answered over a oneshot channel, so callers on any
//! task or thread see the same serialized state.
//!
//! # Example
//! ```
//! use the_includer::backends::{GlobalTable, StubBehavior, StubResourceHost};
//! use the_includer::engine::IncluderBuilder;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let globals = GlobalTable::new();
//! let host = StubResourceHost::new(globals.clone()).with(
//!     "vendor/lib.js",
//!     StubBehavior::Publish { symbol: "Lib".into(), value: json!({"version": 1}) },
//! );
//!
//! let includer = IncluderBuilder::new(host).locator(globals).build().unwrap();
//! includer.register_external("Lib", "vendor/lib").await.unwrap();
//!
//! let values = includer.require(["Lib"]).await.unwrap();
//! assert_eq!(values, vec![json!({"version": 1})]);
//! # }
//! ```

use crate::backends::GlobalTable;
use crate::config::consts::ENGINE_VERSION;
use crate::config::{ExternalSpec, LoaderOptions, PathRegistry};
use crate::engine::resolver::{run, Core, Factory, Target};
use crate::engine::scheduler::Scheduler;
use crate::engine::UnitValue;
use crate::errors::IncludeError;
use crate::observability::messages::engine::EngineStarted;
use crate::observability::messages::StructuredLog;
use crate::traits::{ExternalValueLocator, ProgressObserver, ResourceHost};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Handle onto a running resolution engine.
#[derive(Clone)]
pub struct Includer {
    scheduler: Scheduler<Core>,
    shutdown: CancellationToken,
}

impl Includer {
    /// Engine revision, for diagnostics.
    pub const VERSION: &'static str = ENGINE_VERSION;

    pub(crate) fn from_parts(scheduler: Scheduler<Core>, shutdown: CancellationToken) -> Self {
        Self {
            scheduler,
            shutdown,
        }
    }

    async fn call<T, F>(&self, f: F) -> Result<T, IncludeError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Core) -> T + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let queued = self.scheduler.defer_fn(move |core| {
            let _ = tx.send(f(core));
        });
        if !queued {
            return Err(IncludeError::EngineStopped);
        }
        rx.await.map_err(|_| IncludeError::EngineStopped)
    }

    /// Map `name` to a resource location.
    pub async fn register_path(
        &self,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<(), IncludeError> {
        let (name, location) = (name.into(), location.into());
        self.call(move |core| core.registry.register(&name, &location))
            .await?
            .map_err(IncludeError::from)
    }

    /// Batch form of [`register_path`](Self::register_path); all or nothing.
    pub async fn register_paths<I, N, L>(&self, mappings: I) -> Result<(), IncludeError>
    where
        I: IntoIterator<Item = (N, L)>,
        N: Into<String>,
        L: Into<String>,
    {
        let mappings: Vec<(String, String)> = mappings
            .into_iter()
            .map(|(n, l)| (n.into(), l.into()))
            .collect();
        self.call(move |core| {
            core.registry
                .register_all(mappings.iter().map(|(n, l)| (n.as_str(), l.as_str())))
        })
        .await?
        .map_err(IncludeError::from)
    }

    pub async fn register_external(
        &self,
        name: impl Into<String>,
        spec: impl Into<ExternalSpec>,
    ) -> Result<(), IncludeError> {
        let (name, spec) = (name.into(), spec.into());
        self.call(move |core| core.registry.register_external(&name, &spec))
            .await?
            .map_err(IncludeError::from)
    }

    /// Batch form of [`register_external`](Self::register_external); all or nothing.
    pub async fn register_externals<I, N>(&self, specs: I) -> Result<(), IncludeError>
    where
        I: IntoIterator<Item = (N, ExternalSpec)>,
        N: Into<String>,
    {
        let specs: Vec<(String, ExternalSpec)> =
            specs.into_iter().map(|(n, s)| (n.into(), s)).collect();
        self.call(move |core| {
            core.registry
                .register_externals(specs.iter().map(|(n, s)| (n.as_str(), s)))
        })
        .await?
        .map_err(IncludeError::from)
    }

    /// Define `name` as `factory` applied to its prerequisites' values.
    ///
    /// Returns once the request has been accepted; completion is observed by
    /// depending on `name`. A unit already being defined keeps its first
    /// definition.
    pub async fn resolve<I, S, F>(
        &self,
        name: impl Into<String>,
        prerequisites: I,
        factory: F,
    ) -> Result<(), IncludeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnOnce(Vec<UnitValue>) -> UnitValue + Send + 'static,
    {
        let target = Target::Unit {
            name: name.into(),
            factory: Factory::Function(Box::new(factory)),
        };
        let prerequisites: Vec<String> = prerequisites.into_iter().map(Into::into).collect();
        self.call(move |core| core.resolve(target, prerequisites))
            .await?
    }

    /// Resolve `units` and wait for their values, in the given order.
    pub async fn require<I, S>(&self, units: I) -> Result<Vec<UnitValue>, IncludeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (reply, values) = oneshot::channel();
        let prerequisites: Vec<String> = units.into_iter().map(Into::into).collect();
        self.call(move |core| core.resolve(Target::Reply(reply), prerequisites))
            .await??;

        match values.await {
            Ok(Ok(values)) => Ok(values),
            Ok(Err(failure)) => Err(IncludeError::Failed(failure)),
            Err(_) => Err(IncludeError::EngineStopped),
        }
    }

    /// [`require`](Self::require) bounded by `after`.
    pub async fn require_within<I, S>(
        &self,
        units: I,
        after: Duration,
    ) -> Result<Vec<UnitValue>, IncludeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let units: Vec<String> = units.into_iter().map(Into::into).collect();
        match tokio::time::timeout(after, self.require(units.clone())).await {
            Ok(result) => result,
            Err(_) => Err(IncludeError::Timeout { units, after }),
        }
    }

    /// The resolved value of `name`, if it has one yet.
    pub async fn value(&self, name: impl Into<String>) -> Result<Option<UnitValue>, IncludeError> {
        let name = name.into();
        self.call(move |core| core.values.get(&name).cloned()).await
    }

    /// Resources still outstanding.
    pub async fn remaining(&self) -> Result<usize, IncludeError> {
        self.call(|core| core.loader.remaining()).await
    }

    pub async fn options(&self) -> Result<LoaderOptions, IncludeError> {
        self.call(|core| core.options.clone()).await
    }

    /// Replace the loader options. A unit keeps the resource key it got when
    /// the engine first needed it, so only units not yet needed see a new
    /// `root`.
    pub async fn update_options(&self, options: LoaderOptions) -> Result<(), IncludeError> {
        self.call(move |core| core.options = options).await
    }

    /// Stop the engine task. Pending requests are dropped and later calls
    /// fail with `EngineStopped`.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.shutdown.is_cancelled() && !self.scheduler.is_closed()
    }
}

/// Configures and starts an engine.
pub struct IncluderBuilder {
    host: Arc<dyn ResourceHost>,
    options: LoaderOptions,
    registry: PathRegistry,
    locator: Option<Arc<dyn ExternalValueLocator>>,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl IncluderBuilder {
    pub fn new(host: impl ResourceHost + 'static) -> Self {
        Self::with_host(Arc::new(host))
    }

    pub fn with_host(host: Arc<dyn ResourceHost>) -> Self {
        Self {
            host,
            options: LoaderOptions::default(),
            registry: PathRegistry::new(),
            locator: None,
            observer: None,
        }
    }

    pub fn options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Start from a pre-populated registry.
    pub fn registry(mut self, registry: PathRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Where external values are recovered from. Defaults to an empty
    /// [`GlobalTable`].
    pub fn locator(mut self, locator: impl ExternalValueLocator + 'static) -> Self {
        self.locator = Some(Arc::new(locator));
        self
    }

    pub fn observer(mut self, observer: impl ProgressObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Spawn the engine task on the current tokio runtime.
    pub fn build(self) -> Result<Includer, IncludeError> {
        let runtime = Handle::try_current().map_err(|_| IncludeError::NoRuntime)?;
        let (scheduler, jobs) = Scheduler::channel();
        let shutdown = CancellationToken::new();
        let locator = self
            .locator
            .unwrap_or_else(|| Arc::new(GlobalTable::new()));

        EngineStarted {
            version: ENGINE_VERSION,
            registered_units: self.registry.len(),
        }
        .log();

        let core = Core::new(
            self.options,
            self.registry,
            scheduler.clone(),
            shutdown.clone(),
            self.host,
            locator,
            self.observer,
        );
        runtime.spawn(run(core, jobs));

        Ok(Includer::from_parts(scheduler, shutdown))
    }
}
