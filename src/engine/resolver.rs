// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The resolution engine.
//!
//! `Core` is the single context object owned by the engine task. Every piece
//! of cross-referential state lives here (registry, resolved values, bus,
//! loader, in-flight requests) and is only touched by jobs drained from the
//! scheduler, so one resolution step always sees a consistent picture.
//!
//! # Resolving a unit
//!
//! ```text
//! resolve(target, [A, B, C])
//!   ├── reject duplicates, cycles and unknown prerequisites
//!   ├── count resources that are newly needed
//!   ├── wait on A, B, C through the bus (one request id)
//!   ├── start A, B, C if nobody else already has
//!   │     external -> resolve(A, A's prerequisites) then locate A's symbol
//!   │     plain    -> load A's resource; it defines itself
//!   └── when all three have fired: factory(A, B, C) -> publish target
//! ```

use crate::config::consts::ANONYMOUS_REQUEST;
use crate::config::registry::find_cycle;
use crate::config::{LoaderOptions, PathRegistry};
use crate::engine::handle::Includer;
use crate::engine::loader::{Completion, ResourceLoader};
use crate::engine::notify::{NotificationBus, Outcome, Waiter};
use crate::engine::scheduler::{drain, Job, Scheduler};
use crate::engine::UnitValue;
use crate::errors::{IncludeError, UnitFailure};
use crate::observability::messages::engine::{
    DuplicateResolutionIgnored, EngineStopped, FactoryInvoked, RequestExpired,
    ResolutionRequested, UnitFailed, UnitPublished,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{ExternalValueLocator, ProgressObserver, ResourceHost};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Produces a unit's value from its prerequisites' values.
pub type FactoryFn = Box<dyn FnOnce(Vec<UnitValue>) -> UnitValue + Send + 'static>;

/// Reply channel for an anonymous request.
pub(crate) type Reply = oneshot::Sender<Result<Vec<UnitValue>, UnitFailure>>;

pub(crate) enum Factory {
    Function(FactoryFn),
    /// Recover an external unit's value through the locator.
    Locate { symbol: String },
}

pub(crate) enum Target {
    Unit { name: String, factory: Factory },
    Reply(Reply),
}

impl Target {
    fn unit(&self) -> &str {
        match self {
            Target::Unit { name, .. } => name,
            Target::Reply(_) => ANONYMOUS_REQUEST,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RequestId(u64);

impl Waiter<Core> for RequestId {
    fn notify(self, core: &mut Core, event: &str, outcome: Outcome) {
        core.prerequisite_settled(self, event, outcome);
    }
}

/// One in-flight call to `resolve`.
struct Request {
    unit: String,
    target: Target,
    prerequisites: Vec<String>,
    satisfied: usize,
}

pub(crate) struct Core {
    pub(crate) options: LoaderOptions,
    pub(crate) registry: PathRegistry,
    pub(crate) values: HashMap<String, UnitValue>,
    pub(crate) bus: NotificationBus<Core, RequestId>,
    pub(crate) loader: ResourceLoader,
    requests: HashMap<RequestId, Request>,
    /// Units with an accepted definition that have not published or failed.
    defining: HashSet<String>,
    /// Prerequisites of those definitions, for request-time cycle checks.
    dependencies: HashMap<String, Vec<String>>,
    /// Pending timeout tasks; aborted as soon as their request settles.
    timers: HashMap<RequestId, JoinHandle<()>>,
    next_request: u64,
    pub(crate) scheduler: Scheduler<Core>,
    shutdown: CancellationToken,
    pub(crate) host: Arc<dyn ResourceHost>,
    locator: Arc<dyn ExternalValueLocator>,
    pub(crate) observer: Option<Arc<dyn ProgressObserver>>,
}

impl Core {
    pub(crate) fn new(
        options: LoaderOptions,
        registry: PathRegistry,
        scheduler: Scheduler<Core>,
        shutdown: CancellationToken,
        host: Arc<dyn ResourceHost>,
        locator: Arc<dyn ExternalValueLocator>,
        observer: Option<Arc<dyn ProgressObserver>>,
    ) -> Self {
        Self {
            options,
            registry,
            values: HashMap::new(),
            bus: NotificationBus::new(scheduler.clone()),
            loader: ResourceLoader::new(),
            requests: HashMap::new(),
            defining: HashSet::new(),
            dependencies: HashMap::new(),
            timers: HashMap::new(),
            next_request: 0,
            scheduler,
            shutdown,
            host,
            locator,
            observer,
        }
    }

    /// A handle onto this engine, as given to hosts.
    pub(crate) fn handle(&self) -> Includer {
        Includer::from_parts(self.scheduler.clone(), self.shutdown.clone())
    }

    pub(crate) fn in_flight_requests(&self) -> usize {
        self.requests.len()
    }

    /// Accept a resolution request.
    ///
    /// Errors are returned before any work is scheduled. A named target that
    /// is already defined or being defined is ignored.
    pub(crate) fn resolve(
        &mut self,
        target: Target,
        prerequisites: Vec<String>,
    ) -> Result<(), IncludeError> {
        if let Target::Unit { name, .. } = &target {
            if self.is_defined(name) {
                tracing::warn!("{}", DuplicateResolutionIgnored { unit: name });
                return Ok(());
            }
            if let Some(cycle) = find_cycle(name, &prerequisites, |n| self.edges(n)) {
                return Err(IncludeError::CyclicDependency { cycle });
            }
        }
        self.validate(target.unit(), &prerequisites)?;

        let unique = unique(&prerequisites);
        let mut newly_tracked = 0;
        for prerequisite in &unique {
            if self.needs_fetch(prerequisite) && !self.bus.is_available(prerequisite) {
                let key = self.resource_key_for(prerequisite);
                if self.loader.track(&key) {
                    newly_tracked += 1;
                }
            }
        }
        if let Target::Unit { name, .. } = &target {
            if self.registry.is_external(name) && !self.bus.is_available(name) {
                let key = self.resource_key_for(name);
                if self.loader.track(&key) {
                    newly_tracked += 1;
                }
            }
            self.defining.insert(name.clone());
            self.dependencies
                .insert(name.clone(), prerequisites.clone());
        }

        let unit = target.unit().to_string();
        let requested = ResolutionRequested {
            unit: &unit,
            prerequisite_count: prerequisites.len(),
            newly_tracked,
        };
        requested.log();
        let span = requested.span("resolve");
        let _entered = span.enter();

        let request = Request {
            unit,
            target,
            prerequisites,
            satisfied: 0,
        };
        if request.prerequisites.is_empty() {
            self.complete(request);
            return Ok(());
        }

        let fresh: Vec<String> = unique
            .into_iter()
            .filter(|p| !self.bus.is_available(p) && !self.is_defined(p))
            .collect();

        let id = RequestId(self.next_request);
        self.next_request += 1;
        for prerequisite in &request.prerequisites {
            self.bus.on(prerequisite, id);
        }
        self.requests.insert(id, request);

        for prerequisite in fresh {
            self.start_prerequisite(&prerequisite);
        }
        self.arm_timeout(id);
        Ok(())
    }

    /// Defined, being defined, or already failed.
    fn is_defined(&self, name: &str) -> bool {
        self.defining.contains(name) || self.values.contains_key(name) || self.bus.is_fired(name)
    }

    fn is_known(&self, name: &str) -> bool {
        self.registry.contains(name) || self.bus.is_available(name) || self.is_defined(name)
    }

    /// Registered, not resolved, and nobody is defining it yet.
    fn needs_fetch(&self, name: &str) -> bool {
        self.registry.contains(name) && !self.is_defined(name)
    }

    fn edges(&self, name: &str) -> Vec<String> {
        match self.registry.get(name) {
            Some(descriptor) if descriptor.external => descriptor.prerequisites.clone(),
            _ => self.dependencies.get(name).cloned().unwrap_or_default(),
        }
    }

    /// Every prerequisite, and every prerequisite of an external that will
    /// have to be started, must be known.
    fn validate(&self, unit: &str, prerequisites: &[String]) -> Result<(), IncludeError> {
        let mut seen = HashSet::new();
        let mut queue: VecDeque<(&str, &str)> =
            prerequisites.iter().map(|p| (unit, p.as_str())).collect();

        while let Some((owner, name)) = queue.pop_front() {
            if !seen.insert(name) {
                continue;
            }
            if !self.is_known(name) {
                return Err(IncludeError::MissingDescriptor {
                    unit: owner.to_string(),
                    prerequisite: name.to_string(),
                });
            }
            if self.bus.is_available(name) || self.is_defined(name) {
                continue;
            }
            if let Some(descriptor) = self.registry.get(name).filter(|d| d.external) {
                queue.extend(descriptor.prerequisites.iter().map(|p| (name, p.as_str())));
            }
        }
        Ok(())
    }

    /// Kick off the work that will eventually fire `name`.
    fn start_prerequisite(&mut self, name: &str) {
        let Some(descriptor) = self.registry.get(name) else {
            return;
        };

        if descriptor.external {
            let target = Target::Unit {
                name: name.to_string(),
                factory: Factory::Locate {
                    symbol: descriptor.symbol.clone(),
                },
            };
            let prerequisites = descriptor.prerequisites.clone();
            if let Err(e) = self.resolve(target, prerequisites) {
                self.fail_unit(
                    name,
                    UnitFailure::Rejected {
                        name: name.to_string(),
                        reason: e.to_string(),
                    },
                );
            }
        } else {
            let unit = name.to_string();
            let completion: Completion =
                Box::new(move |core, outcome| core.settle_plain_load(&unit, outcome));
            self.load(name, Some(completion));
        }
    }

    fn prerequisite_settled(&mut self, id: RequestId, event: &str, outcome: Outcome) {
        let Some(request) = self.requests.get_mut(&id) else {
            return;
        };

        if let Err(cause) = outcome {
            self.disarm(id);
            if let Some(request) = self.requests.remove(&id) {
                let failure = match &request.target {
                    Target::Unit { name, .. } => UnitFailure::DependencyFailed {
                        name: name.clone(),
                        dependency: event.to_string(),
                        cause: Box::new(cause),
                    },
                    Target::Reply(_) => cause,
                };
                self.fail_target(request.target, failure);
            }
            return;
        }

        request.satisfied += 1;
        if request.satisfied == request.prerequisites.len() {
            self.disarm(id);
            if let Some(request) = self.requests.remove(&id) {
                self.complete(request);
            }
        }
    }

    /// Every prerequisite has fired: gather values in declared order.
    fn complete(&mut self, request: Request) {
        let arguments: Vec<UnitValue> = request
            .prerequisites
            .iter()
            .map(|p| self.values.get(p).cloned().unwrap_or_default())
            .collect();

        match request.target {
            Target::Reply(reply) => {
                let _ = reply.send(Ok(arguments));
            }
            Target::Unit { name, factory } => {
                if self.registry.is_external(&name) {
                    let unit = name.clone();
                    let completion: Completion = Box::new(move |core, outcome| match outcome {
                        Ok(()) => core.invoke_and_publish(&unit, factory, arguments),
                        Err(failure) => core.fail_unit(&unit, failure),
                    });
                    self.load(&name, Some(completion));
                } else {
                    self.invoke_and_publish(&name, factory, arguments);
                }
            }
        }
    }

    fn invoke_and_publish(&mut self, name: &str, factory: Factory, arguments: Vec<UnitValue>) {
        let value = match factory {
            Factory::Function(factory) => {
                tracing::debug!(
                    "{}",
                    FactoryInvoked {
                        unit: name,
                        argument_count: arguments.len(),
                    }
                );
                factory(arguments)
            }
            Factory::Locate { symbol } => match self.locator.locate(&symbol) {
                Some(value) => value,
                None => {
                    return self.fail_unit(
                        name,
                        UnitFailure::SymbolNotFound {
                            name: name.to_string(),
                            symbol,
                        },
                    )
                }
            },
        };

        self.values.entry(name.to_string()).or_insert(value);
        self.defining.remove(name);
        self.dependencies.remove(name);
        tracing::debug!(
            "{}",
            UnitPublished {
                unit: name,
                external: self.registry.is_external(name),
            }
        );
        self.bus.trigger(name, Ok(()));
    }

    /// A plain unit's resource finished; it should have defined the unit.
    fn settle_plain_load(&mut self, name: &str, outcome: Outcome) {
        if self.is_defined(name) {
            return;
        }
        let failure = match outcome {
            Err(failure) => failure,
            Ok(()) => UnitFailure::NotDefined {
                name: name.to_string(),
                location: self.registry.location_for(name).to_string(),
            },
        };
        self.fail_unit(name, failure);
    }

    fn fail_target(&mut self, target: Target, failure: UnitFailure) {
        match target {
            Target::Unit { name, .. } => self.fail_unit(&name, failure),
            Target::Reply(reply) => {
                UnitFailed {
                    unit: ANONYMOUS_REQUEST,
                    error: &failure,
                }
                .log();
                let _ = reply.send(Err(failure));
            }
        }
    }

    fn fail_unit(&mut self, name: &str, failure: UnitFailure) {
        UnitFailed {
            unit: name,
            error: &failure,
        }
        .log();
        self.defining.remove(name);
        self.dependencies.remove(name);
        self.loader.untrack_unit(name);
        self.bus.trigger(name, Err(failure));
    }

    fn arm_timeout(&mut self, id: RequestId) {
        let Some(after) = self.options.resolve_timeout() else {
            return;
        };
        let scheduler = self.scheduler.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            scheduler.defer_fn(move |core| core.expire(id, after));
        });
        self.timers.insert(id, timer);
    }

    fn disarm(&mut self, id: RequestId) {
        if let Some(timer) = self.timers.remove(&id) {
            timer.abort();
        }
    }

    fn disarm_all(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
    }

    fn expire(&mut self, id: RequestId, after: Duration) {
        self.timers.remove(&id);
        let Some(request) = self.requests.remove(&id) else {
            return;
        };
        RequestExpired {
            unit: &request.unit,
            satisfied: request.satisfied,
            prerequisite_count: request.prerequisites.len(),
            after,
        }
        .log();
        let failure = UnitFailure::TimedOut {
            name: request.unit.clone(),
            after,
        };
        self.fail_target(request.target, failure);
    }
}

fn unique(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|n| seen.insert(n.as_str()))
        .cloned()
        .collect()
}

/// The engine task: drain jobs against `core` until shut down.
pub(crate) async fn run(mut core: Core, jobs: mpsc::UnboundedReceiver<Job<Core>>) {
    let shutdown = core.shutdown.clone();
    drain(&mut core, jobs, shutdown).await;
    core.disarm_all();
    tracing::info!(
        "{}",
        EngineStopped {
            in_flight_requests: core.in_flight_requests(),
        }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::GlobalTable;
    use crate::config::ExternalSpec;
    use crate::traits::{LoadableResource, ProgressReport};
    use crate::engine::CompletionSignal;
    use serde_json::json;
    use std::sync::Mutex;

    /// Host that keeps every signal so tests can complete loads by hand.
    #[derive(Default)]
    struct ManualHost {
        signals: Mutex<Vec<(String, CompletionSignal)>>,
    }

    impl ResourceHost for ManualHost {
        fn attach(&self, resource: &LoadableResource, signal: CompletionSignal, _: &Includer) {
            self.signals
                .lock()
                .unwrap()
                .push((resource.url.clone(), signal));
        }
    }

    impl ManualHost {
        fn complete(&self, url: &str) {
            let signals = self.signals.lock().unwrap();
            let (_, signal) = signals.iter().find(|(u, _)| u == url).unwrap();
            signal.loaded();
        }

        fn urls(&self) -> Vec<String> {
            self.signals
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }
    }

    struct Fixture {
        core: Core,
        jobs: mpsc::UnboundedReceiver<Job<Core>>,
        host: Arc<ManualHost>,
        globals: GlobalTable,
        reports: Arc<Mutex<Vec<ProgressReport>>>,
    }

    impl Fixture {
        fn new(registry: PathRegistry) -> Self {
            let (scheduler, jobs) = Scheduler::channel();
            let host = Arc::new(ManualHost::default());
            let globals = GlobalTable::new();
            let reports = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&reports);
            let observer: Arc<dyn ProgressObserver> =
                Arc::new(move |report: &ProgressReport| sink.lock().unwrap().push(report.clone()));

            let core = Core::new(
                LoaderOptions::default(),
                registry,
                scheduler,
                CancellationToken::new(),
                host.clone(),
                Arc::new(globals.clone()),
                Some(observer),
            );
            Self {
                core,
                jobs,
                host,
                globals,
                reports,
            }
        }

        fn run_pending(&mut self) {
            while let Ok(job) = self.jobs.try_recv() {
                job(&mut self.core);
            }
        }
    }

    fn unit(name: &str, factory: impl FnOnce(Vec<UnitValue>) -> UnitValue + Send + 'static) -> Target {
        Target::Unit {
            name: name.to_string(),
            factory: Factory::Function(Box::new(factory)),
        }
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_counter_tracks_shared_prerequisites_once() {
        let mut registry = PathRegistry::new();
        registry.register_external("Shared", &ExternalSpec::from("lib/shared")).unwrap();
        let mut fx = Fixture::new(registry);

        fx.core.resolve(unit("A", |_| json!("a")), names(&["Shared"])).unwrap();
        fx.core.resolve(unit("B", |_| json!("b")), names(&["Shared"])).unwrap();

        assert_eq!(fx.core.loader.remaining(), 1);
        assert_eq!(fx.host.urls(), vec!["lib/shared.js"]);

        fx.globals.publish("Shared", json!(42));
        fx.host.complete("lib/shared.js");
        fx.run_pending();

        assert_eq!(fx.core.loader.remaining(), 0);
        assert_eq!(fx.core.values["A"], json!("a"));
        assert_eq!(fx.core.values["B"], json!("b"));
        assert_eq!(fx.core.in_flight_requests(), 0);

        let reports = fx.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].remaining, 0);
    }

    #[tokio::test]
    async fn test_factory_receives_values_in_declared_order() {
        let mut registry = PathRegistry::new();
        for name in ["A", "B", "C"] {
            registry
                .register_external(name, &ExternalSpec::from(format!("lib/{name}").as_str()))
                .unwrap();
        }
        let mut fx = Fixture::new(registry);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        fx.core
            .resolve(
                unit("App", move |args| {
                    sink.lock().unwrap().extend(args);
                    json!("app")
                }),
                names(&["A", "B", "C"]),
            )
            .unwrap();
        assert_eq!(fx.core.loader.remaining(), 3);

        for (name, url) in [("C", "lib/C.js"), ("A", "lib/A.js"), ("B", "lib/B.js")] {
            fx.globals.publish(name, json!(name));
            fx.host.complete(url);
            fx.run_pending();
        }

        assert_eq!(*seen.lock().unwrap(), vec![json!("A"), json!("B"), json!("C")]);
        assert_eq!(fx.core.loader.remaining(), 0);
    }

    #[tokio::test]
    async fn test_second_definition_is_ignored() {
        let mut fx = Fixture::new(PathRegistry::new());

        fx.core.resolve(unit("Once", |_| json!(1)), vec![]).unwrap();
        fx.core.resolve(unit("Once", |_| json!(2)), vec![]).unwrap();

        assert_eq!(fx.core.values["Once"], json!(1));
    }

    #[tokio::test]
    async fn test_validation_happens_before_any_work() {
        let mut registry = PathRegistry::new();
        registry
            .register_external(
                "Plugin",
                &ExternalSpec::Detailed {
                    path: Some("lib/plugin".to_string()),
                    prerequisites: names(&["Ghost"]),
                    symbol: None,
                },
            )
            .unwrap();
        let mut fx = Fixture::new(registry);

        let result = fx.core.resolve(unit("App", |_| json!(null)), names(&["Plugin"]));

        assert_eq!(
            result,
            Err(IncludeError::MissingDescriptor {
                unit: "Plugin".to_string(),
                prerequisite: "Ghost".to_string(),
            })
        );
        assert!(fx.host.urls().is_empty());
        assert_eq!(fx.core.loader.remaining(), 0);
        assert!(!fx.core.bus.is_available("Plugin"));
    }

    #[tokio::test]
    async fn test_cycle_through_in_flight_definitions() {
        let mut registry = PathRegistry::new();
        registry.register("a", "lib/a").unwrap();
        registry.register("b", "lib/b").unwrap();
        let mut fx = Fixture::new(registry);

        fx.core.resolve(unit("a", |_| json!("a")), names(&["b"])).unwrap();
        let result = fx.core.resolve(unit("b", |_| json!("b")), names(&["a"]));

        assert_eq!(
            result,
            Err(IncludeError::CyclicDependency {
                cycle: names(&["b", "a", "b"]),
            })
        );
    }

    #[tokio::test]
    async fn test_plain_resource_that_never_defines_fails() {
        let mut registry = PathRegistry::new();
        registry.register("Mod", "lib/mod").unwrap();
        let mut fx = Fixture::new(registry);
        let (tx, mut rx) = oneshot::channel();

        fx.core.resolve(Target::Reply(tx), names(&["Mod"])).unwrap();
        fx.host.complete("lib/mod.js");
        fx.run_pending();

        let failure = rx.try_recv().unwrap().unwrap_err();
        assert_eq!(
            failure,
            UnitFailure::NotDefined {
                name: "Mod".to_string(),
                location: "lib/mod".to_string(),
            }
        );
        assert_eq!(fx.core.loader.remaining(), 0);
    }

    #[tokio::test]
    async fn test_settled_requests_cancel_their_timeout() {
        let mut registry = PathRegistry::new();
        registry.register_external("Lib", &ExternalSpec::from("lib/lib")).unwrap();
        registry.register("Broken", "lib/broken").unwrap();
        let mut fx = Fixture::new(registry);
        fx.core.options.resolve_timeout_ms = Some(60 * 60 * 1000);
        let (ok_tx, mut ok_rx) = oneshot::channel();
        let (err_tx, mut err_rx) = oneshot::channel();

        fx.core.resolve(Target::Reply(ok_tx), names(&["Lib"])).unwrap();
        fx.core.resolve(Target::Reply(err_tx), names(&["Broken"])).unwrap();
        assert_eq!(fx.core.timers.len(), 2);

        fx.globals.publish("Lib", json!("lib"));
        fx.host.complete("lib/lib.js");
        fx.host.complete("lib/broken.js");
        fx.run_pending();

        assert_eq!(ok_rx.try_recv().unwrap().unwrap(), vec![json!("lib")]);
        assert!(err_rx.try_recv().unwrap().is_err());
        assert!(fx.core.timers.is_empty());
        assert_eq!(fx.core.in_flight_requests(), 0);
    }

    #[tokio::test]
    async fn test_failed_nested_external_is_untracked() {
        let mut registry = PathRegistry::new();
        registry.register_external("Base", &ExternalSpec::from("lib/base")).unwrap();
        registry
            .register_external(
                "Plugin",
                &ExternalSpec::Detailed {
                    path: Some("lib/plugin".to_string()),
                    prerequisites: names(&["Base"]),
                    symbol: None,
                },
            )
            .unwrap();
        let mut fx = Fixture::new(registry);
        let (tx, mut rx) = oneshot::channel();

        fx.core.resolve(Target::Reply(tx), names(&["Plugin"])).unwrap();
        assert_eq!(fx.core.loader.remaining(), 2);

        // Base loads but never exposes its symbol.
        fx.host.complete("lib/base.js");
        fx.run_pending();

        let failure = rx.try_recv().unwrap().unwrap_err();
        assert!(matches!(
            failure.root_cause(),
            UnitFailure::SymbolNotFound { name, .. } if name == "Base"
        ));
        assert_eq!(fx.core.loader.remaining(), 0);
        assert_eq!(fx.host.urls(), vec!["lib/base.js"]);
    }
}
