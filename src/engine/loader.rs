// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The resource loader.
//!
//! Turns a unit name into a URL, hands each distinct resource to the host at
//! most once, and turns the host's completion signal back into an engine job.
//! It also owns the outstanding-resource counter reported to the observer.
//!
//! # Counting
//!
//! The counter is the size of a set of resource keys: a key is added when a
//! resolution first learns it will need the resource, or when the resource is
//! dispatched, and removed when the resource finishes (or when the unit fails
//! before the resource was ever dispatched). Adding a key twice is a no-op, so
//! overlapping requests that share a prerequisite count it once and the value
//! cannot drop below zero.

use crate::config::consts::DROPPED_SIGNAL_REASON;
use crate::config::LoaderOptions;
use crate::engine::notify::Outcome;
use crate::engine::resolver::Core;
use crate::engine::scheduler::Scheduler;
use crate::errors::UnitFailure;
use crate::observability::messages::loader::{
    ResourceAlreadyDispatched, ResourceDetached, ResourceDispatched, ResourceLoadFailed,
    ResourceLoaded,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{AttachmentMode, LoadStatus, LoadableResource, ProgressReport};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Continuation run on the owner task once a resource has finished.
pub(crate) type Completion = Box<dyn FnOnce(&mut Core, Outcome) + Send + 'static>;

enum Dispatch {
    InFlight {
        resource: LoadableResource,
        parked: Vec<Completion>,
    },
    Done(Outcome),
}

/// Loaded-URL set plus the outstanding counter.
#[derive(Default)]
pub struct ResourceLoader {
    dispatched: HashMap<String, Dispatch>,
    outstanding: HashSet<String>,
    /// Unit name -> resource key, fixed the first time the unit is needed.
    keys: HashMap<String, String>,
}

impl ResourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `key` as outstanding unless its resource already finished.
    ///
    /// Returns true when the key was newly counted.
    pub fn track(&mut self, key: &str) -> bool {
        if matches!(self.dispatched.get(key), Some(Dispatch::Done(_))) {
            return false;
        }
        self.outstanding.insert(key.to_string())
    }

    /// Stop counting a key whose resource will never be dispatched.
    pub fn untrack(&mut self, key: &str) -> bool {
        if self.dispatched.contains_key(key) {
            return false;
        }
        self.outstanding.remove(key)
    }

    /// Untrack whatever key `name` was pinned to, if it was ever needed.
    pub fn untrack_unit(&mut self, name: &str) -> bool {
        match self.keys.get(name).cloned() {
            Some(key) => self.untrack(&key),
            None => false,
        }
    }

    /// The key pinned for `name`, deriving it on first use.
    ///
    /// Later option changes never move a unit to another key, so whatever
    /// was counted for it is also what its completion removes.
    pub fn key_for(&mut self, name: &str, derive: impl FnOnce() -> String) -> String {
        self.keys
            .entry(name.to_string())
            .or_insert_with(derive)
            .clone()
    }

    pub fn remaining(&self) -> usize {
        self.outstanding.len()
    }
}

/// The loaded-URL key: root prefix plus location, before extension and
/// cache-buster.
pub fn resource_key(options: &LoaderOptions, location: &str) -> String {
    format!("{}{}", options.root.as_deref().unwrap_or_default(), location)
}

/// The URL handed to the host for `key`.
pub fn resource_url(options: &LoaderOptions, key: &str) -> String {
    let mut url = format!("{}{}", key, options.extension);
    if options.cache_disabled {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        url.push_str(&format!("?{}", millis));
    }
    url
}

/// Host-side readiness states, mirroring a script element's `readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Uninitialized,
    Loading,
    Loaded,
    Interactive,
    Complete,
}

/// Handed to the host with each dispatched resource.
///
/// Any clone may complete it; only the first `loaded`, `failed` or
/// completing `ready_state_changed` counts. If every clone is dropped
/// without completing, the resource fails.
#[derive(Clone)]
pub struct CompletionSignal {
    inner: Arc<SignalInner>,
}

struct SignalInner {
    key: String,
    fired: AtomicBool,
    scheduler: Scheduler<Core>,
}

impl CompletionSignal {
    pub(crate) fn new(key: String, scheduler: Scheduler<Core>) -> Self {
        Self {
            inner: Arc::new(SignalInner {
                key,
                fired: AtomicBool::new(false),
                scheduler,
            }),
        }
    }

    /// Returns false if the signal had already fired.
    pub fn loaded(&self) -> bool {
        self.settle(Ok(()))
    }

    pub fn failed(&self, reason: impl Into<String>) -> bool {
        self.settle(Err(reason.into()))
    }

    /// `Loaded` and `Complete` complete the signal; other states are ignored.
    pub fn ready_state_changed(&self, state: ReadyState) -> bool {
        match state {
            ReadyState::Loaded | ReadyState::Complete => self.loaded(),
            _ => false,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.inner.fired.load(Ordering::Acquire)
    }

    fn settle(&self, result: Result<(), String>) -> bool {
        if self.inner.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        let key = self.inner.key.clone();
        self.inner
            .scheduler
            .defer_fn(move |core| core.finish_load(&key, result));
        true
    }
}

impl Drop for SignalInner {
    fn drop(&mut self) {
        if *self.fired.get_mut() {
            return;
        }
        let key = std::mem::take(&mut self.key);
        self.scheduler.defer_fn(move |core| {
            core.finish_load(&key, Err(DROPPED_SIGNAL_REASON.to_string()))
        });
    }
}

impl Core {
    pub(crate) fn resource_key_for(&mut self, name: &str) -> String {
        let options = &self.options;
        let registry = &self.registry;
        self.loader
            .key_for(name, || resource_key(options, registry.location_for(name)))
    }

    /// Load the resource backing `name`.
    ///
    /// The first load of a key dispatches it to the host. Later loads never
    /// refetch: their completion is parked until the first load finishes, or
    /// replayed on a later turn if it already has.
    pub(crate) fn load(&mut self, name: &str, completion: Option<Completion>) {
        let key = self.resource_key_for(name);

        match self.loader.dispatched.get_mut(&key) {
            Some(Dispatch::InFlight { parked, .. }) => {
                tracing::trace!(
                    "{}",
                    ResourceAlreadyDispatched {
                        unit: name,
                        key: &key,
                        in_flight: true,
                    }
                );
                parked.extend(completion);
                return;
            }
            Some(Dispatch::Done(outcome)) => {
                tracing::trace!(
                    "{}",
                    ResourceAlreadyDispatched {
                        unit: name,
                        key: &key,
                        in_flight: false,
                    }
                );
                if let Some(completion) = completion {
                    let outcome = outcome.clone();
                    self.scheduler
                        .defer_fn(move |core| completion(core, outcome));
                }
                return;
            }
            None => {}
        }

        let attachment = if self.options.alternate_attachment {
            AttachmentMode::XlinkHref
        } else {
            AttachmentMode::Source
        };
        let resource = LoadableResource {
            unit: name.to_string(),
            url: resource_url(&self.options, &key),
            attachment,
        };

        self.loader.outstanding.insert(key.clone());
        self.loader.dispatched.insert(
            key.clone(),
            Dispatch::InFlight {
                resource: resource.clone(),
                parked: completion.into_iter().collect(),
            },
        );

        tracing::debug!(
            "{}",
            ResourceDispatched {
                unit: name,
                url: &resource.url,
                attribute: attachment.attribute(),
            }
        );
        if self.options.report_loading {
            self.report(&resource, LoadStatus::Loading);
        }

        let signal = CompletionSignal::new(key, self.scheduler.clone());
        let includer = self.handle();
        let host = Arc::clone(&self.host);
        host.attach(&resource, signal, &includer);
    }

    /// Host completion for `key`, delivered through the scheduler.
    pub(crate) fn finish_load(&mut self, key: &str, result: Result<(), String>) {
        let (resource, parked) = match self.loader.dispatched.remove(key) {
            Some(Dispatch::InFlight { resource, parked }) => (resource, parked),
            Some(done) => {
                self.loader.dispatched.insert(key.to_string(), done);
                return;
            }
            None => return,
        };

        let outcome = result.map_err(|reason| UnitFailure::LoadFailure {
            name: resource.unit.clone(),
            url: resource.url.clone(),
            reason,
        });
        self.loader
            .dispatched
            .insert(key.to_string(), Dispatch::Done(outcome.clone()));

        if self.options.auto_remove {
            self.host.detach(&resource);
            tracing::debug!(
                "{}",
                ResourceDetached {
                    unit: &resource.unit,
                    url: &resource.url,
                }
            );
        }

        self.loader.outstanding.remove(key);
        let remaining = self.loader.remaining();
        match &outcome {
            Ok(()) => {
                ResourceLoaded {
                    unit: &resource.unit,
                    url: &resource.url,
                    remaining,
                }
                .log();
                self.report(&resource, LoadStatus::Loaded);
            }
            Err(failure) => {
                let reason = match failure {
                    UnitFailure::LoadFailure { reason, .. } => reason.as_str(),
                    _ => "",
                };
                ResourceLoadFailed {
                    unit: &resource.unit,
                    url: &resource.url,
                    reason,
                }
                .log();
                self.report(&resource, LoadStatus::Failed);
            }
        }

        for completion in parked {
            let outcome = outcome.clone();
            self.scheduler
                .defer_fn(move |core| completion(core, outcome));
        }
    }

    fn report(&self, resource: &LoadableResource, status: LoadStatus) {
        if let Some(observer) = &self.observer {
            observer.on_progress(&ProgressReport {
                filename: resource.url.clone(),
                name: resource.unit.clone(),
                status,
                remaining: self.loader.remaining(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_url_derivation() {
        struct TestCase {
            name: &'static str,
            root: Option<&'static str>,
            extension: &'static str,
            location: &'static str,
            expected_key: &'static str,
            expected_url: &'static str,
        }

        let test_cases = vec![
            TestCase {
                name: "bare location",
                root: None,
                extension: ".js",
                location: "vendor/lib",
                expected_key: "vendor/lib",
                expected_url: "vendor/lib.js",
            },
            TestCase {
                name: "root prefix",
                root: Some("static/"),
                extension: ".js",
                location: "vendor/lib",
                expected_key: "static/vendor/lib",
                expected_url: "static/vendor/lib.js",
            },
            TestCase {
                name: "custom extension",
                root: Some("units/"),
                extension: ".json",
                location: "app",
                expected_key: "units/app",
                expected_url: "units/app.json",
            },
        ];

        for test_case in test_cases {
            let options = LoaderOptions {
                root: test_case.root.map(str::to_string),
                extension: test_case.extension.to_string(),
                ..LoaderOptions::default()
            };

            let key = resource_key(&options, test_case.location);
            assert_eq!(key, test_case.expected_key, "Test case '{}'", test_case.name);
            assert_eq!(
                resource_url(&options, &key),
                test_case.expected_url,
                "Test case '{}'",
                test_case.name
            );
        }
    }

    #[test]
    fn test_cache_buster_is_a_millisecond_query() {
        let options = LoaderOptions {
            cache_disabled: true,
            ..LoaderOptions::default()
        };

        let url = resource_url(&options, "vendor/lib");
        let (path, token) = url.split_once('?').unwrap();

        assert_eq!(path, "vendor/lib.js");
        assert!(!token.is_empty());
        assert!(token.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_track_is_idempotent_and_never_negative() {
        let mut loader = ResourceLoader::new();

        assert!(loader.track("a"));
        assert!(!loader.track("a"));
        assert!(loader.track("b"));
        assert_eq!(loader.remaining(), 2);

        assert!(loader.untrack("a"));
        assert!(!loader.untrack("a"));
        assert!(!loader.untrack("never-tracked"));
        assert_eq!(loader.remaining(), 1);
    }

    #[test]
    fn test_finished_keys_are_not_tracked_again() {
        let mut loader = ResourceLoader::new();
        loader
            .dispatched
            .insert("done".to_string(), Dispatch::Done(Ok(())));

        assert!(!loader.track("done"));
        assert!(!loader.untrack("done"));
        assert_eq!(loader.remaining(), 0);
    }

    #[test]
    fn test_unit_keeps_its_first_key() {
        let mut loader = ResourceLoader::new();

        let first = loader.key_for("Lib", || "lib/lib".to_string());
        let second = loader.key_for("Lib", || "static/lib/lib".to_string());
        assert_eq!(first, "lib/lib");
        assert_eq!(second, "lib/lib");

        assert!(loader.track(&first));
        assert!(!loader.untrack_unit("Other"));
        assert!(loader.untrack_unit("Lib"));
        assert_eq!(loader.remaining(), 0);
    }

    #[tokio::test]
    async fn test_signal_fires_once() {
        let (scheduler, mut jobs) = Scheduler::<Core>::channel();
        let signal = CompletionSignal::new("vendor/lib".to_string(), scheduler);
        let clone = signal.clone();

        assert!(!signal.ready_state_changed(ReadyState::Interactive));
        assert!(signal.ready_state_changed(ReadyState::Complete));
        assert!(!clone.loaded());
        assert!(!clone.failed("late"));
        assert!(clone.is_settled());
        drop(signal);
        drop(clone);

        assert!(jobs.try_recv().is_ok());
        assert!(jobs.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dropped_signal_schedules_a_failure() {
        let (scheduler, mut jobs) = Scheduler::<Core>::channel();
        let signal = CompletionSignal::new("vendor/lib".to_string(), scheduler);
        let clone = signal.clone();

        drop(signal);
        assert!(jobs.try_recv().is_err());

        drop(clone);
        assert!(jobs.try_recv().is_ok());
    }
}
