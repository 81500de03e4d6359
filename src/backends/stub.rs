// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::{strip_query, GlobalTable};
use crate::engine::{CompletionSignal, Includer, ReadyState, UnitValue};
use crate::traits::{LoadableResource, ResourceHost};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// What the stub host does with a resource. Matched on the URL without its
/// cache-busting query.
#[derive(Debug, Clone, PartialEq)]
pub enum StubBehavior {
    /// Signal loaded.
    Loaded,
    /// Expose a global symbol, then signal loaded.
    Publish { symbol: String, value: UnitValue },
    /// Define a unit through the includer, then signal loaded.
    Define {
        name: String,
        prerequisites: Vec<String>,
        value: UnitValue,
    },
    /// Signal failed.
    Fail(String),
    /// Keep the signal and never complete it.
    Silent,
    /// Raise both completion signals, as some hosts do.
    DoubleSignal,
    /// Drop the signal without completing it.
    Drop,
}

/// A scriptable in-memory host for tests and demos.
///
/// Every attach is recorded and completes on a spawned task, after an optional
/// per-URL delay. URLs without a scripted behavior simply load.
#[derive(Default)]
pub struct StubResourceHost {
    globals: GlobalTable,
    behaviors: HashMap<String, StubBehavior>,
    delays: HashMap<String, Duration>,
    fetches: Arc<Mutex<Vec<LoadableResource>>>,
    detached: Arc<Mutex<Vec<String>>>,
    held: Mutex<Vec<CompletionSignal>>,
}

impl StubResourceHost {
    pub fn new(globals: GlobalTable) -> Self {
        Self {
            globals,
            ..Self::default()
        }
    }

    pub fn with(mut self, url: impl Into<String>, behavior: StubBehavior) -> Self {
        self.behaviors.insert(url.into(), behavior);
        self
    }

    pub fn with_delay(mut self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(url.into(), delay);
        self
    }

    /// Shared view of the fetch log, usable after the host moved into an engine.
    pub fn fetch_log(&self) -> FetchLog {
        FetchLog {
            fetches: Arc::clone(&self.fetches),
            detached: Arc::clone(&self.detached),
        }
    }

    pub fn globals(&self) -> GlobalTable {
        self.globals.clone()
    }
}

impl ResourceHost for StubResourceHost {
    fn attach(&self, resource: &LoadableResource, signal: CompletionSignal, includer: &Includer) {
        self.fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(resource.clone());

        let url = strip_query(&resource.url);
        let behavior = self
            .behaviors
            .get(url)
            .cloned()
            .unwrap_or(StubBehavior::Loaded);
        if behavior == StubBehavior::Silent {
            self.held
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(signal);
            return;
        }

        let delay = self.delays.get(url).copied();
        let globals = self.globals.clone();
        let includer = includer.clone();
        tokio::spawn(async move {
            match delay {
                Some(delay) => tokio::time::sleep(delay).await,
                None => tokio::task::yield_now().await,
            }

            match behavior {
                StubBehavior::Loaded => {
                    signal.loaded();
                }
                StubBehavior::Publish { symbol, value } => {
                    globals.publish(symbol, value);
                    signal.loaded();
                }
                StubBehavior::Define {
                    name,
                    prerequisites,
                    value,
                } => {
                    if let Err(e) = includer.resolve(name, prerequisites, move |_| value).await {
                        tracing::warn!("Stub definition rejected: {}", e);
                    }
                    signal.loaded();
                }
                StubBehavior::Fail(reason) => {
                    signal.failed(reason);
                }
                StubBehavior::DoubleSignal => {
                    signal.ready_state_changed(ReadyState::Loaded);
                    signal.loaded();
                }
                StubBehavior::Drop | StubBehavior::Silent => drop(signal),
            }
        });
    }

    fn detach(&self, resource: &LoadableResource) {
        self.detached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(resource.url.clone());
    }
}

/// What a [`StubResourceHost`] was asked to do.
#[derive(Clone)]
pub struct FetchLog {
    fetches: Arc<Mutex<Vec<LoadableResource>>>,
    detached: Arc<Mutex<Vec<String>>>,
}

impl FetchLog {
    pub fn resources(&self) -> Vec<LoadableResource> {
        self.fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fetched URLs in dispatch order.
    pub fn urls(&self) -> Vec<String> {
        self.resources().into_iter().map(|r| r.url).collect()
    }

    /// Fetches of `url`, ignoring any cache-busting query.
    pub fn count(&self, url: &str) -> usize {
        self.resources()
            .iter()
            .filter(|r| strip_query(&r.url) == url)
            .count()
    }

    pub fn detached(&self) -> Vec<String> {
        self.detached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
