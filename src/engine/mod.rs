// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The dependency-resolution engine.
//!
//! All engine state is owned by one task and mutated only by jobs drained
//! from a single FIFO [`Scheduler`](scheduler::Scheduler). Public access goes
//! through the [`Includer`] handle.

pub mod handle;
pub mod loader;
pub mod notify;
pub(crate) mod resolver;
pub mod scheduler;


pub use handle::{Includer, IncluderBuilder};
pub use loader::{resource_key, resource_url, CompletionSignal, ReadyState};
pub use notify::{NotificationBus, Outcome, Waiter};
pub use resolver::FactoryFn;
pub use scheduler::{Job, Scheduler};

/// A resolved unit value.
pub type UnitValue = serde_json::Value;
