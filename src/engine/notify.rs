// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The notification bus: named events that fire once and stay fired.
//!
//! Each event is in one of two states. While pending it collects waiters;
//! once triggered it remembers its outcome, and anyone registering afterwards
//! is notified straight away through the scheduler. Waiters are never run
//! synchronously from `on` or `trigger`.

use crate::engine::scheduler::Scheduler;
use crate::errors::UnitFailure;
use std::collections::HashMap;

/// How an event fired.
pub type Outcome = Result<(), UnitFailure>;

/// Something waiting on an event.
pub trait Waiter<S>: Send + 'static {
    fn notify(self, state: &mut S, event: &str, outcome: Outcome);
}

enum Slot<W> {
    Pending(Vec<W>),
    Fired(Outcome),
}

pub struct NotificationBus<S, W> {
    events: HashMap<String, Slot<W>>,
    scheduler: Scheduler<S>,
}

impl<S: 'static, W: Waiter<S>> NotificationBus<S, W> {
    pub fn new(scheduler: Scheduler<S>) -> Self {
        Self {
            events: HashMap::new(),
            scheduler,
        }
    }

    /// Wait for `event`. A fired event schedules the waiter immediately.
    pub fn on(&mut self, event: &str, waiter: W) {
        let slot = self
            .events
            .entry(event.to_string())
            .or_insert_with(|| Slot::Pending(Vec::new()));

        match slot {
            Slot::Pending(waiters) => waiters.push(waiter),
            Slot::Fired(outcome) => {
                let outcome = outcome.clone();
                Self::schedule(&self.scheduler, event, waiter, outcome);
            }
        }
    }

    /// Fire `event` and schedule every waiter captured so far.
    ///
    /// Firing again is a no-op: the first outcome is kept and nobody is
    /// notified twice. Returns how many waiters were scheduled.
    pub fn trigger(&mut self, event: &str, outcome: Outcome) -> usize {
        match self.events.get_mut(event) {
            Some(Slot::Fired(_)) => 0,
            Some(slot) => {
                let Slot::Pending(waiters) = std::mem::replace(slot, Slot::Fired(outcome.clone()))
                else {
                    return 0;
                };
                let count = waiters.len();
                for waiter in waiters {
                    Self::schedule(&self.scheduler, event, waiter, outcome.clone());
                }
                count
            }
            None => {
                self.events.insert(event.to_string(), Slot::Fired(outcome));
                0
            }
        }
    }

    /// True once anyone has waited on or fired `event`; not "has completed".
    pub fn is_available(&self, event: &str) -> bool {
        self.events.contains_key(event)
    }

    pub fn is_fired(&self, event: &str) -> bool {
        self.outcome(event).is_some()
    }

    /// The outcome of a fired event.
    pub fn outcome(&self, event: &str) -> Option<&Outcome> {
        match self.events.get(event) {
            Some(Slot::Fired(outcome)) => Some(outcome),
            _ => None,
        }
    }

    fn schedule(scheduler: &Scheduler<S>, event: &str, waiter: W, outcome: Outcome) {
        let event = event.to_string();
        scheduler.defer_fn(move |state| waiter.notify(state, &event, outcome));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scheduler::Job;
    use tokio::sync::mpsc::UnboundedReceiver;

    type Log = Vec<String>;

    struct Recorder(&'static str);

    impl Waiter<Log> for Recorder {
        fn notify(self, log: &mut Log, event: &str, outcome: Outcome) {
            let status = if outcome.is_ok() { "ok" } else { "failed" };
            log.push(format!("{}:{}:{}", self.0, event, status));
        }
    }

    fn bus() -> (NotificationBus<Log, Recorder>, UnboundedReceiver<Job<Log>>) {
        let (scheduler, jobs) = Scheduler::channel();
        (NotificationBus::new(scheduler), jobs)
    }

    fn run_pending(jobs: &mut UnboundedReceiver<Job<Log>>) -> Log {
        let mut log = Vec::new();
        while let Ok(job) = jobs.try_recv() {
            job(&mut log);
        }
        log
    }

    #[test]
    fn test_waiters_run_in_registration_order_after_trigger() {
        let (mut bus, mut jobs) = bus();
        bus.on("jQuery", Recorder("first"));
        bus.on("jQuery", Recorder("second"));

        assert!(run_pending(&mut jobs).is_empty());
        assert_eq!(bus.trigger("jQuery", Ok(())), 2);

        assert_eq!(
            run_pending(&mut jobs),
            vec!["first:jQuery:ok", "second:jQuery:ok"]
        );
    }

    #[test]
    fn test_late_waiter_is_notified_once() {
        let (mut bus, mut jobs) = bus();
        bus.trigger("App", Ok(()));

        bus.on("App", Recorder("late"));

        assert_eq!(run_pending(&mut jobs), vec!["late:App:ok"]);
        assert!(run_pending(&mut jobs).is_empty());
    }

    #[test]
    fn test_trigger_is_idempotent_and_keeps_first_outcome() {
        let (mut bus, mut jobs) = bus();
        bus.on("Lib", Recorder("w"));

        assert_eq!(bus.trigger("Lib", Ok(())), 1);
        let failure = UnitFailure::SymbolNotFound {
            name: "Lib".to_string(),
            symbol: "Lib".to_string(),
        };
        assert_eq!(bus.trigger("Lib", Err(failure)), 0);

        assert_eq!(run_pending(&mut jobs), vec!["w:Lib:ok"]);
        assert_eq!(bus.outcome("Lib"), Some(&Ok(())));
    }

    #[test]
    fn test_trigger_without_waiters() {
        let (mut bus, mut jobs) = bus();

        assert!(!bus.is_available("nobody"));
        assert_eq!(bus.trigger("nobody", Ok(())), 0);

        assert!(bus.is_available("nobody"));
        assert!(bus.is_fired("nobody"));
        assert!(run_pending(&mut jobs).is_empty());
    }

    #[test]
    fn test_available_means_requested_not_completed() {
        let (mut bus, mut jobs) = bus();
        bus.on("Shared", Recorder("a"));

        assert!(bus.is_available("Shared"));
        assert!(!bus.is_fired("Shared"));
        assert_eq!(bus.outcome("Shared"), None);
        assert!(run_pending(&mut jobs).is_empty());
    }

    #[test]
    fn test_failure_is_delivered_to_waiters() {
        let (mut bus, mut jobs) = bus();
        bus.on("Broken", Recorder("w"));

        bus.trigger(
            "Broken",
            Err(UnitFailure::LoadFailure {
                name: "Broken".to_string(),
                url: "broken.js".to_string(),
                reason: "404".to_string(),
            }),
        );
        bus.on("Broken", Recorder("late"));

        assert_eq!(
            run_pending(&mut jobs),
            vec!["w:Broken:failed", "late:Broken:failed"]
        );
    }
}
