// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The async scheduler primitive.
//!
//! Every continuation in the engine is a job: a closure that receives
//! exclusive access to the engine state. Jobs are pushed onto one FIFO queue
//! and drained by a single owner task, so jobs never overlap and run in the
//! order they were deferred. Deferring from inside a job places the new job
//! behind everything already queued; it never runs synchronously.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A deferred unit of work over state `S`.
pub type Job<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

/// Cloneable handle for deferring jobs onto one queue.
pub struct Scheduler<S> {
    jobs: mpsc::UnboundedSender<Job<S>>,
}

impl<S> Clone for Scheduler<S> {
    fn clone(&self) -> Self {
        Self {
            jobs: self.jobs.clone(),
        }
    }
}

impl<S: 'static> Scheduler<S> {
    /// Create a scheduler and the receiving end its owner task drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Job<S>>) {
        let (jobs, receiver) = mpsc::unbounded_channel();
        (Self { jobs }, receiver)
    }

    /// Defer `job` to a later turn of the queue.
    ///
    /// `None` is accepted and ignored. Returns whether a job was queued; a
    /// stopped owner task drops jobs.
    pub fn defer(&self, job: Option<Job<S>>) -> bool {
        match job {
            Some(job) => self.jobs.send(job).is_ok(),
            None => false,
        }
    }

    pub fn defer_fn<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.defer(Some(Box::new(f)))
    }

    /// Whether the owner task has gone away.
    pub fn is_closed(&self) -> bool {
        self.jobs.is_closed()
    }
}

/// Owner loop: run queued jobs one at a time until cancelled or orphaned.
pub async fn drain<S>(
    state: &mut S,
    mut jobs: mpsc::UnboundedReceiver<Job<S>>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            job = jobs.recv() => match job {
                Some(job) => job(state),
                None => break,
            },
        }
    }
}
