// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    Loaded,
    Failed,
}

/// Progress of one resource, reported to the observer hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    pub filename: String,
    pub name: String,
    pub status: LoadStatus,
    /// Resources still outstanding after this report.
    pub remaining: usize,
}

/// Receives progress reports on the engine's owner task; must not block.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, report: &ProgressReport);
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressReport) + Send + Sync,
{
    fn on_progress(&self, report: &ProgressReport) {
        self(report)
    }
}
