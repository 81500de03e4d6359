// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Resource host implementations.
//!
//! A host is the fetch primitive behind the engine: it receives each
//! [`LoadableResource`](crate::traits::LoadableResource) once, fetches it
//! however it likes, and completes the accompanying signal.
//!
//! # Available Hosts
//!
//! ## Filesystem Host
//! Reads JSON unit files relative to a base directory with `tokio::fs`:
//! - **Globals**: published into a shared [`GlobalTable`]
//! - **Definitions**: registered through the includer before the resource completes
//! - **Use Case**: the command-line driver, local experiments
//!
//! ## Stub Host
//! Scriptable in-memory host:
//! - **Behaviors**: load, publish, define, fail, stay silent, double-signal, drop
//! - **Delays**: per-URL, to force completion orders
//! - **Fetch log**: every dispatch and detach is recorded
//! - **Use Case**: unit and integration tests, documentation examples

pub mod fs;
pub mod globals;
pub mod stub;

pub use fs::FsResourceHost;
pub use globals::GlobalTable;
pub use stub::{FetchLog, StubBehavior, StubResourceHost};

/// `url` without its cache-busting query.
pub fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}
