// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! This module provides centralized message types for all diagnostic and
//! operational logging in the includer. Message types follow a struct-based
//! pattern with `Display` implementations to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep log wording in one place per subsystem
//! * Provide consistent, structured logging output
//!
//! Progress reports for callers are a separate concern: they go through the
//! `ProgressObserver` seam, not through `tracing`.
//!
//! # Usage
//!
//! ```rust
//! use the_includer::observability::messages::loader::ResourceLoadFailed;
//!
//! let msg = ResourceLoadFailed {
//!     unit: "jQuery",
//!     url: "vendor/jquery.js",
//!     reason: "404 Not Found",
//! };
//!
//! tracing::error!("{}", msg);
//! ```

pub mod messages;
