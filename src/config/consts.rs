// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Engine revision, exposed for diagnostics only
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Suffix appended to every resource key when building its URL
pub const DEFAULT_EXTENSION: &str = ".js";
/// Attribute used to point a loadable resource at its URL
pub const SOURCE_ATTRIBUTE: &str = "src";
/// Attribute used instead of `src` when alternate attachment is enabled
pub const XLINK_ATTRIBUTE: &str = "xlink:href";
/// Name used in logs and errors for anonymous `require` requests
pub const ANONYMOUS_REQUEST: &str = "<require>";
/// Reason reported when a host drops a completion signal without firing it
pub const DROPPED_SIGNAL_REASON: &str = "completion signal dropped before the resource completed";
