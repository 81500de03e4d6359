// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{SOURCE_ATTRIBUTE, XLINK_ATTRIBUTE};
use crate::engine::{CompletionSignal, Includer};

/// Which host attribute points a loadable resource at its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentMode {
    Source,
    XlinkHref,
}

impl AttachmentMode {
    pub fn attribute(self) -> &'static str {
        match self {
            AttachmentMode::Source => SOURCE_ATTRIBUTE,
            AttachmentMode::XlinkHref => XLINK_ATTRIBUTE,
        }
    }
}

/// A resource handed to the host for fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadableResource {
    /// Unit whose load dispatched this resource.
    pub unit: String,
    /// Fully derived URL, including extension and cache-buster.
    pub url: String,
    pub attachment: AttachmentMode,
}

/// The fetch primitive: turns a URL into a loaded code unit.
///
/// `attach` is called on the engine's owner task and must not block. The
/// host starts the fetch and later completes `signal` exactly once from
/// wherever the fetch finishes; extra signals are ignored. A host that loads
/// self-defining units calls back into the engine through `includer` before
/// completing the signal.
pub trait ResourceHost: Send + Sync {
    fn attach(&self, resource: &LoadableResource, signal: CompletionSignal, includer: &Includer);

    /// Release host bookkeeping for a loaded resource (auto-remove).
    fn detach(&self, _resource: &LoadableResource) {}
}
