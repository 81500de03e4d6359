// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod host;
pub mod locator;
pub mod observer;

pub use host::{AttachmentMode, LoadableResource, ResourceHost};
pub use locator::ExternalValueLocator;
pub use observer::{LoadStatus, ProgressObserver, ProgressReport};
