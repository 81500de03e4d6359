// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod include;
mod registry;

pub use config::{ConfigError, ValidationError};
pub use include::{IncludeError, UnitFailure};
pub use registry::RegistryError;
