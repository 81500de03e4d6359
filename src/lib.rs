// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // resource hosts + global symbol table
pub mod config;     // config + path registry
pub mod engine;     // scheduler, bus, loader, resolver
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // host, locator and observer seams
