// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::engine::UnitValue;
use crate::traits::ExternalValueLocator;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// A shared global symbol table.
///
/// Hosts publish the symbols a loaded resource exposes; the engine recovers
/// external units' values from it. Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct GlobalTable {
    symbols: Arc<RwLock<HashMap<String, UnitValue>>>,
}

impl GlobalTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose `value` under `symbol`, replacing any previous value.
    pub fn publish(&self, symbol: impl Into<String>, value: UnitValue) {
        self.symbols
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(symbol.into(), value);
    }

    pub fn get(&self, symbol: &str) -> Option<UnitValue> {
        self.symbols
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(symbol)
            .cloned()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }
}

impl ExternalValueLocator for GlobalTable {
    fn locate(&self, symbol: &str) -> Option<UnitValue> {
        self.get(symbol)
    }
}
