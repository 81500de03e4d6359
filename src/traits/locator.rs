// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::engine::UnitValue;

/// Recovers the value an external unit exposed after its resource loaded.
pub trait ExternalValueLocator: Send + Sync {
    fn locate(&self, symbol: &str) -> Option<UnitValue>;
}
