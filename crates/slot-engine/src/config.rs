//! Engine tuning knobs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CACHE_TTL;
use crate::slots::{BUFFER_EDGE_TOLERANCE_MINUTES, DEFAULT_SLOT_MINUTES};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Slot length used by callers that do not pass one.
    pub slot_minutes: u32,
    /// How long fetched records may be reused. `None` disables caching.
    pub cache_ttl: Option<Duration>,
    /// See [`crate::slots::alignment_for`].
    pub buffer_edge_tolerance_minutes: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            slot_minutes: DEFAULT_SLOT_MINUTES,
            cache_ttl: Some(DEFAULT_CACHE_TTL),
            buffer_edge_tolerance_minutes: BUFFER_EDGE_TOLERANCE_MINUTES,
        }
    }
}
