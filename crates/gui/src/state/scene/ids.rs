//! Object id generation

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use shared::ObjectId;

/// How new object ids are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Random v4 UUID
    #[default]
    Uuid,
    /// Monotonic counter ("obj-1", "obj-2", ...)
    Sequential,
    /// Wall-clock milliseconds. Two adds within the same millisecond get the
    /// same id and the second record replaces the first.
    Timestamp,
}

/// Produces ids according to an [`IdStrategy`]
pub struct IdGenerator {
    strategy: IdStrategy,
    next: u64,
    clock: fn() -> u128,
}

impl IdGenerator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self::with_clock(strategy, unix_millis)
    }

    /// Generator with a custom millisecond clock (used by `Timestamp`)
    pub fn with_clock(strategy: IdStrategy, clock: fn() -> u128) -> Self {
        Self {
            strategy,
            next: 1,
            clock,
        }
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    pub fn next_id(&mut self) -> ObjectId {
        match self.strategy {
            IdStrategy::Uuid => uuid::Uuid::new_v4().to_string(),
            IdStrategy::Sequential => {
                let n = self.next;
                self.next += 1;
                format!("obj-{n}")
            }
            IdStrategy::Timestamp => (self.clock)().to_string(),
        }
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
