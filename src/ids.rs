use std::sync::atomic::{AtomicU32, Ordering};

use crate::models::EntityId;

/// Identifiers start above this value when no snapshot has ever been loaded.
const ID_BASELINE: u32 = 1000;

/// Process-wide monotonic id source, shared by every store.
///
/// Each store seeds it at load time with the largest id found in its
/// snapshot file, so restarts never reissue a persisted id.
#[derive(Debug)]
pub struct IdGenerator {
    counter: AtomicU32,
}

impl IdGenerator {
    pub fn new() -> Self {
        IdGenerator {
            counter: AtomicU32::new(ID_BASELINE),
        }
    }

    /// Returns a value strictly greater than any previously returned or
    /// seeded value. Concurrent callers never observe the same id.
    pub fn next_id(&self) -> EntityId {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Raises the counter to `max_observed` if it is ahead. Seeding never
    /// regresses the counter, so stores may seed in any order.
    pub fn seed(&self, max_observed: EntityId) {
        self.counter.fetch_max(max_observed, Ordering::SeqCst);
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
