//! Actor id allocation.

use crate::types::ActorId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of fresh actor ids.
///
/// Implementations must never hand out the same id twice, and never hand out an id in the
/// singleton range.
pub trait IdAllocator: Send + Sync {
    fn next_id(&self) -> ActorId;
}

/// Monotonic process-scoped counter
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(ActorId::RESERVED_MAX + 1)
    }

    /// Counter whose first id is `first`, clamped above the reserved range
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first.max(ActorId::RESERVED_MAX + 1)),
        }
    }

    /// Id the next call will return
    pub fn peek(&self) -> ActorId {
        ActorId(self.next.load(Ordering::Relaxed))
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator for SequentialIds {
    fn next_id(&self) -> ActorId {
        ActorId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
