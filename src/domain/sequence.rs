//! Order identity allocation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identifier of an [`Order`](crate::domain::Order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(u64);

impl OrderId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Issues strictly increasing order ids, starting at 1.
///
/// # Concurrency
/// A single atomic counter. Any number of callers may share one allocator
/// (usually behind an `Arc`) and call [`next_id`](Self::next_id) concurrently;
/// no id is ever handed out twice.
///
/// Exhausting the `u64` range would break uniqueness, so it panics instead of
/// wrapping around.
#[derive(Debug)]
pub struct SequenceAllocator {
    next: AtomicU64,
}

impl SequenceAllocator {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Returns the next unused id.
    pub fn next_id(&self) -> OrderId {
        match self
            .next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
        {
            Ok(id) => OrderId(id),
            Err(_) => panic!("order id sequence exhausted"),
        }
    }

    #[cfg(test)]
    fn starting_at(next: u64) -> Self {
        Self {
            next: AtomicU64::new(next),
        }
    }
}

impl Default for SequenceAllocator {
    fn default() -> Self {
        Self::new()
    }
}
