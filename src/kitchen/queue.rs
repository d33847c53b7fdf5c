//! # Fulfillment Queue
//!
//! Unbounded priority queue of orders waiting for a free cook.
//!
//! Orders are served by descending total price. Orders with the same total are
//! served in the order they were enqueued, so equal-priority orders cannot
//! starve each other. The priority is sampled when the order is enqueued.

use crate::domain::{Order, OrderStatus};
use crate::kitchen::KitchenError;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tracing::debug;

struct Entry {
    priority: u64,
    seq: u64,
    order: Arc<Order>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Max-heap: higher price first, then lower sequence number first
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Default)]
struct QueueState {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
    closed: bool,
}

/// Priority queue shared by order submitters and the dispatcher.
///
/// `enqueue` never waits. `dequeue` waits until an order is available.
#[derive(Default)]
pub struct FulfillmentQueue {
    state: Mutex<QueueState>,
    available: Notify,
}

impl FulfillmentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an accepted order to the queue.
    pub fn enqueue(&self, order: Arc<Order>) -> Result<(), KitchenError> {
        let status = order.status();
        if status != OrderStatus::Accepted {
            return Err(KitchenError::NotAccepted {
                id: order.id(),
                status,
            });
        }

        let mut state = self.state();
        if state.closed {
            return Err(KitchenError::QueueClosed);
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        let priority = order.total_price();
        debug!(order_id = %order.id(), priority, queued = state.heap.len() + 1, "Enqueued");
        state.heap.push(Entry {
            priority,
            seq,
            order,
        });
        drop(state);

        self.available.notify_one();
        Ok(())
    }

    /// Waits for the highest-priority order.
    ///
    /// Returns `None` once the queue is closed and every queued order has been
    /// handed out.
    pub async fn dequeue(&self) -> Option<Arc<Order>> {
        loop {
            let notified = self.available.notified();
            {
                let mut state = self.state();
                if let Some(entry) = state.heap.pop() {
                    return Some(entry.order);
                }
                if state.closed {
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Stops accepting orders and wakes the consumer so it can drain and exit.
    pub fn close(&self) {
        self.state().closed = true;
        self.available.notify_waiters();
        // A consumer that has not registered yet picks up the stored permit
        self.available.notify_one();
    }

    pub fn len(&self) -> usize {
        self.state().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
