use crate::kitchen::{FulfillmentQueue, KitchenPool};
use std::sync::Arc;
use tracing::{debug, info};

/// The single admission loop between the fulfillment queue and the pool.
///
/// # Architecture Note
/// This is the "Server" half of the kitchen: it owns the [`KitchenPool`] and
/// is the only consumer of the queue. Callers hold a
/// [`KitchenClient`](crate::clients::KitchenClient) instead.
///
/// Each iteration first waits for a free cooking slot and only then takes the
/// best order from the queue. An order therefore stays queued (and can still be
/// overtaken by a pricier one) until a cook is actually available. Dispatching
/// never waits for cooking to finish.
pub struct Dispatcher {
    queue: Arc<FulfillmentQueue>,
    pool: KitchenPool,
}

impl Dispatcher {
    pub fn new(queue: Arc<FulfillmentQueue>, pool: KitchenPool) -> Self {
        Self { queue, pool }
    }

    /// Runs until the queue is closed and drained, then waits for every order
    /// still on the stove.
    pub async fn run(mut self) {
        info!(workers = self.pool.workers(), "Kitchen started");

        loop {
            self.pool.reap();
            let slot = self.pool.acquire_slot().await;

            // Keep reaping finished cooks while the queue is empty
            let next = loop {
                tokio::select! {
                    order = self.queue.dequeue() => break order,
                    Some(()) = self.pool.join_next(), if !self.pool.is_idle() => {}
                }
            };

            let Some(order) = next else {
                break;
            };
            debug!(order_id = %order.id(), queued = self.queue.len(), "Picked up");
            self.pool.dispatch(slot, order);
        }

        info!("Queue closed, waiting for cooks to finish");
        self.pool.drain().await;
        info!("Kitchen stopped");
    }
}
