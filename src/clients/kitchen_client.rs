use crate::domain::Order;
use crate::kitchen::{FulfillmentQueue, KitchenError, PoolGauge};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Client for handing orders to the kitchen.
///
/// Submission is fire-and-forget: progress is observed through the order's
/// own status (see [`Order::subscribe`]), not through this client.
#[derive(Clone)]
pub struct KitchenClient {
    queue: Arc<FulfillmentQueue>,
    gauge: PoolGauge,
}

impl KitchenClient {
    pub fn new(queue: Arc<FulfillmentQueue>, gauge: PoolGauge) -> Self {
        Self { queue, gauge }
    }

    #[instrument(skip(self, order), fields(order_id = %order.id()))]
    pub fn submit_for_fulfillment(&self, order: Arc<Order>) -> Result<(), KitchenError> {
        debug!(total = order.total_price(), "submit_for_fulfillment called");
        self.queue.enqueue(order)?;
        info!("Order queued for the kitchen");
        Ok(())
    }

    /// Orders waiting for a free cook.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Orders currently on the stove.
    pub fn active_cooks(&self) -> usize {
        self.gauge.active()
    }

    /// Stops accepting orders. Queued orders are still cooked.
    pub fn close(&self) {
        self.queue.close();
    }
}
