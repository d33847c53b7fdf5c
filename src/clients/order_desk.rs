use crate::clients::{MenuCatalog, OrderDeskError};
use crate::domain::{Order, OrderError, SequenceAllocator};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The ordering workflow: opens orders and fills them from the menu.
#[derive(Clone)]
pub struct OrderDesk {
    allocator: Arc<SequenceAllocator>,
    menu: Arc<dyn MenuCatalog>,
}

impl OrderDesk {
    pub fn new(allocator: Arc<SequenceAllocator>, menu: Arc<dyn MenuCatalog>) -> Self {
        Self { allocator, menu }
    }

    /// Opens an empty, accepted order.
    pub fn open_order(&self) -> Arc<Order> {
        let order = Order::new(&self.allocator);
        info!(order_id = %order.id(), "Order opened");
        Arc::new(order)
    }

    /// Adds one portion of `dish` to the order.
    ///
    /// Stock is only consumed when the order can still take items; if the
    /// order locks between the menu lookup and the append, the portion goes
    /// back to the menu.
    #[instrument(skip(self, order), fields(order_id = %order.id()))]
    pub async fn add_item(&self, order: &Order, dish: &str) -> Result<(), OrderDeskError> {
        let status = order.status();
        if !status.is_editable() {
            return Err(OrderError::ItemsLocked {
                id: order.id(),
                status,
            }
            .into());
        }

        let item = self.menu.take(dish).await?;
        debug!(price = item.price, cooking_time = item.cooking_time, "Dish taken from menu");
        if let Err(e) = order.add_item(item) {
            warn!(error = %e, "Order locked meanwhile, returning portion");
            self.menu.restock(dish, 1).await?;
            return Err(e.into());
        }
        Ok(())
    }
}
