use crate::clients::{KitchenClient, MenuCatalog, OrderDesk, PaymentClient, PaymentGateway};
use crate::domain::SequenceAllocator;
use crate::kitchen::{self, ConfigError, KitchenConfig};
use std::sync::Arc;
use tracing::{error, info};

/// The runtime orchestrator for the restaurant.
///
/// `RestaurantSystem` is responsible for:
/// - **Lifecycle Management**: Starting the kitchen dispatcher and stopping it again
/// - **Dependency Wiring**: Handing the shared sequence allocator, menu and payment
///   gateway to the clients that need them
///
/// Every component exists exactly once per system and is reached through the
/// clients below; there is no global state.
///
/// # Example
///
/// ```ignore
/// let system = RestaurantSystem::new(&KitchenConfig::default(), menu, gateway)?;
///
/// let order = system.desk.open_order();
/// system.desk.add_item(&order, "burger").await?;
/// system.kitchen.submit_for_fulfillment(order.clone())?;
///
/// // Gracefully shut down when done
/// system.shutdown().await?;
/// ```
pub struct RestaurantSystem {
    /// Client for submitting orders to the kitchen
    pub kitchen: KitchenClient,

    /// Ordering workflow (opens orders, adds dishes from the menu)
    pub desk: OrderDesk,

    /// Payment workflow
    pub payments: PaymentClient,

    /// Task handle of the running dispatcher (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl RestaurantSystem {
    /// Creates the system and starts the kitchen.
    ///
    /// This method:
    /// 1. Validates the kitchen configuration
    /// 2. Spawns the kitchen dispatcher in its own Tokio task
    /// 3. Wires the ordering desk and payment workflow to their collaborators
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration has no workers or a zero
    /// time unit. Nothing is spawned in that case.
    pub fn new(
        config: &KitchenConfig,
        menu: Arc<dyn MenuCatalog>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Result<Self, ConfigError> {
        // =====================================================================
        // 1. Setup Kitchen
        // =====================================================================

        // Rejects an invalid config before any task exists
        let (dispatcher, kitchen) = kitchen::new(config)?;

        // The dispatcher runs until the queue is closed and drained
        let dispatcher_handle = tokio::spawn(dispatcher.run());

        // =====================================================================
        // 2. Setup Ordering and Payments
        // =====================================================================

        // One allocator per system so order ids are unique within it
        let allocator = Arc::new(SequenceAllocator::new());

        // =====================================================================
        // Return the fully initialized system
        // =====================================================================

        Ok(Self {
            kitchen,
            desk: OrderDesk::new(allocator, menu),
            payments: PaymentClient::new(gateway),
            // Store handles for graceful shutdown
            handles: vec![dispatcher_handle],
        })
    }

    /// Gracefully shuts down the kitchen.
    ///
    /// The fulfillment queue stops taking orders, orders already queued are
    /// still cooked, and the call returns once the last cook is done.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the dispatcher stopped cleanly
    /// - `Err(String)` if the dispatcher task failed or panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down restaurant...");

        // =====================================================================
        // Step 1: Stop taking new orders
        // =====================================================================

        // Closing wakes the dispatcher; it keeps serving what is already queued
        self.kitchen.close();
        drop(self.kitchen);

        // =====================================================================
        // Step 2: Wait for the kitchen to drain
        // =====================================================================

        for handle in self.handles {
            // Returns once the last cook is done; Err if the dispatcher panicked
            if let Err(e) = handle.await {
                error!("Kitchen task failed: {:?}", e);
                return Err(format!("Kitchen task failed: {:?}", e));
            }
        }

        info!("Restaurant shutdown complete.");
        Ok(())
    }
}
