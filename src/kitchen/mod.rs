//! The order fulfillment engine: priority queue, cooking pool and dispatcher.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod pool;
pub mod queue;

pub use config::*;
pub use dispatcher::*;
pub use error::*;
pub use pool::*;
pub use queue::*;

use crate::clients::KitchenClient;
use std::sync::Arc;

/// Creates a kitchen dispatcher and its client.
///
/// The dispatcher does nothing until its [`run`](Dispatcher::run) future is
/// spawned. The config is validated first: a kitchen without workers would
/// never take an order off the queue, not even to shut down.
pub fn new(config: &KitchenConfig) -> Result<(Dispatcher, KitchenClient), ConfigError> {
    config.validate()?;
    let queue = Arc::new(FulfillmentQueue::new());
    let pool = KitchenPool::new(config);
    let client = KitchenClient::new(queue.clone(), pool.gauge());
    Ok((Dispatcher::new(queue, pool), client))
}
