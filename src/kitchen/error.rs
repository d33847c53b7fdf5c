//! Error types for the kitchen.

use crate::domain::{OrderId, OrderStatus};
use thiserror::Error;

/// Errors reported when handing orders to the kitchen.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KitchenError {
    /// Only accepted orders may wait in the fulfillment queue.
    #[error("Order {id} is {status}, only ACCEPTED orders can be queued")]
    NotAccepted { id: OrderId, status: OrderStatus },

    /// The kitchen is shutting down and takes no new orders.
    #[error("Fulfillment queue is closed")]
    QueueClosed,
}

/// Invalid kitchen configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("Kitchen needs at least one worker")]
    NoWorkers,

    #[error("Time unit must be at least 1 ms")]
    ZeroTimeUnit,
}
