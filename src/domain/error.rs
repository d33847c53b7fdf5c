//! Error types for order operations.

use crate::domain::{OrderId, OrderStatus};
use thiserror::Error;

/// Domain-rule violations reported by [`Order`](crate::domain::Order) mutators.
///
/// Every variant leaves the order exactly as it was before the call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderError {
    /// Items can only be added while the order is accepted or cooking.
    #[error("Cannot add items to {id}: order is {status}")]
    ItemsLocked { id: OrderId, status: OrderStatus },

    /// The requested status change is not part of the order lifecycle.
    #[error("Invalid transition for {id}: {from} -> {to}")]
    InvalidTransition {
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Reviews are accepted only for paid orders.
    #[error("Cannot review {id}: order is {status}")]
    NotPaid { id: OrderId, status: OrderStatus },

    /// The rating is outside the accepted range.
    #[error("Invalid rating {0}: must be between 1 and 5")]
    InvalidRating(u8),

    /// No item at the given position.
    #[error("Order {id} has no item at position {index}")]
    UnknownItem { id: OrderId, index: usize },

    /// The item already carries a review.
    #[error("Item {index} of {id} is already reviewed")]
    ItemAlreadyReviewed { id: OrderId, index: usize },

    /// Another payment for the order is still being charged.
    #[error("Payment for {0} is already in progress")]
    PaymentInProgress(OrderId),

    /// Adding the item would push the order total past `u64::MAX`.
    #[error("Total price of {0} would overflow")]
    PriceOverflow(OrderId),

    /// The summed cooking time does not fit into a `u64`.
    #[error("Cooking time of {0} overflows")]
    CookingTimeOverflow(OrderId),
}
