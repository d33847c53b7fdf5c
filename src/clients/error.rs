//! Error types for the ordering, menu and payment workflows.

use crate::domain::{OrderError, OrderId};
use thiserror::Error;

/// Errors from the menu catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MenuError {
    /// The dish is not on the menu.
    #[error("Dish not on the menu: {0}")]
    UnknownDish(String),

    /// The dish is on the menu but has no portions left.
    #[error("Sold out: {0}")]
    SoldOut(String),
}

/// Errors that can occur while paying for an order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// The order is not in a payable state.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// The payment provider refused the charge.
    #[error("Payment for {id} declined: {reason}")]
    Declined { id: OrderId, reason: String },
}

/// Errors from the ordering workflow.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderDeskError {
    #[error(transparent)]
    Menu(#[from] MenuError),

    #[error(transparent)]
    Order(#[from] OrderError),
}
