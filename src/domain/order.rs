use crate::domain::{LineItem, OrderError, OrderId, Review, SequenceAllocator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Accepted,
    InProgress,
    Ready,
    Cancelled,
    Paid,
    Reviewed,
}

impl OrderStatus {
    /// Whether items may still be added.
    pub fn is_editable(self) -> bool {
        matches!(self, Self::Accepted | Self::InProgress)
    }

    /// No transition leaves a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Reviewed)
    }

    /// The lifecycle transition table.
    pub fn can_transition_to(self, next: Self) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Accepted, InProgress)
                | (Accepted, Cancelled)
                | (InProgress, Cancelled)
                | (InProgress, Ready)
                | (Ready, Paid)
                | (Paid, Reviewed)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Accepted => "ACCEPTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Ready => "READY",
            Self::Cancelled => "CANCELLED",
            Self::Paid => "PAID",
            Self::Reviewed => "REVIEWED",
        };
        f.write_str(name)
    }
}

/// Read-only view of an order for display and statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub id: OrderId,
    pub status: OrderStatus,
    pub items: Vec<LineItem>,
    pub total_price: u64,
    pub history: Vec<OrderStatus>,
}

#[derive(Debug)]
struct OrderState {
    status: OrderStatus,
    items: Vec<LineItem>,
    history: Vec<OrderStatus>,
    // Set while a charge for this order is outstanding
    payment_pending: bool,
}

/// Represents a customer order moving through the kitchen.
///
/// # Sharing
/// An `Order` is created by the ordering workflow and shared as `Arc<Order>`
/// with the kitchen for the duration of cooking. Status and items live behind a
/// per-order mutex that is held only for one check-and-transition, never across
/// an `.await`, so the worker and external callers (cancel, payment, reviews)
/// hand the order off to each other through its status.
///
/// # Lifecycle
///
/// ```text
/// ACCEPTED ──► IN_PROGRESS ──► READY ──► PAID ──► REVIEWED
///     │             │
///     └──► CANCELLED ◄┘
/// ```
///
/// Every transition is logged and published to [`subscribe`](Order::subscribe).
#[derive(Debug)]
pub struct Order {
    id: OrderId,
    state: Mutex<OrderState>,
    status_tx: watch::Sender<OrderStatus>,
}

impl Order {
    /// Creates an empty, accepted order with a freshly allocated id.
    pub fn new(allocator: &SequenceAllocator) -> Self {
        let id = allocator.next_id();
        let (status_tx, _) = watch::channel(OrderStatus::Accepted);
        debug!(order_id = %id, "Order opened");
        Self {
            id,
            state: Mutex::new(OrderState {
                status: OrderStatus::Accepted,
                items: Vec::new(),
                history: vec![OrderStatus::Accepted],
                payment_pending: false,
            }),
            status_tx,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn status(&self) -> OrderStatus {
        self.state().status
    }

    pub fn is_cancelled(&self) -> bool {
        self.status() == OrderStatus::Cancelled
    }

    pub fn items(&self) -> Vec<LineItem> {
        self.state().items.clone()
    }

    /// Sum of the current item prices, derived on every call.
    pub fn total_price(&self) -> u64 {
        Self::price_of(&self.state().items)
    }

    /// Sum of the current item cooking times, in kitchen time units.
    pub fn total_cooking_time(&self) -> Result<u64, OrderError> {
        self.state()
            .items
            .iter()
            .try_fold(0u64, |acc, item| acc.checked_add(item.cooking_time))
            .ok_or(OrderError::CookingTimeOverflow(self.id))
    }

    /// Every status the order has been in, oldest first.
    pub fn history(&self) -> Vec<OrderStatus> {
        self.state().history.clone()
    }

    pub fn snapshot(&self) -> OrderSnapshot {
        let state = self.state();
        OrderSnapshot {
            id: self.id,
            status: state.status,
            items: state.items.clone(),
            total_price: Self::price_of(&state.items),
            history: state.history.clone(),
        }
    }

    /// Returns a receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<OrderStatus> {
        self.status_tx.subscribe()
    }

    /// Appends an item while the order is still accepted or cooking.
    pub fn add_item(&self, item: LineItem) -> Result<(), OrderError> {
        let mut state = self.state();
        if !state.status.is_editable() {
            return Err(OrderError::ItemsLocked {
                id: self.id,
                status: state.status,
            });
        }
        if Self::price_of(&state.items).checked_add(item.price).is_none() {
            return Err(OrderError::PriceOverflow(self.id));
        }
        info!(order_id = %self.id, item = %item.name, price = item.price, "Item added");
        state.items.push(item);
        Ok(())
    }

    /// Cancels an order that has not finished cooking.
    ///
    /// Cancelling an already cancelled order succeeds without a new transition.
    /// Ready, paid and reviewed orders cannot be cancelled.
    pub fn cancel(&self) -> Result<(), OrderError> {
        let mut state = self.state();
        if state.status == OrderStatus::Cancelled {
            debug!(order_id = %self.id, "Already cancelled");
            return Ok(());
        }
        self.transition(&mut state, OrderStatus::Cancelled)
    }

    /// Attaches a review to the item at `index` of a paid order.
    ///
    /// Once every item carries a review the order becomes `REVIEWED`.
    pub fn record_review(
        &self,
        index: usize,
        rating: u8,
        comment: impl Into<String>,
    ) -> Result<(), OrderError> {
        let mut state = self.state();
        if state.status != OrderStatus::Paid {
            return Err(OrderError::NotPaid {
                id: self.id,
                status: state.status,
            });
        }
        if !Review::is_valid_rating(rating) {
            return Err(OrderError::InvalidRating(rating));
        }
        let item = state
            .items
            .get_mut(index)
            .ok_or(OrderError::UnknownItem { id: self.id, index })?;
        if item.is_reviewed() {
            return Err(OrderError::ItemAlreadyReviewed { id: self.id, index });
        }
        item.reviews.push(Review::new(rating, comment));
        info!(order_id = %self.id, item = %item.name, rating, "Review recorded");

        if state.items.iter().all(LineItem::is_reviewed) {
            self.transition(&mut state, OrderStatus::Reviewed)?;
        }
        Ok(())
    }

    /// Moves an accepted order onto the stove.
    ///
    /// Returns `Ok(false)` when the order was cancelled while it waited in the
    /// queue, in which case nothing changes.
    pub(crate) fn start_cooking(&self) -> Result<bool, OrderError> {
        let mut state = self.state();
        if state.status == OrderStatus::Cancelled {
            return Ok(false);
        }
        self.transition(&mut state, OrderStatus::InProgress)?;
        Ok(true)
    }

    /// Marks a cooked order ready. Returns `Ok(false)` if it was cancelled meanwhile.
    pub(crate) fn finish_cooking(&self) -> Result<bool, OrderError> {
        let mut state = self.state();
        if state.status == OrderStatus::Cancelled {
            return Ok(false);
        }
        self.transition(&mut state, OrderStatus::Ready)?;
        Ok(true)
    }

    /// Reserves a `READY` order for one charge and returns the amount to charge.
    ///
    /// Only one caller at a time can hold the claim; it ends with
    /// [`mark_paid`](Self::mark_paid) or [`release_payment`](Self::release_payment).
    pub(crate) fn claim_payment(&self) -> Result<u64, OrderError> {
        let mut state = self.state();
        if state.status != OrderStatus::Ready {
            return Err(OrderError::InvalidTransition {
                id: self.id,
                from: state.status,
                to: OrderStatus::Paid,
            });
        }
        if state.payment_pending {
            return Err(OrderError::PaymentInProgress(self.id));
        }
        state.payment_pending = true;
        Ok(Self::price_of(&state.items))
    }

    /// Drops the claim after a declined charge; the order stays `READY`.
    pub(crate) fn release_payment(&self) {
        self.state().payment_pending = false;
    }

    pub(crate) fn mark_paid(&self) -> Result<(), OrderError> {
        let mut state = self.state();
        self.transition(&mut state, OrderStatus::Paid)?;
        state.payment_pending = false;
        Ok(())
    }

    fn transition(&self, state: &mut OrderState, to: OrderStatus) -> Result<(), OrderError> {
        let from = state.status;
        if !from.can_transition_to(to) {
            return Err(OrderError::InvalidTransition {
                id: self.id,
                from,
                to,
            });
        }
        state.status = to;
        state.history.push(to);
        // Published under the lock so observers see transitions in order
        self.status_tx.send_replace(to);
        info!(order_id = %self.id, %from, %to, "Status changed");
        Ok(())
    }

    fn state(&self) -> MutexGuard<'_, OrderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // add_item keeps the sum within u64
    fn price_of(items: &[LineItem]) -> u64 {
        items.iter().map(|item| item.price).sum()
    }
}
