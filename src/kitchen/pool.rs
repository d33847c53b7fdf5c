//! # Kitchen Pool
//!
//! A fixed number of cooking slots. Each dispatched order holds one slot
//! (a semaphore permit) for as long as its cooking task runs, so at most
//! `workers` orders are ever `IN_PROGRESS` at once.
//!
//! Cooking tasks live in a [`JoinSet`]. A task that fails or panics only
//! affects its own order: the failure is logged when the task is reaped and
//! the slot is released by the permit's drop.

use crate::domain::{Order, OrderError, OrderId};
use crate::kitchen::KitchenConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, info_span, warn, Instrument};

/// How a cooking run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookOutcome {
    /// The order was cooked and is now `READY`.
    Ready,
    /// The order was cancelled while on the stove.
    Cancelled,
    /// The order was cancelled while still queued and never started.
    Skipped,
}

/// Runs the cooking simulation for one order.
///
/// The order goes `IN_PROGRESS`, then the worker sleeps one `time_unit` per
/// unit of cooking time, checking for cancellation before every step.
pub async fn cook(order: Arc<Order>, time_unit: Duration) -> Result<CookOutcome, OrderError> {
    if !order.start_cooking()? {
        return Ok(CookOutcome::Skipped);
    }

    let steps = order.total_cooking_time()?;
    debug!(order_id = %order.id(), steps, "Cooking");
    for _ in 0..steps {
        if order.is_cancelled() {
            return Ok(CookOutcome::Cancelled);
        }
        tokio::time::sleep(time_unit).await;
    }

    if order.finish_cooking()? {
        Ok(CookOutcome::Ready)
    } else {
        Ok(CookOutcome::Cancelled)
    }
}

/// Read-only view of how many cooks are busy.
#[derive(Debug, Clone, Default)]
pub struct PoolGauge {
    active: Arc<AtomicUsize>,
}

impl PoolGauge {
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

pub struct KitchenPool {
    slots: Arc<Semaphore>,
    workers: usize,
    time_unit: Duration,
    tasks: JoinSet<()>,
    gauge: PoolGauge,
}

impl KitchenPool {
    pub fn new(config: &KitchenConfig) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(config.workers)),
            workers: config.workers,
            time_unit: config.time_unit(),
            tasks: JoinSet::new(),
            gauge: PoolGauge::default(),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn gauge(&self) -> PoolGauge {
        self.gauge.clone()
    }

    /// Waits until a cooking slot is free.
    pub async fn acquire_slot(&self) -> OwnedSemaphorePermit {
        loop {
            // The pool never closes its semaphore
            if let Ok(permit) = self.slots.clone().acquire_owned().await {
                return permit;
            }
        }
    }

    /// Starts cooking `order` in the background on the given slot.
    pub fn dispatch(&mut self, slot: OwnedSemaphorePermit, order: Arc<Order>) {
        let order_id = order.id();
        let time_unit = self.time_unit;

        self.gauge.active.fetch_add(1, Ordering::SeqCst);
        let busy = scopeguard::guard(self.gauge.active.clone(), |active| {
            active.fetch_sub(1, Ordering::SeqCst);
        });

        self.tasks.spawn(
            async move {
                // Both are released when the task ends, even by panic
                let _slot = slot;
                let _busy = busy;
                report(order_id, cook(order, time_unit).await);
            }
            .instrument(info_span!("cook", order_id = %order_id)),
        );
        debug!(order_id = %order_id, active = self.gauge.active(), "Dispatched");
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Waits for the next cooking task to end and logs abnormal endings.
    pub async fn join_next(&mut self) -> Option<()> {
        let result = self.tasks.join_next().await?;
        log_join(result);
        Some(())
    }

    /// Collects already finished tasks without waiting.
    pub fn reap(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            log_join(result);
        }
    }

    /// Waits for every cooking task to end.
    pub async fn drain(&mut self) {
        while self.join_next().await.is_some() {}
    }
}

fn report(order_id: OrderId, result: Result<CookOutcome, OrderError>) {
    match result {
        Ok(CookOutcome::Ready) => info!(%order_id, "Order ready"),
        Ok(CookOutcome::Cancelled) => info!(%order_id, "Cooking stopped, order cancelled"),
        Ok(CookOutcome::Skipped) => info!(%order_id, "Skipped cancelled order"),
        Err(e) => error!(%order_id, error = %e, "Cooking failed"),
    }
}

fn log_join(result: Result<(), JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            error!(error = %e, "Cook panicked");
        } else {
            warn!(error = %e, "Cook aborted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineItem, OrderStatus, SequenceAllocator};
    use tokio::time::Instant;

    const UNIT: Duration = Duration::from_secs(1);

    fn order_with(allocator: &SequenceAllocator, items: &[(u64, u64)]) -> Arc<Order> {
        let order = Order::new(allocator);
        for (price, time) in items {
            order.add_item(LineItem::new("dish", *price, *time)).unwrap();
        }
        Arc::new(order)
    }

    #[tokio::test(start_paused = true)]
    async fn test_cook_takes_one_unit_per_step() {
        let allocator = SequenceAllocator::new();
        let order = order_with(&allocator, &[(5, 1), (7, 2)]);

        let start = Instant::now();
        let outcome = cook(order.clone(), UNIT).await.unwrap();

        assert_eq!(outcome, CookOutcome::Ready);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_secs(4));
        assert_eq!(order.status(), OrderStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cook_stops_on_cancel() {
        let allocator = SequenceAllocator::new();
        let order = order_with(&allocator, &[(5, 4)]);

        let task = tokio::spawn(cook(order.clone(), UNIT));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(order.status(), OrderStatus::InProgress);
        order.cancel().unwrap();

        let start = Instant::now();
        assert_eq!(task.await.unwrap().unwrap(), CookOutcome::Cancelled);
        // Noticed at the next step boundary
        assert!(start.elapsed() <= UNIT);
        assert_eq!(order.status(), OrderStatus::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cook_skips_order_cancelled_in_queue() {
        let allocator = SequenceAllocator::new();
        let order = order_with(&allocator, &[(5, 2)]);
        order.cancel().unwrap();

        assert_eq!(cook(order.clone(), UNIT).await.unwrap(), CookOutcome::Skipped);
        assert_eq!(order.history(), vec![OrderStatus::Accepted, OrderStatus::Cancelled]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cook_reports_overflow_and_keeps_status() {
        let allocator = SequenceAllocator::new();
        let order = order_with(&allocator, &[(5, u64::MAX), (1, 1)]);

        let result = cook(order.clone(), UNIT).await;
        assert_eq!(result, Err(OrderError::CookingTimeOverflow(order.id())));
        assert_eq!(order.status(), OrderStatus::InProgress);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pool_releases_slot_after_failure() {
        let allocator = SequenceAllocator::new();
        let config = KitchenConfig {
            workers: 1,
            time_unit_ms: 1000,
        };
        let mut pool = KitchenPool::new(&config);
        let gauge = pool.gauge();

        let broken = order_with(&allocator, &[(5, u64::MAX), (1, 1)]);
        let slot = pool.acquire_slot().await;
        pool.dispatch(slot, broken);
        assert_eq!(gauge.active(), 1);
        pool.drain().await;
        assert_eq!(gauge.active(), 0);

        let next = order_with(&allocator, &[(5, 1)]);
        let slot = pool.acquire_slot().await;
        pool.dispatch(slot, next.clone());
        pool.drain().await;
        assert_eq!(next.status(), OrderStatus::Ready);
        assert!(pool.is_idle());
    }
}
