use crate::clients::PaymentError;
use crate::domain::{Order, OrderId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    QrCode,
}

/// Something that can take money for an order.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(
        &self,
        order_id: OrderId,
        amount: u64,
        method: PaymentMethod,
    ) -> Result<(), PaymentError>;
}

/// In-house gateway that accepts every payment and keeps a running revenue total.
#[derive(Debug, Default)]
pub struct CashRegister {
    revenue: AtomicU64,
    payments: AtomicU64,
}

impl CashRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revenue(&self) -> u64 {
        self.revenue.load(Ordering::SeqCst)
    }

    pub fn payments(&self) -> u64 {
        self.payments.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for CashRegister {
    async fn charge(
        &self,
        order_id: OrderId,
        amount: u64,
        method: PaymentMethod,
    ) -> Result<(), PaymentError> {
        self.revenue.fetch_add(amount, Ordering::SeqCst);
        self.payments.fetch_add(1, Ordering::SeqCst);
        info!(%order_id, amount, ?method, "Payment taken");
        Ok(())
    }
}

/// Client for the payment step of the order lifecycle.
#[derive(Clone)]
pub struct PaymentClient {
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentClient {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    /// Charges the order total and moves a `READY` order to `PAID`.
    ///
    /// Nothing is charged unless the order is ready, a second concurrent
    /// payment for the same order is refused, and a declined charge leaves it
    /// ready.
    #[instrument(skip(self, order), fields(order_id = %order.id()))]
    pub async fn pay(&self, order: &Order, method: PaymentMethod) -> Result<(), PaymentError> {
        let amount = match order.claim_payment() {
            Ok(amount) => amount,
            Err(e) => {
                warn!(error = %e, "Order cannot be paid");
                return Err(e.into());
            }
        };

        debug!(amount, ?method, "Charging");
        if let Err(e) = self.gateway.charge(order.id(), amount, method).await {
            warn!(error = %e, "Charge failed");
            order.release_payment();
            return Err(e);
        }

        order.mark_paid()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mock::MockPaymentGateway;
    use crate::domain::{LineItem, OrderError, OrderStatus, SequenceAllocator};

    fn ready_order(allocator: &SequenceAllocator, price: u64) -> Order {
        let order = Order::new(allocator);
        order.add_item(LineItem::new("dish", price, 1)).unwrap();
        order.start_cooking().unwrap();
        order.finish_cooking().unwrap();
        order
    }

    #[tokio::test]
    async fn test_pay_ready_order() {
        let allocator = SequenceAllocator::new();
        let register = Arc::new(CashRegister::new());
        let client = PaymentClient::new(register.clone());

        let order = ready_order(&allocator, 12);
        client.pay(&order, PaymentMethod::Cash).await.unwrap();

        assert_eq!(order.status(), OrderStatus::Paid);
        assert_eq!(register.revenue(), 12);
        assert_eq!(register.payments(), 1);
    }

    #[tokio::test]
    async fn test_pay_twice_fails() {
        let allocator = SequenceAllocator::new();
        let register = Arc::new(CashRegister::new());
        let client = PaymentClient::new(register.clone());

        let order = ready_order(&allocator, 12);
        client.pay(&order, PaymentMethod::QrCode).await.unwrap();
        let err = client.pay(&order, PaymentMethod::QrCode).await.unwrap_err();

        assert!(matches!(
            err,
            PaymentError::Order(OrderError::InvalidTransition {
                from: OrderStatus::Paid,
                ..
            })
        ));
        assert_eq!(register.revenue(), 12);
    }

    #[tokio::test]
    async fn test_unready_order_is_not_charged() {
        let allocator = SequenceAllocator::new();
        // No expectations: any charge would panic the mock
        let gateway = Arc::new(MockPaymentGateway::new());
        let client = PaymentClient::new(gateway.clone());

        let order = Order::new(&allocator);
        let err = client.pay(&order, PaymentMethod::Cash).await.unwrap_err();

        assert_eq!(
            err,
            PaymentError::Order(OrderError::InvalidTransition {
                id: order.id(),
                from: OrderStatus::Accepted,
                to: OrderStatus::Paid
            })
        );
        gateway.verify();
    }

    #[tokio::test]
    async fn test_declined_charge_keeps_order_ready() {
        let allocator = SequenceAllocator::new();
        let gateway = Arc::new(MockPaymentGateway::new());
        let client = PaymentClient::new(gateway.clone());

        let order = ready_order(&allocator, 30);
        gateway
            .expect_charge()
            .for_order(order.id())
            .return_err("card expired");

        let err = client.pay(&order, PaymentMethod::CreditCard).await.unwrap_err();
        assert_eq!(
            err,
            PaymentError::Declined {
                id: order.id(),
                reason: "card expired".to_string()
            }
        );
        assert_eq!(order.status(), OrderStatus::Ready);
        assert_eq!(gateway.calls()[0].amount, 30);

        // The claim was released, so a retry goes through
        gateway.expect_charge().for_order(order.id()).return_ok();
        client.pay(&order, PaymentMethod::Cash).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Paid);
        gateway.verify();
    }
}
