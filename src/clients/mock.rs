//! # Mock Payment Gateway
//!
//! Utilities for testing payment flows without a real provider.
//!
//! Queue expectations with [`MockPaymentGateway::expect_charge`], hand the mock
//! to a [`PaymentClient`](crate::clients::PaymentClient), then call
//! [`verify`](MockPaymentGateway::verify) to assert every expectation was used.
//!
//! ```ignore
//! let gateway = Arc::new(MockPaymentGateway::new());
//! gateway.expect_charge().for_order(order.id()).return_ok();
//!
//! let payments = PaymentClient::new(gateway.clone());
//! payments.pay(&order, PaymentMethod::Cash).await?;
//! gateway.verify();
//! ```

use crate::clients::{PaymentError, PaymentGateway, PaymentMethod};
use crate::domain::OrderId;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Represents an expected `charge` call and the answer to give.
struct Expectation {
    order_id: Option<OrderId>,
    response: Result<(), String>,
}

/// A charge the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charge {
    pub order_id: OrderId,
    pub amount: u64,
    pub method: PaymentMethod,
}

/// A payment gateway with expectation tracking for fluent testing.
///
/// Unexpected charges panic.
#[derive(Default)]
pub struct MockPaymentGateway {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    calls: Mutex<Vec<Charge>>,
}

impl MockPaymentGateway {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects one more `charge` call.
    pub fn expect_charge(&self) -> ChargeExpectationBuilder {
        ChargeExpectationBuilder {
            order_id: None,
            expectations: self.expectations.clone(),
        }
    }

    /// Every charge received so far, oldest first.
    pub fn calls(&self) -> Vec<Charge> {
        self.calls.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn charge(
        &self,
        order_id: OrderId,
        amount: u64,
        method: PaymentMethod,
    ) -> Result<(), PaymentError> {
        self.calls.lock().unwrap().push(Charge {
            order_id,
            amount,
            method,
        });

        let expectation = self.expectations.lock().unwrap().pop_front();
        let Some(expectation) = expectation else {
            panic!("Unexpected charge for {order_id}");
        };
        if let Some(expected) = expectation.order_id {
            assert_eq!(expected, order_id, "charge for unexpected order");
        }
        expectation
            .response
            .map_err(|reason| PaymentError::Declined {
                id: order_id,
                reason,
            })
    }
}

/// Builder for `charge` expectations.
pub struct ChargeExpectationBuilder {
    order_id: Option<OrderId>,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ChargeExpectationBuilder {
    /// Restricts the expectation to one order.
    pub fn for_order(mut self, order_id: OrderId) -> Self {
        self.order_id = Some(order_id);
        self
    }

    /// Accepts the charge.
    pub fn return_ok(self) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation {
            order_id: self.order_id,
            response: Ok(()),
        });
    }

    /// Declines the charge with `reason`.
    pub fn return_err(self, reason: impl Into<String>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation {
            order_id: self.order_id,
            response: Err(reason.into()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SequenceAllocator;

    #[tokio::test]
    async fn test_mock_gateway_with_expectations() {
        let allocator = SequenceAllocator::new();
        let first = allocator.next_id();
        let second = allocator.next_id();

        let mock = MockPaymentGateway::new();
        mock.expect_charge().for_order(first).return_ok();
        mock.expect_charge().return_err("no funds");

        assert!(mock.charge(first, 10, PaymentMethod::Cash).await.is_ok());
        assert_eq!(
            mock.charge(second, 20, PaymentMethod::QrCode).await,
            Err(PaymentError::Declined {
                id: second,
                reason: "no funds".to_string()
            })
        );

        assert_eq!(mock.calls().len(), 2);
        assert_eq!(mock.calls()[1].method, PaymentMethod::QrCode);
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_verify_reports_unused_expectations() {
        let mock = MockPaymentGateway::new();
        mock.expect_charge().return_ok();
        mock.verify();
    }
}
