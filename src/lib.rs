//! # Kitchen Recipe
//!
//! > **A concurrent order fulfillment engine for a restaurant.**
//!
//! Customers place orders, a bounded set of cooks prepares them in priority
//! order, and every order walks through a small lifecycle that ends in payment
//! and review.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Unbounded queue, bounded kitchen
//!
//! Orders are accepted instantly into an unbounded priority queue, but only a
//! fixed number of them are cooked at once. Pricier orders are served first;
//! orders with the same total are served first-come first-served. Big orders
//! wait their turn instead of overwhelming the kitchen.
//!
//! ### Status as ownership
//!
//! An [`Order`](domain::Order) is shared between the customer-facing workflow
//! and the kitchen. Rather than locking the whole order for the duration of
//! cooking, each side only acts while the order is in "its" status. Every
//! status change is a single locked check-and-set validated against the
//! transition table, so two actors can never both win a conflicting change.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Each layer defines its own error type ([`OrderError`](domain::OrderError),
//! [`KitchenError`](kitchen::KitchenError), [`PaymentError`](clients::PaymentError), ...).
//! Domain-rule violations are returned, never panicked; the order is left unchanged.
//!
//! ### 2. Concurrency Model
//! One dispatcher task plus at most `workers` cooking tasks on the Tokio runtime.
//! The dispatcher waits for a free slot, then for the best queued order.
//! Cooks sleep one time unit per step and check for cancellation in between.
//!
//! ### 3. Observability
//! We use `tracing` everywhere with structured logging. Each cooking task runs
//! inside a `cook{order_id=...}` span. See [`runtime::setup_tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Domain ([`domain`])
//! - **Role**: Order identities, line items and the order state machine.
//! - **Key items**: [`SequenceAllocator`](domain::SequenceAllocator), [`Order`](domain::Order), [`OrderStatus`](domain::OrderStatus).
//!
//! ### 2. The Engine ([`kitchen`])
//! - **Role**: Priority queue, cooking pool and the dispatcher loop between them.
//! - **Key items**: [`FulfillmentQueue`](kitchen::FulfillmentQueue), [`KitchenPool`](kitchen::KitchenPool), [`Dispatcher`](kitchen::Dispatcher).
//!
//! ### 3. The Interface ([`clients`])
//! - **Role**: Handles for submitting orders, filling them from the menu and paying for them.
//! - **Key items**: [`KitchenClient`](clients::KitchenClient), [`OrderDesk`](clients::OrderDesk), [`PaymentClient`](clients::PaymentClient).
//!
//! ### 4. The Orchestrator ([`runtime`])
//! - **Role**: Spins up the kitchen, wires collaborators and shuts everything down.
//! - **Key items**: [`RestaurantSystem`](runtime::RestaurantSystem).
//!
//! ### 5. Reporting ([`stats`])
//! Order count, revenue and dish ratings for the admin view.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs and a fast kitchen clock
//! RUST_LOG=info KITCHEN_TIME_UNIT_MS=100 cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod clients;
pub mod domain;
pub mod kitchen;
pub mod runtime;
pub mod stats;
