//! Runtime orchestration and lifecycle management.
//!
//! # Main Components
//!
//! - [`RestaurantSystem`] - Wires the kitchen, ordering desk and payments together
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod restaurant_system;
pub mod tracing;

pub use restaurant_system::*;
pub use self::tracing::*;
