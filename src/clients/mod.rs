//! Handles used by the rest of the application to talk to the kitchen and to
//! the ordering, menu and payment collaborators.

pub mod error;
pub mod kitchen_client;
pub mod menu_client;
pub mod mock;
pub mod order_desk;
pub mod payment_client;

pub use error::*;
pub use kitchen_client::*;
pub use menu_client::*;
pub use order_desk::*;
pub use payment_client::*;
