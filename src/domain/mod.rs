//! Order lifecycle types: identities, line items and the order state machine.

pub mod error;
pub mod item;
pub mod order;
pub mod sequence;

pub use error::*;
pub use item::*;
pub use order::*;
pub use sequence::*;
