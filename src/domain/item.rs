use serde::{Deserialize, Serialize};

/// Lowest accepted review rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted review rating.
pub const MAX_RATING: u8 = 5;

/// A dish placed on an order.
///
/// `cooking_time` is measured in kitchen time units; the worker sleeps one
/// configured unit per step (see [`KitchenConfig`](crate::kitchen::KitchenConfig)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub price: u64,
    pub cooking_time: u64,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl LineItem {
    /// Creates a new line item without reviews.
    ///
    /// # Arguments
    /// * `name` - Dish name as listed on the menu
    /// * `price` - Unit price
    /// * `cooking_time` - Preparation time in kitchen time units
    pub fn new(name: impl Into<String>, price: u64, cooking_time: u64) -> Self {
        Self {
            name: name.into(),
            price,
            cooking_time,
            reviews: Vec::new(),
        }
    }

    pub fn is_reviewed(&self) -> bool {
        !self.reviews.is_empty()
    }
}

/// A customer's rating of one dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub rating: u8,
    pub comment: String,
}

impl Review {
    pub fn new(rating: u8, comment: impl Into<String>) -> Self {
        Self {
            rating,
            comment: comment.into(),
        }
    }

    pub fn is_valid_rating(rating: u8) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&rating)
    }
}
