//! Restaurant statistics derived from order snapshots.

use crate::domain::{Order, OrderStatus};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Review summary for one dish across all orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DishRating {
    pub reviews: usize,
    pub rating_sum: u64,
}

impl DishRating {
    pub fn average(&self) -> Option<f64> {
        (self.reviews > 0).then(|| self.rating_sum as f64 / self.reviews as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RestaurantStats {
    /// Orders ever opened, whatever their status
    pub orders: usize,
    /// Total price of paid and reviewed orders
    pub revenue: u128,
    pub dishes: BTreeMap<String, DishRating>,
}

impl RestaurantStats {
    pub fn collect(orders: &[Arc<Order>]) -> Self {
        let mut stats = Self {
            orders: orders.len(),
            ..Self::default()
        };

        for order in orders {
            let snapshot = order.snapshot();
            if matches!(snapshot.status, OrderStatus::Paid | OrderStatus::Reviewed) {
                stats.revenue += u128::from(snapshot.total_price);
            }
            for item in snapshot.items {
                let entry = stats.dishes.entry(item.name).or_default();
                for review in item.reviews {
                    entry.reviews += 1;
                    entry.rating_sum += u64::from(review.rating);
                }
            }
        }
        stats
    }

    /// The dish with the most reviews. Ties go to the alphabetically first name.
    pub fn most_popular(&self) -> Option<(&str, &DishRating)> {
        self.dishes
            .iter()
            .filter(|(_, rating)| rating.reviews > 0)
            .fold(None, |best: Option<(&String, &DishRating)>, (name, rating)| match best {
                Some((_, top)) if top.reviews >= rating.reviews => best,
                _ => Some((name, rating)),
            })
            .map(|(name, rating)| (name.as_str(), rating))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineItem, SequenceAllocator};

    fn reviewed(allocator: &SequenceAllocator, dishes: &[(&str, u64, u8)]) -> Arc<Order> {
        let order = Order::new(allocator);
        for (name, price, _) in dishes {
            order.add_item(LineItem::new(*name, *price, 1)).unwrap();
        }
        order.start_cooking().unwrap();
        order.finish_cooking().unwrap();
        order.mark_paid().unwrap();
        for (index, (_, _, rating)) in dishes.iter().enumerate() {
            order.record_review(index, *rating, "").unwrap();
        }
        Arc::new(order)
    }

    #[test]
    fn test_collect() {
        let allocator = SequenceAllocator::new();
        let open = Arc::new(Order::new(&allocator));
        open.add_item(LineItem::new("burger", 100, 1)).unwrap();

        let orders = vec![
            reviewed(&allocator, &[("burger", 5, 4), ("fries", 3, 2)]),
            reviewed(&allocator, &[("burger", 5, 5)]),
            open,
        ];
        let stats = RestaurantStats::collect(&orders);

        assert_eq!(stats.orders, 3);
        assert_eq!(stats.revenue, 13);
        assert_eq!(stats.dishes["burger"].reviews, 2);
        assert_eq!(stats.dishes["burger"].average(), Some(4.5));
        assert_eq!(stats.dishes["fries"].average(), Some(2.0));

        let (name, rating) = stats.most_popular().unwrap();
        assert_eq!(name, "burger");
        assert_eq!(rating.reviews, 2);
    }

    #[test]
    fn test_revenue_exceeds_a_single_order_total() {
        let allocator = SequenceAllocator::new();
        let orders = vec![
            reviewed(&allocator, &[("caviar", u64::MAX, 5)]),
            reviewed(&allocator, &[("truffle", 5, 5)]),
        ];

        let stats = RestaurantStats::collect(&orders);
        assert_eq!(stats.revenue, u128::from(u64::MAX) + 5);
    }

    #[test]
    fn test_no_reviews() {
        let allocator = SequenceAllocator::new();
        let order = Arc::new(Order::new(&allocator));
        order.add_item(LineItem::new("soup", 4, 1)).unwrap();

        let stats = RestaurantStats::collect(&[order]);
        assert_eq!(stats.revenue, 0);
        assert_eq!(stats.dishes["soup"].average(), None);
        assert!(stats.most_popular().is_none());
    }
}
