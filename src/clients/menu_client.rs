use crate::clients::MenuError;
use crate::domain::LineItem;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Source of dishes for new line items.
///
/// The kitchen itself never looks at the menu; only the ordering workflow does.
#[async_trait]
pub trait MenuCatalog: Send + Sync {
    /// Takes one portion of `name` out of stock and returns it as a line item.
    async fn take(&self, name: &str) -> Result<LineItem, MenuError>;

    /// Puts portions of `name` back into stock.
    async fn restock(&self, name: &str, portions: u32) -> Result<(), MenuError>;
}

/// A dish on the menu with its remaining stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub name: String,
    pub price: u64,
    pub cooking_time: u64,
    pub quantity: u32,
}

/// Menu held in memory, keyed by dish name.
#[derive(Debug, Default)]
pub struct InMemoryMenu {
    dishes: Mutex<BTreeMap<String, Dish>>,
}

impl InMemoryMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dish or replaces the one with the same name.
    pub fn add_dish(&self, dish: Dish) {
        info!(dish = %dish.name, price = dish.price, quantity = dish.quantity, "Dish listed");
        self.dishes().insert(dish.name.clone(), dish);
    }

    pub fn stock(&self, name: &str) -> Option<u32> {
        self.dishes().get(name).map(|dish| dish.quantity)
    }

    pub fn list(&self) -> Vec<Dish> {
        self.dishes().values().cloned().collect()
    }

    fn dishes(&self) -> MutexGuard<'_, BTreeMap<String, Dish>> {
        self.dishes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MenuCatalog for InMemoryMenu {
    async fn take(&self, name: &str) -> Result<LineItem, MenuError> {
        let mut dishes = self.dishes();
        let dish = dishes
            .get_mut(name)
            .ok_or_else(|| MenuError::UnknownDish(name.to_string()))?;
        if dish.quantity == 0 {
            return Err(MenuError::SoldOut(name.to_string()));
        }
        dish.quantity -= 1;
        debug!(dish = %name, left = dish.quantity, "Portion taken");
        Ok(LineItem::new(&dish.name, dish.price, dish.cooking_time))
    }

    async fn restock(&self, name: &str, portions: u32) -> Result<(), MenuError> {
        let mut dishes = self.dishes();
        let dish = dishes
            .get_mut(name)
            .ok_or_else(|| MenuError::UnknownDish(name.to_string()))?;
        dish.quantity = dish.quantity.saturating_add(portions);
        debug!(dish = %name, left = dish.quantity, "Restocked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> InMemoryMenu {
        let menu = InMemoryMenu::new();
        menu.add_dish(Dish {
            name: "burger".to_string(),
            price: 5,
            cooking_time: 1,
            quantity: 1,
        });
        menu
    }

    #[tokio::test]
    async fn test_take_consumes_stock() {
        let menu = menu();
        let item = menu.take("burger").await.unwrap();
        assert_eq!(item, LineItem::new("burger", 5, 1));
        assert_eq!(menu.stock("burger"), Some(0));

        assert_eq!(
            menu.take("burger").await,
            Err(MenuError::SoldOut("burger".to_string()))
        );
        menu.restock("burger", 2).await.unwrap();
        assert_eq!(menu.stock("burger"), Some(2));
    }

    #[tokio::test]
    async fn test_unknown_dish() {
        let menu = menu();
        assert_eq!(
            menu.take("pizza").await,
            Err(MenuError::UnknownDish("pizza".to_string()))
        );
        assert!(menu.restock("pizza", 1).await.is_err());
        assert_eq!(menu.list().len(), 1);
    }
}
