//! # Kitchen Recipe demo
//!
//! Runs one service through the whole pipeline:
//! 1.  Setting up the [`RestaurantSystem`] with a small menu.
//! 2.  Placing three orders and sending them to the kitchen.
//! 3.  Cancelling one while it waits, paying for and reviewing the others.
//! 4.  Printing the restaurant statistics.
//!
//! Use `KITCHEN_TIME_UNIT_MS` to speed the kitchen clock up.

use kitchen_recipe::clients::{CashRegister, Dish, InMemoryMenu, PaymentMethod};
use kitchen_recipe::domain::{Order, OrderStatus};
use kitchen_recipe::kitchen::KitchenConfig;
use kitchen_recipe::runtime::{setup_tracing, RestaurantSystem};
use kitchen_recipe::stats::RestaurantStats;
use std::sync::Arc;
use tracing::{error, info, Instrument};

async fn wait_for(order: &Order, status: OrderStatus) -> Result<(), String> {
    let mut rx = order.subscribe();
    rx.wait_for(|s| *s == status)
        .await
        .map(|_| ())
        .map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = KitchenConfig::from_env().map_err(|e| e.to_string())?;
    info!(?config, "Starting restaurant");

    let menu = Arc::new(InMemoryMenu::new());
    for (name, price, cooking_time, quantity) in [
        ("burger", 5, 1, 10),
        ("fries", 7, 2, 10),
        ("steak", 30, 3, 2),
        ("soup", 4, 1, 5),
    ] {
        menu.add_dish(Dish {
            name: name.to_string(),
            price,
            cooking_time,
            quantity,
        });
    }
    let register = Arc::new(CashRegister::new());
    let system = RestaurantSystem::new(&config, menu.clone(), register.clone())
        .map_err(|e| e.to_string())?;

    let span = tracing::info_span!("ordering");
    let orders = async {
        let mut orders = Vec::new();
        for dishes in [&["burger", "fries"][..], &["steak", "soup"][..], &["soup"][..]] {
            let order = system.desk.open_order();
            for dish in dishes {
                system
                    .desk
                    .add_item(&order, dish)
                    .await
                    .map_err(|e| e.to_string())?;
            }
            orders.push(order);
        }
        Ok::<_, String>(orders)
    }
    .instrument(span)
    .await?;

    for order in &orders {
        system
            .kitchen
            .submit_for_fulfillment(order.clone())
            .map_err(|e| e.to_string())?;
    }

    // Two cooks: the cheapest order is still waiting and can be cancelled
    if let Err(e) = orders[2].cancel() {
        error!(error = %e, "Cancel failed");
    }

    for order in &orders[..2] {
        wait_for(order, OrderStatus::Ready).await?;
        if let Err(e) = order.cancel() {
            info!(order_id = %order.id(), error = %e, "Too late to cancel");
        }

        system
            .payments
            .pay(order, PaymentMethod::Cash)
            .await
            .map_err(|e| e.to_string())?;

        for (index, item) in order.items().iter().enumerate() {
            let rating = if item.price > 10 { 5 } else { 4 };
            order
                .record_review(index, rating, format!("{} was good", item.name))
                .map_err(|e| e.to_string())?;
        }
        info!(order_id = %order.id(), status = %order.status(), "Order complete");
    }

    let stats = RestaurantStats::collect(&orders);
    info!(
        orders = stats.orders,
        revenue = stats.revenue,
        register = register.revenue(),
        "Statistics"
    );
    for (name, rating) in &stats.dishes {
        match rating.average() {
            Some(average) => info!(dish = %name, average = format!("{average:.2}"), "Rating"),
            None => info!(dish = %name, "No ratings yet"),
        }
    }
    if let Some((name, rating)) = stats.most_popular() {
        info!(dish = %name, reviews = rating.reviews, "Most popular dish");
    }

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
