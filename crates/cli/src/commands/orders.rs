//! Order history commands.

use clap::Subcommand;
use pepperleaf_client::orders::OrderHistory;
use pepperleaf_client::{App, Result};

#[derive(Subcommand)]
pub enum OrderAction {
    /// List past orders
    List,
    /// Cancel an order that has not shipped yet
    Cancel {
        /// Order ID (the first column of `orders list`)
        order_id: String,
    },
}

pub async fn run(app: &App, action: OrderAction) -> Result<()> {
    match action {
        OrderAction::List => list(app).await,
        OrderAction::Cancel { order_id } => {
            app.orders().cancel(&order_id).await?;
            Ok(())
        }
    }
}

async fn list(app: &App) -> Result<()> {
    app.orders().fetch().await?;

    let orders = app.orders().orders();
    if orders.is_empty() {
        println!("no orders yet");
        return Ok(());
    }

    for order in &orders {
        let delivery = if order.status.is_cancellable() {
            // Display-only estimate; differs between runs by design
            format!(
                ", estimated delivery {}",
                OrderHistory::estimated_delivery(order).format("%-d %b %Y")
            )
        } else {
            String::new()
        };
        println!(
            "{}  {}  {}  ₹{}  placed {}{delivery}",
            order.id,
            order.order_number,
            order.status,
            order.total_amount,
            order.created_at.format("%-d %b %Y"),
        );
        for item in &order.items {
            println!("    {} x{}", item.product_name, item.quantity);
        }
    }
    Ok(())
}
