//! Cart commands.

use clap::Subcommand;
use pepperleaf_client::cart::ClearMode;
use pepperleaf_client::{App, ClientError, Result};

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the current cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID (see `plf-cli products`)
        product_id: String,
    },
    /// Set the quantity of a cart line (0 removes it)
    Set {
        /// Product ID
        product_id: String,
        /// New quantity
        quantity: u32,
    },
    /// Remove a cart line
    Remove {
        /// Product ID
        product_id: String,
    },
    /// Empty the cart
    Clear,
}

pub async fn run(app: &App, action: CartAction) -> Result<()> {
    match action {
        CartAction::Show => show(app),
        CartAction::Add { product_id } => add(app, &product_id).await,
        CartAction::Set {
            product_id,
            quantity,
        } => {
            app.cart().set_quantity(&product_id, quantity).await?;
            show(app)
        }
        CartAction::Remove { product_id } => {
            app.cart().remove_item(&product_id).await?;
            show(app)
        }
        CartAction::Clear => {
            app.cart().clear(ClearMode::Announce).await?;
            Ok(())
        }
    }
}

async fn add(app: &App, product_id: &str) -> Result<()> {
    // Adding needs the product (for its name in the confirmation), so
    // resolve it through the catalog first
    let products = app.catalog().list().await.map_err(ClientError::Api)?;
    let Some(product) = products.iter().find(|p| p.id == product_id) else {
        eprintln!("no such product: {product_id}");
        return Ok(());
    };

    app.cart().add_item(product).await?;
    show(app)
}

fn show(app: &App) -> Result<()> {
    let cart = app.cart().snapshot();
    if cart.is_empty() {
        println!("cart is empty");
        return Ok(());
    }

    for line in &cart.items {
        println!(
            "{}  {} x{}  ₹{}",
            line.product_id, line.name, line.quantity, line.unit_price
        );
    }
    println!("total: {} items, ₹{}", cart.total_items, cart.total_amount);
    Ok(())
}
