//! Catalog commands.

use pepperleaf_client::{App, ClientError, Result};

pub async fn list(app: &App) -> Result<()> {
    let products = app.catalog().list().await.map_err(ClientError::Api)?;

    if products.is_empty() {
        println!("no products found");
        return Ok(());
    }

    for product in &products {
        let marker = if app.cart().contains(&product.id) {
            let quantity = app.cart().quantity_of(&product.id);
            format!("  [in cart x{quantity}]")
        } else {
            String::new()
        };
        println!("{}  ₹{}  {}{marker}", product.id, product.price, product.name);
    }
    Ok(())
}
