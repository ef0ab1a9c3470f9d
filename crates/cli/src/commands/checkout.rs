//! Checkout command.

use pepperleaf_client::checkout::ShippingDetails;
use pepperleaf_client::{App, Result};

pub async fn place_order(
    app: &App,
    first_name: String,
    last_name: String,
    address: String,
) -> Result<()> {
    let shipping = ShippingDetails {
        first_name,
        last_name,
        address,
    };
    app.checkout().submit(&shipping).await?;
    Ok(())
}
