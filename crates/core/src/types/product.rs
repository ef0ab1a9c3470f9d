//! Catalog products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A read-only catalog entry.
///
/// Products are fetched from the remote catalog and never mutated by the
/// client. The server is the pricing authority; `price` here is display
/// data, not what gets charged at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned product ID.
    #[serde(alias = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short marketing description.
    pub description: String,
    /// Unit price in the store currency.
    pub price: Decimal,
    /// Primary image URL.
    #[serde(rename = "image")]
    pub image_url: String,
}
