//! Wire-format types for the remote API.
//!
//! These mirror the JSON the server actually speaks, which differs from the
//! domain types in `pepperleaf-core` (raw cart entries carry an embedded or
//! referenced product, field names follow the server's casing). Conversions
//! to the domain view live in [`super::conversions`].

use pepperleaf_core::{Order, Product, User};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Response envelope wrapping every API payload.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Payload, present on success.
    pub data: Option<T>,
    /// Human-readable message, present on failure (and some successes).
    pub message: Option<String>,
}

/// Payload of a successful login or signup.
#[derive(Debug, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    /// Opaque bearer token.
    pub token: String,
}

/// Body of `POST /auth/signup`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /cart/add`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest<'a> {
    pub product_id: &'a str,
    pub quantity: u32,
}

/// Body of `PUT /cart/item/:id`.
#[derive(Debug, Serialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

/// One `{id, quantity}` pair in an order request.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineRef {
    pub id: String,
    pub quantity: u32,
}

/// Body of `POST /orders`.
///
/// Prices are intentionally absent: the server is the pricing authority and
/// recomputes the total from its own catalog.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub cart_items: Vec<OrderLineRef>,
}

/// Payload of `GET /products`.
#[derive(Debug, Deserialize)]
pub struct ProductListData {
    pub products: Vec<Product>,
}

/// Payload of `GET /orders`.
#[derive(Debug, Deserialize)]
pub struct OrderListData {
    pub orders: Vec<Order>,
}

/// Payload of `GET /auth/profile`.
#[derive(Debug, Deserialize)]
pub struct ProfileData {
    pub user: User,
}

// =============================================================================
// Raw cart
// =============================================================================

/// Product reference on a raw cart entry.
///
/// The server returns either a bare product ID or an embedded product
/// document depending on whether the entry was populated.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Id(String),
    Embedded(EmbeddedProduct),
}

impl ProductRef {
    /// The referenced product's ID, whichever form was sent.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Embedded(product) => &product.id,
        }
    }
}

/// Embedded product document on a populated cart entry.
///
/// Only the ID is needed; remaining fields are denormalized onto the entry
/// itself.
#[derive(Debug, Deserialize)]
pub struct EmbeddedProduct {
    #[serde(alias = "_id")]
    pub id: String,
}

/// One raw cart entry as the server stores it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCartEntry {
    pub product: ProductRef,
    pub product_name: String,
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
}

/// Payload of `GET /cart`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCart {
    pub items: Vec<RawCartEntry>,
    pub total_items: u32,
    pub total_amount: Decimal,
}
