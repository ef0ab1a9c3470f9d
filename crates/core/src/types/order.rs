//! Orders and their status lifecycle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing an order status string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid order status: {0}")]
pub struct OrderStatusError(pub String);

/// Server-driven order status.
///
/// Transitions happen server-side; the only client-initiated transition is
/// a cancel request, which the server accepts while the order is still
/// [cancellable](OrderStatus::is_cancellable). The wire format is free-form
/// casing ("confirmed", "CONFIRMED", ...), so parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OrderStatus {
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether the owner may still cancel an order in this status.
    ///
    /// This is the single authoritative eligibility rule: only orders that
    /// have not yet shipped qualify.
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        matches!(self, Self::Confirmed | Self::Processing)
    }

    /// Canonical lowercase name, matching the wire format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = OrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "confirmed" => Ok(Self::Confirmed),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(OrderStatusError(s.to_string())),
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = OrderStatusError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A single item line within a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product name captured at order time.
    pub product_name: String,
    /// Ordered quantity.
    pub quantity: u32,
}

/// Shipping details captured from the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
}

/// A placed order as returned by the order-history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Server-assigned order ID (used for cancellation).
    #[serde(alias = "_id")]
    pub id: String,
    /// Human-facing order number.
    #[serde(rename = "orderId")]
    pub order_number: String,
    /// Current status.
    pub status: OrderStatus,
    /// Total charged, as computed server-side.
    pub total_amount: Decimal,
    /// Items in the order.
    pub items: Vec<OrderItem>,
    /// Shipping details submitted at checkout.
    pub shipping_address: ShippingAddress,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(
            "CONFIRMED".parse::<OrderStatus>().unwrap(),
            OrderStatus::Confirmed
        );
        assert_eq!(
            "Processing".parse::<OrderStatus>().unwrap(),
            OrderStatus::Processing
        );
        assert!("returned".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_cancellation_eligibility() {
        assert!(OrderStatus::Confirmed.is_cancellable());
        assert!(OrderStatus::Processing.is_cancellable());
        assert!(!OrderStatus::Shipped.is_cancellable());
        assert!(!OrderStatus::Delivered.is_cancellable());
        assert!(!OrderStatus::Cancelled.is_cancellable());
    }

    #[test]
    fn test_status_round_trips_through_serde() {
        let status: OrderStatus = serde_json::from_str("\"SHIPPED\"").unwrap();
        assert_eq!(status, OrderStatus::Shipped);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"shipped\"");
    }

    #[test]
    fn test_order_decodes_wire_shape() {
        let order: Order = serde_json::from_str(
            r#"{
                "_id": "o-1",
                "orderId": "ORD-2026-0001",
                "status": "confirmed",
                "totalAmount": 1000,
                "items": [{"productName": "Desk Lamp", "quantity": 2}],
                "shippingAddress": {"firstName": "Ada", "lastName": "Lovelace", "address": "12 Analytical Row"},
                "createdAt": "2026-07-30T12:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(order.id, "o-1");
        assert_eq!(order.order_number, "ORD-2026-0001");
        assert_eq!(order.total_amount, Decimal::from(1000));
        assert!(order.status.is_cancellable());
    }
}
