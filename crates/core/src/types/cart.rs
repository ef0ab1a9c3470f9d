//! Cart projection types.
//!
//! The cart is server-owned; the client holds the projection defined here
//! and replaces it wholesale after every fetch. `total_items` and
//! `total_amount` are whatever the server last reported - they are never
//! recomputed by summing lines client-side, because pricing, tax, and
//! availability are recalculated server-side on every mutation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of the cart projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product this line refers to.
    pub product_id: String,
    /// Product display name at the time of the last fetch.
    pub name: String,
    /// Unit price as last reported by the server.
    pub unit_price: Decimal,
    /// Primary product image URL.
    pub image_url: String,
    /// Quantity, always >= 1 (a quantity that would drop below 1 removes
    /// the line instead).
    pub quantity: u32,
}

/// The client-side projection of the server-owned cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in server order.
    pub items: Vec<CartLine>,
    /// Total item count as reported by the server.
    pub total_items: u32,
    /// Total amount as reported by the server.
    pub total_amount: Decimal,
}

impl Cart {
    /// The empty cart, used as the fail-safe fallback state.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity of the given product, 0 when absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.items
            .iter()
            .find(|line| line.product_id == product_id)
            .map_or(0, |line| line.quantity)
    }

    /// Whether the given product has a line in the cart.
    #[must_use]
    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|line| line.product_id == product_id)
    }

    /// The line for the given product, if present.
    #[must_use]
    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.items.iter().find(|line| line.product_id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Cart {
        Cart {
            items: vec![
                CartLine {
                    product_id: "p-1".to_string(),
                    name: "Desk Lamp".to_string(),
                    unit_price: Decimal::from(500),
                    image_url: "https://img/p-1.jpg".to_string(),
                    quantity: 2,
                },
                CartLine {
                    product_id: "p-2".to_string(),
                    name: "Notebook".to_string(),
                    unit_price: Decimal::from(120),
                    image_url: "https://img/p-2.jpg".to_string(),
                    quantity: 1,
                },
            ],
            total_items: 3,
            total_amount: Decimal::from(1120),
        }
    }

    #[test]
    fn test_empty_cart_lookups() {
        let cart = Cart::empty();
        assert!(cart.is_empty());
        assert_eq!(cart.quantity_of("p-1"), 0);
        assert!(!cart.contains("p-1"));
    }

    #[test]
    fn test_lookups_on_populated_cart() {
        let cart = sample();
        assert_eq!(cart.quantity_of("p-1"), 2);
        assert_eq!(cart.quantity_of("p-3"), 0);
        assert!(cart.contains("p-2"));
        assert_eq!(cart.line("p-2").unwrap().name, "Notebook");
    }

    #[test]
    fn test_totals_are_carried_not_derived() {
        // A projection with totals that disagree with its lines is kept
        // as-is: the server figures are authoritative.
        let mut cart = sample();
        cart.total_amount = Decimal::from(999);
        let encoded = serde_json::to_string(&cart).unwrap();
        let decoded: Cart = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.total_amount, Decimal::from(999));
    }
}
