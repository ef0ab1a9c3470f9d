//! Conversions from wire-format types to domain types.

use pepperleaf_core::{Cart, CartLine};

use super::types::{RawCart, RawCartEntry};

/// Convert a raw cart payload into the domain projection.
///
/// Totals are carried over verbatim - the server computed them and the
/// client does not second-guess them.
pub fn convert_cart(raw: RawCart) -> Cart {
    Cart {
        items: raw.items.into_iter().map(convert_entry).collect(),
        total_items: raw.total_items,
        total_amount: raw.total_amount,
    }
}

fn convert_entry(entry: RawCartEntry) -> CartLine {
    CartLine {
        product_id: entry.product.id().to_string(),
        name: entry.product_name,
        unit_price: entry.price,
        image_url: entry.image,
        quantity: entry.quantity,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::types::Envelope;

    #[test]
    fn test_convert_cart_with_bare_product_id() {
        let raw: RawCart = serde_json::from_str(
            r#"{
                "items": [
                    {"product": "p-1", "productName": "Desk Lamp", "price": 500, "image": "https://img/p-1.jpg", "quantity": 2}
                ],
                "totalItems": 2,
                "totalAmount": 1000
            }"#,
        )
        .unwrap();

        let cart = convert_cart(raw);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.quantity_of("p-1"), 2);
        assert_eq!(cart.total_amount, Decimal::from(1000));
    }

    #[test]
    fn test_convert_cart_with_embedded_product() {
        let raw: RawCart = serde_json::from_str(
            r#"{
                "items": [
                    {"product": {"_id": "p-2", "name": "Notebook", "price": 120},
                     "productName": "Notebook", "price": 120, "image": "https://img/p-2.jpg", "quantity": 1}
                ],
                "totalItems": 1,
                "totalAmount": 120
            }"#,
        )
        .unwrap();

        let cart = convert_cart(raw);
        assert!(cart.contains("p-2"));
        assert_eq!(cart.line("p-2").unwrap().unit_price, Decimal::from(120));
    }

    #[test]
    fn test_totals_taken_verbatim_even_when_inconsistent() {
        // Server-side discounts can make totals diverge from a naive sum of
        // lines; the projection must reflect the server figure.
        let raw: RawCart = serde_json::from_str(
            r#"{
                "items": [
                    {"product": "p-1", "productName": "Desk Lamp", "price": 500, "image": "https://img/p-1.jpg", "quantity": 2}
                ],
                "totalItems": 2,
                "totalAmount": 900
            }"#,
        )
        .unwrap();

        assert_eq!(convert_cart(raw).total_amount, Decimal::from(900));
    }

    #[test]
    fn test_envelope_decodes_failure_shape() {
        let envelope: Envelope<RawCart> =
            serde_json::from_str(r#"{"success": false, "message": "Cart not found"}"#).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("Cart not found"));
    }
}
