//! Order submission flow.
//!
//! Turns a populated cart plus a shipping form into a persisted order.
//! Validation runs entirely client-side before any network call; prices are
//! never part of the request because the server recomputes the total from
//! its own catalog.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pepperleaf_core::Cart;
use thiserror::Error;
use tracing::instrument;

use crate::api::types::{OrderLineRef, OrderRequest};
use crate::api::{ApiClient, ApiError};
use crate::cart::{CartSynchronizer, ClearMode};
use crate::notify::SharedNotifier;

/// Shipping details captured from the checkout form.
#[derive(Debug, Clone, Default)]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
}

/// A precondition that failed before any request was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("First name is required")]
    MissingFirstName,
    #[error("Last name is required")]
    MissingLastName,
    #[error("Address is required")]
    MissingAddress,
    #[error("Your cart is empty")]
    EmptyCart,
}

/// Errors surfaced by order submission.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// A submission is already in flight; the new one was not started.
    #[error("an order submission is already in flight")]
    Busy,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Composes cart contents and shipping details into an order request.
#[derive(Clone)]
pub struct CheckoutFlow {
    inner: Arc<CheckoutInner>,
}

struct CheckoutInner {
    api: ApiClient,
    cart: CartSynchronizer,
    notifier: SharedNotifier,
    placing: AtomicBool,
}

impl CheckoutFlow {
    #[must_use]
    pub fn new(api: ApiClient, cart: CartSynchronizer, notifier: SharedNotifier) -> Self {
        Self {
            inner: Arc::new(CheckoutInner {
                api,
                cart,
                notifier,
                placing: AtomicBool::new(false),
            }),
        }
    }

    /// Whether a submission is in flight (the busy flag). Callers must
    /// disable their submit action while this is set.
    #[must_use]
    pub fn is_placing(&self) -> bool {
        self.inner.placing.load(Ordering::Acquire)
    }

    /// Submit the current cart with the given shipping details.
    ///
    /// All preconditions (trimmed non-empty name fields and address,
    /// non-empty cart) are checked before any network call; a failing
    /// precondition surfaces a field-specific notice and sends nothing.
    ///
    /// On success the cart is cleared silently and exactly one success
    /// notice is surfaced - the order confirmation. On failure the cart and
    /// the caller's form are left untouched for retry.
    ///
    /// # Errors
    ///
    /// `Busy` if a submission is already in flight, `Invalid` for failed
    /// preconditions, `Api` for server or transport failures.
    #[instrument(skip(self, shipping))]
    pub async fn submit(&self, shipping: &ShippingDetails) -> Result<(), CheckoutError> {
        if self
            .inner
            .placing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CheckoutError::Busy);
        }
        // Release the flag on every exit path
        let _guard = PlacingGuard(&self.inner.placing);

        let cart = self.inner.cart.snapshot();
        if let Err(e) = validate(shipping, &cart) {
            self.inner.notifier.error(&e.to_string());
            return Err(e.into());
        }

        let request = OrderRequest {
            first_name: shipping.first_name.trim().to_string(),
            last_name: shipping.last_name.trim().to_string(),
            address: shipping.address.trim().to_string(),
            cart_items: cart
                .items
                .iter()
                .map(|line| OrderLineRef {
                    id: line.product_id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
        };

        match self.inner.api.create_order(&request).await {
            Ok(()) => {
                // Silent: the order confirmation is the only notice shown
                if let Err(e) = self.inner.cart.clear(ClearMode::Silent).await {
                    tracing::warn!(error = %e, "cart clear after order placement failed");
                }
                self.inner.notifier.success("Order placed successfully!");
                Ok(())
            }
            Err(e) => {
                let message = e
                    .user_message()
                    .unwrap_or("Failed to place order. Please try again.")
                    .to_string();
                tracing::error!(error = %e, "failed to place order");
                self.inner.notifier.error(&message);
                Err(e.into())
            }
        }
    }
}

/// Check every submission precondition, in form order.
fn validate(shipping: &ShippingDetails, cart: &Cart) -> Result<(), ValidationError> {
    if shipping.first_name.trim().is_empty() {
        return Err(ValidationError::MissingFirstName);
    }
    if shipping.last_name.trim().is_empty() {
        return Err(ValidationError::MissingLastName);
    }
    if shipping.address.trim().is_empty() {
        return Err(ValidationError::MissingAddress);
    }
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    Ok(())
}

struct PlacingGuard<'a>(&'a AtomicBool);

impl Drop for PlacingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use pepperleaf_core::CartLine;
    use rust_decimal::Decimal;

    use super::*;

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            address: "12 Analytical Row".to_string(),
        }
    }

    fn populated_cart() -> Cart {
        Cart {
            items: vec![CartLine {
                product_id: "p-1".to_string(),
                name: "Desk Lamp".to_string(),
                unit_price: Decimal::from(500),
                image_url: "https://img/p-1.jpg".to_string(),
                quantity: 1,
            }],
            total_items: 1,
            total_amount: Decimal::from(500),
        }
    }

    #[test]
    fn test_validate_accepts_complete_input() {
        assert_eq!(validate(&shipping(), &populated_cart()), Ok(()));
    }

    #[test]
    fn test_validate_rejects_whitespace_only_fields() {
        let mut details = shipping();
        details.first_name = "   ".to_string();
        assert_eq!(
            validate(&details, &populated_cart()),
            Err(ValidationError::MissingFirstName)
        );

        let mut details = shipping();
        details.last_name = "\t".to_string();
        assert_eq!(
            validate(&details, &populated_cart()),
            Err(ValidationError::MissingLastName)
        );

        let mut details = shipping();
        details.address = String::new();
        assert_eq!(
            validate(&details, &populated_cart()),
            Err(ValidationError::MissingAddress)
        );
    }

    #[test]
    fn test_validate_rejects_empty_cart() {
        assert_eq!(
            validate(&shipping(), &Cart::empty()),
            Err(ValidationError::EmptyCart)
        );
    }

    #[test]
    fn test_validation_message_names_the_field() {
        assert_eq!(
            ValidationError::MissingFirstName.to_string(),
            "First name is required"
        );
        assert_eq!(ValidationError::EmptyCart.to_string(), "Your cart is empty");
    }
}
