//! Order submission: precondition validation, the single success notice,
//! and the silent cart clear.

use std::sync::Arc;

use pepperleaf_client::App;
use pepperleaf_client::checkout::{CheckoutError, ShippingDetails, ValidationError};
use pepperleaf_client::notify::MemoryNotifier;
use pepperleaf_core::OrderStatus;
use pepperleaf_integration_tests::MockShop;
use rust_decimal::Decimal;

const EMAIL: &str = "ada@example.com";
const PASSWORD: &str = "hunter22";

fn shipping() -> ShippingDetails {
    ShippingDetails {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        address: "12 Analytical Row".to_string(),
    }
}

async fn app_with_lamp_in_cart(shop: &MockShop) -> (App, Arc<MemoryNotifier>) {
    shop.register_account("Ada", "Lovelace", EMAIL, PASSWORD);
    let notifier = Arc::new(MemoryNotifier::new());
    let app = App::new(&shop.config(), notifier.clone()).expect("build app");
    app.login(EMAIL, PASSWORD).await.expect("login");

    let lamp = app
        .catalog()
        .list()
        .await
        .expect("list products")
        .into_iter()
        .find(|p| p.id == "p-1")
        .expect("lamp in catalog");
    app.cart().add_item(&lamp).await.expect("add");
    (app, notifier)
}

#[tokio::test]
async fn blank_first_name_fails_validation_without_any_request() {
    let shop = MockShop::spawn().await;
    let (app, notifier) = app_with_lamp_in_cart(&shop).await;
    notifier.drain();

    let mut details = shipping();
    details.first_name = "   ".to_string();

    let result = app.checkout().submit(&details).await;
    assert!(matches!(
        result,
        Err(CheckoutError::Invalid(ValidationError::MissingFirstName))
    ));
    assert!(
        notifier
            .errors()
            .contains(&"First name is required".to_string())
    );
    // Zero requests observed: the failure never reached the wire
    assert_eq!(shop.requests_to("/api/orders"), 0);
    assert_eq!(app.cart().quantity_of("p-1"), 1);
}

#[tokio::test]
async fn empty_cart_fails_validation_without_any_request() {
    let shop = MockShop::spawn().await;
    shop.register_account("Ada", "Lovelace", EMAIL, PASSWORD);
    let notifier = Arc::new(MemoryNotifier::new());
    let app = App::new(&shop.config(), notifier.clone()).expect("build app");
    app.login(EMAIL, PASSWORD).await.expect("login");

    let result = app.checkout().submit(&shipping()).await;
    assert!(matches!(
        result,
        Err(CheckoutError::Invalid(ValidationError::EmptyCart))
    ));
    assert!(notifier.errors().contains(&"Your cart is empty".to_string()));
    assert_eq!(shop.requests_to("/api/orders"), 0);
}

#[tokio::test]
async fn successful_submission_clears_the_cart_with_a_single_notice() {
    let shop = MockShop::spawn().await;
    let (app, notifier) = app_with_lamp_in_cart(&shop).await;
    notifier.drain();

    app.checkout().submit(&shipping()).await.expect("submit");

    // Exactly one user-facing success notice: the order confirmation.
    // The cart clear happened silently.
    let successes = notifier.successes();
    assert_eq!(successes, vec!["Order placed successfully!".to_string()]);
    assert!(notifier.errors().is_empty());

    // The cart is empty both locally and server-side
    assert!(app.cart().snapshot().is_empty());
    assert_eq!(shop.server_cart_len(EMAIL), 0);
    app.cart().load().await.expect("reload");
    assert!(app.cart().snapshot().is_empty());

    // The order exists with the server-computed total and trimmed address
    app.orders().fetch().await.expect("fetch orders");
    let orders = app.orders().orders();
    assert_eq!(orders.len(), 1);
    let order = orders.first().expect("order");
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.total_amount, Decimal::from(500));
    assert_eq!(order.shipping_address.first_name, "Ada");
}

#[tokio::test]
async fn shipping_fields_are_trimmed_before_submission() {
    let shop = MockShop::spawn().await;
    let (app, _) = app_with_lamp_in_cart(&shop).await;

    let details = ShippingDetails {
        first_name: "  Ada ".to_string(),
        last_name: " Lovelace".to_string(),
        address: " 12 Analytical Row  ".to_string(),
    };
    app.checkout().submit(&details).await.expect("submit");

    app.orders().fetch().await.expect("fetch orders");
    let orders = app.orders().orders();
    let address = &orders.first().expect("order").shipping_address;
    assert_eq!(address.first_name, "Ada");
    assert_eq!(address.last_name, "Lovelace");
    assert_eq!(address.address, "12 Analytical Row");
}

#[tokio::test]
async fn server_rejection_leaves_cart_and_form_for_retry() {
    let shop = MockShop::spawn().await;
    let (app, notifier) = app_with_lamp_in_cart(&shop).await;
    notifier.drain();
    shop.set_fail_create_order(true);

    let result = app.checkout().submit(&shipping()).await;
    assert!(matches!(result, Err(CheckoutError::Api(_))));
    // The server's message is surfaced, not a generic one
    assert!(
        notifier
            .errors()
            .contains(&"Payment service unavailable".to_string())
    );
    // Untouched for retry
    assert_eq!(app.cart().quantity_of("p-1"), 1);
    assert_eq!(shop.server_cart_len(EMAIL), 1);

    // Retrying the same submission succeeds once the server recovers
    shop.set_fail_create_order(false);
    app.checkout().submit(&shipping()).await.expect("retry");
    assert!(app.cart().snapshot().is_empty());
}

#[tokio::test]
async fn concurrent_submissions_are_guarded() {
    let shop = MockShop::spawn().await;
    let (app, _) = app_with_lamp_in_cart(&shop).await;

    let details = shipping();
    let (first, second) = tokio::join!(
        app.checkout().submit(&details),
        app.checkout().submit(&details)
    );

    // The first submission wins; the overlapping one is refused before any
    // validation or request
    assert!(first.is_ok());
    assert!(matches!(second, Err(CheckoutError::Busy)));
    assert!(!app.checkout().is_placing());
    assert_eq!(shop.requests_to("/api/orders"), 1);
}
