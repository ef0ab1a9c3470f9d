//! Cart synchronization: reload-after-mutate, fail-safe loads, lookups.

use std::sync::Arc;

use pepperleaf_client::App;
use pepperleaf_client::cart::CartError;
use pepperleaf_client::notify::MemoryNotifier;
use pepperleaf_core::Product;
use pepperleaf_integration_tests::MockShop;
use rust_decimal::Decimal;

const EMAIL: &str = "ada@example.com";
const PASSWORD: &str = "hunter22";

async fn signed_in_app(shop: &MockShop) -> (App, Arc<MemoryNotifier>) {
    shop.register_account("Ada", "Lovelace", EMAIL, PASSWORD);
    let notifier = Arc::new(MemoryNotifier::new());
    let app = App::new(&shop.config(), notifier.clone()).expect("build app");
    app.login(EMAIL, PASSWORD).await.expect("login");
    (app, notifier)
}

async fn catalog_product(app: &App, product_id: &str) -> Product {
    app.catalog()
        .list()
        .await
        .expect("list products")
        .into_iter()
        .find(|p| p.id == product_id)
        .expect("product in catalog")
}

#[tokio::test]
async fn adding_twice_yields_one_line_with_server_computed_totals() {
    let shop = MockShop::spawn().await;
    let (app, notifier) = signed_in_app(&shop).await;
    let lamp = catalog_product(&app, "p-1").await; // priced 500

    app.cart().add_item(&lamp).await.expect("first add");
    app.cart().add_item(&lamp).await.expect("second add");

    let cart = app.cart().snapshot();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.quantity_of("p-1"), 2);
    assert!(cart.contains("p-1"));
    assert_eq!(cart.total_items, 2);
    // 1000 as returned by the reload, not summed client-side
    assert_eq!(cart.total_amount, Decimal::from(1000));
    assert_eq!(
        notifier
            .successes()
            .iter()
            .filter(|m| *m == "Desk Lamp added to cart!")
            .count(),
        2
    );
}

#[tokio::test]
async fn setting_quantity_to_zero_is_removal() {
    let shop = MockShop::spawn().await;
    let (app, _) = signed_in_app(&shop).await;
    let lamp = catalog_product(&app, "p-1").await;

    app.cart().add_item(&lamp).await.expect("add");
    app.cart()
        .set_quantity("p-1", 0)
        .await
        .expect("set quantity 0");

    let after_zero = app.cart().snapshot();
    assert!(after_zero.is_empty());
    assert_eq!(after_zero.total_items, 0);
    assert_eq!(after_zero.total_amount, Decimal::ZERO);

    // The zero-quantity path went through removal, not an update
    assert!(
        shop.requests()
            .contains(&"DELETE /api/cart/item/p-1".to_string())
    );
    assert!(
        !shop
            .requests()
            .contains(&"PUT /api/cart/item/p-1".to_string())
    );

    // An explicit removal lands in the identical state
    app.cart().add_item(&lamp).await.expect("re-add");
    app.cart().remove_item("p-1").await.expect("remove");
    assert_eq!(app.cart().snapshot(), after_zero);
}

#[tokio::test]
async fn quantity_updates_reload_instead_of_patching() {
    let shop = MockShop::spawn().await;
    let (app, _) = signed_in_app(&shop).await;
    let lamp = catalog_product(&app, "p-1").await;

    app.cart().add_item(&lamp).await.expect("add");
    app.cart().set_quantity("p-1", 3).await.expect("set 3");
    assert_eq!(app.cart().quantity_of("p-1"), 3);
    assert_eq!(app.cart().snapshot().total_amount, Decimal::from(1500));
}

#[tokio::test]
async fn totals_are_taken_verbatim_from_the_server() {
    let shop = MockShop::spawn().await;
    let (app, _) = signed_in_app(&shop).await;
    let lamp = catalog_product(&app, "p-1").await;
    app.cart().add_item(&lamp).await.expect("add");

    // Server-side discounting: the reported total diverges from the line sum
    shop.set_total_override(Some(Decimal::from(420)));
    app.cart().load().await.expect("reload");

    let cart = app.cart().snapshot();
    assert_eq!(cart.quantity_of("p-1"), 1);
    assert_eq!(cart.total_amount, Decimal::from(420));
}

#[tokio::test]
async fn unauthenticated_add_reports_and_sends_nothing() {
    let shop = MockShop::spawn().await;
    let notifier = Arc::new(MemoryNotifier::new());
    let app = App::new(&shop.config(), notifier.clone()).expect("build app");
    let lamp = catalog_product(&app, "p-1").await;

    let result = app.cart().add_item(&lamp).await;
    assert!(matches!(result, Err(CartError::NotAuthenticated)));
    assert!(
        notifier
            .errors()
            .contains(&"Please sign in to add items to cart".to_string())
    );
    assert_eq!(shop.requests_to("/api/cart"), 0);
}

#[tokio::test]
async fn catalog_reads_are_cached_until_invalidated() {
    let shop = MockShop::spawn().await;
    let notifier = Arc::new(MemoryNotifier::new());
    let app = App::new(&shop.config(), notifier).expect("build app");

    let first = app.catalog().list().await.expect("first list");
    let second = app.catalog().list().await.expect("second list");
    assert_eq!(first, second);
    assert_eq!(shop.requests_to("/api/products"), 1);

    app.catalog().invalidate().await;
    app.catalog().list().await.expect("third list");
    assert_eq!(shop.requests_to("/api/products"), 2);
}

#[tokio::test]
async fn failed_load_resets_to_the_empty_cart_and_self_heals() {
    let shop = MockShop::spawn().await;
    let (app, _) = signed_in_app(&shop).await;
    let lamp = catalog_product(&app, "p-1").await;
    app.cart().add_item(&lamp).await.expect("add");
    assert!(!app.cart().snapshot().is_empty());

    shop.set_fail_cart_fetch(true);
    assert!(app.cart().load().await.is_err());
    // Fail-safe: never a stale or partial cart
    assert!(app.cart().snapshot().is_empty());
    assert!(!app.cart().is_loading());

    // The next natural load self-heals
    shop.set_fail_cart_fetch(false);
    app.cart().load().await.expect("reload");
    assert_eq!(app.cart().quantity_of("p-1"), 1);
}
