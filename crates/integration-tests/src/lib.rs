//! Test harness: an in-process mock of the Pepperleaf API.
//!
//! [`MockShop`] hosts the full endpoint surface on an ephemeral port with
//! the real response envelope, bearer auth, and server-computed cart
//! totals, plus knobs for failure injection and a request log so tests can
//! assert on exactly which requests a client operation produced.

#![cfg_attr(not(test), forbid(unsafe_code))]
// Test support: aborting on a broken harness is the right failure mode
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use pepperleaf_client::ClientConfig;
use pepperleaf_core::{Order, OrderItem, OrderStatus, Product, ShippingAddress, User};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tempfile::TempDir;
use uuid::Uuid;

type Shared = Arc<Mutex<ShopState>>;
type Reply = (StatusCode, Json<Value>);

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct ShopState {
    products: Vec<Product>,
    accounts: Vec<Account>,
    /// token -> user id
    tokens: HashMap<String, String>,
    /// user id -> (product id, quantity) in insertion order
    carts: HashMap<String, Vec<(String, u32)>>,
    /// (owner user id, order)
    orders: Vec<(String, Order)>,
    request_log: Vec<String>,
    total_override: Option<Decimal>,
    fail_cart_fetch: bool,
    fail_create_order: bool,
    seq: u32,
}

impl ShopState {
    fn with_catalog() -> Self {
        Self {
            products: vec![
                product("p-1", "Desk Lamp", Decimal::from(500)),
                product("p-2", "Notebook", Decimal::from(120)),
                product("p-3", "Espresso Kettle", Decimal::new(249_950, 2)),
            ],
            ..Self::default()
        }
    }

    fn next_seq(&mut self) -> u32 {
        self.seq += 1;
        self.seq
    }

    fn user_of(&self, headers: &HeaderMap) -> Option<String> {
        let token = headers
            .get("authorization")?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        self.tokens.get(token).cloned()
    }

    fn cart_json(&self, user_id: &str) -> Value {
        let entries = self.carts.get(user_id).cloned().unwrap_or_default();
        let mut total_items: u32 = 0;
        let mut total_amount = Decimal::ZERO;
        let mut items = Vec::new();
        for (product_id, quantity) in &entries {
            let Some(product) = self.products.iter().find(|p| p.id == *product_id) else {
                continue;
            };
            total_items += quantity;
            total_amount += product.price * Decimal::from(*quantity);
            items.push(json!({
                "product": product_id,
                "productName": product.name,
                "price": product.price,
                "image": product.image_url,
                "quantity": quantity,
            }));
        }
        if let Some(total) = self.total_override {
            total_amount = total;
        }
        json!({
            "items": items,
            "totalItems": total_items,
            "totalAmount": total_amount,
        })
    }
}

fn product(id: &str, name: &str, price: Decimal) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{name} from the Pepperleaf catalog"),
        price,
        image_url: format!("https://img.pepperleaf.shop/{id}.jpg"),
    }
}

fn ok(data: Value) -> Reply {
    (StatusCode::OK, Json(json!({"success": true, "data": data})))
}

fn fail(status: StatusCode, message: &str) -> Reply {
    (
        status,
        Json(json!({"success": false, "message": message})),
    )
}

fn unauthorized() -> Reply {
    fail(StatusCode::UNAUTHORIZED, "Not authorized")
}

// =============================================================================
// Handlers
// =============================================================================

async fn signup(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut state = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if state.accounts.iter().any(|a| a.user.email == email) {
        return fail(
            StatusCode::CONFLICT,
            "An account with this email already exists",
        );
    }

    let seq = state.next_seq();
    let user = User {
        id: format!("u-{seq}"),
        first_name: body["firstName"].as_str().unwrap_or_default().to_string(),
        last_name: body["lastName"].as_str().unwrap_or_default().to_string(),
        email,
    };
    let password = body["password"].as_str().unwrap_or_default().to_string();
    state.accounts.push(Account {
        user: user.clone(),
        password,
    });

    let token = Uuid::new_v4().to_string();
    state.tokens.insert(token.clone(), user.id.clone());
    ok(json!({"user": user, "token": token}))
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut state = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let Some(user) = state
        .accounts
        .iter()
        .find(|a| a.user.email == email && a.password == password)
        .map(|a| a.user.clone())
    else {
        return fail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    };

    let token = Uuid::new_v4().to_string();
    state.tokens.insert(token.clone(), user.id.clone());
    ok(json!({"user": user, "token": token}))
}

async fn profile(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let state = state.lock().unwrap();
    let Some(user_id) = state.user_of(&headers) else {
        return unauthorized();
    };
    let user = state
        .accounts
        .iter()
        .find(|a| a.user.id == user_id)
        .map(|a| a.user.clone());
    user.map_or_else(
        || fail(StatusCode::NOT_FOUND, "User not found"),
        |user| ok(json!({"user": user})),
    )
}

async fn products(State(state): State<Shared>) -> Reply {
    let state = state.lock().unwrap();
    ok(json!({
        "products": state.products,
        "count": state.products.len(),
    }))
}

async fn get_cart(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let state = state.lock().unwrap();
    let Some(user_id) = state.user_of(&headers) else {
        return unauthorized();
    };
    if state.fail_cart_fetch {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong");
    }
    ok(state.cart_json(&user_id))
}

async fn cart_add(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut state = state.lock().unwrap();
    let Some(user_id) = state.user_of(&headers) else {
        return unauthorized();
    };
    let product_id = body["productId"].as_str().unwrap_or_default().to_string();
    let quantity = u32::try_from(body["quantity"].as_u64().unwrap_or(1)).unwrap_or(1);

    if !state.products.iter().any(|p| p.id == product_id) {
        return fail(StatusCode::NOT_FOUND, "Product not found");
    }

    let entries = state.carts.entry(user_id.clone()).or_default();
    if let Some(entry) = entries.iter_mut().find(|(id, _)| *id == product_id) {
        entry.1 += quantity;
    } else {
        entries.push((product_id, quantity));
    }
    ok(state.cart_json(&user_id))
}

async fn cart_update(
    State(state): State<Shared>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut state = state.lock().unwrap();
    let Some(user_id) = state.user_of(&headers) else {
        return unauthorized();
    };
    let quantity = u32::try_from(body["quantity"].as_u64().unwrap_or(0)).unwrap_or(0);

    let entries = state.carts.entry(user_id.clone()).or_default();
    let Some(entry) = entries.iter_mut().find(|(id, _)| *id == product_id) else {
        return fail(StatusCode::NOT_FOUND, "Item not in cart");
    };
    entry.1 = quantity;
    ok(state.cart_json(&user_id))
}

async fn cart_remove(
    State(state): State<Shared>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    let mut state = state.lock().unwrap();
    let Some(user_id) = state.user_of(&headers) else {
        return unauthorized();
    };
    let entries = state.carts.entry(user_id.clone()).or_default();
    entries.retain(|(id, _)| *id != product_id);
    ok(state.cart_json(&user_id))
}

async fn cart_clear(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = state.lock().unwrap();
    let Some(user_id) = state.user_of(&headers) else {
        return unauthorized();
    };
    state.carts.insert(user_id.clone(), Vec::new());
    ok(state.cart_json(&user_id))
}

async fn create_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut state = state.lock().unwrap();
    let Some(user_id) = state.user_of(&headers) else {
        return unauthorized();
    };
    if state.fail_create_order {
        return fail(StatusCode::BAD_GATEWAY, "Payment service unavailable");
    }

    let cart_items = body["cartItems"].as_array().cloned().unwrap_or_default();
    if cart_items.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "Cart is empty");
    }

    // The server is the pricing authority: totals come from the catalog,
    // never from the request
    let mut total_amount = Decimal::ZERO;
    let mut items = Vec::new();
    for item in &cart_items {
        let id = item["id"].as_str().unwrap_or_default();
        let quantity = u32::try_from(item["quantity"].as_u64().unwrap_or(0)).unwrap_or(0);
        let Some(product) = state.products.iter().find(|p| p.id == id) else {
            return fail(StatusCode::NOT_FOUND, "Product not found");
        };
        total_amount += product.price * Decimal::from(quantity);
        items.push(OrderItem {
            product_name: product.name.clone(),
            quantity,
        });
    }

    let seq = state.next_seq();
    let order = Order {
        id: format!("o-{seq}"),
        order_number: format!("ORD-{seq:04}"),
        status: OrderStatus::Confirmed,
        total_amount,
        items,
        shipping_address: ShippingAddress {
            first_name: body["firstName"].as_str().unwrap_or_default().to_string(),
            last_name: body["lastName"].as_str().unwrap_or_default().to_string(),
            address: body["address"].as_str().unwrap_or_default().to_string(),
        },
        created_at: Utc::now(),
    };
    let order_json = serde_json::to_value(&order).unwrap();
    state.orders.push((user_id, order));
    // The cart is NOT cleared here: clearing is the client's follow-up
    ok(json!({"order": order_json}))
}

async fn list_orders(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let state = state.lock().unwrap();
    let Some(user_id) = state.user_of(&headers) else {
        return unauthorized();
    };
    let orders: Vec<&Order> = state
        .orders
        .iter()
        .filter(|(owner, _)| *owner == user_id)
        .map(|(_, order)| order)
        .collect();
    ok(json!({"orders": orders}))
}

async fn cancel_order(
    State(state): State<Shared>,
    Path(order_id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    let mut state = state.lock().unwrap();
    let Some(user_id) = state.user_of(&headers) else {
        return unauthorized();
    };
    let Some((_, order)) = state
        .orders
        .iter_mut()
        .find(|(owner, order)| *owner == user_id && order.id == order_id)
    else {
        return fail(StatusCode::NOT_FOUND, "Order not found");
    };
    if !order.status.is_cancellable() {
        return fail(StatusCode::BAD_REQUEST, "Order cannot be cancelled");
    }
    order.status = OrderStatus::Cancelled;
    ok(json!({"order": serde_json::to_value(&*order).unwrap()}))
}

async fn track(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri().path());
    state.lock().unwrap().request_log.push(line);
    next.run(request).await
}

// =============================================================================
// MockShop
// =============================================================================

/// A running mock API plus a fresh data directory for the client under
/// test.
pub struct MockShop {
    /// `http://127.0.0.1:<port>`
    pub base_url: String,
    state: Shared,
    data_dir: TempDir,
}

impl MockShop {
    /// Start the mock API on an ephemeral port with the default catalog.
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(ShopState::with_catalog()));

        let router = Router::new()
            .route("/api/auth/signup", post(signup))
            .route("/api/auth/login", post(login))
            .route("/api/auth/profile", get(profile))
            .route("/api/products", get(products))
            .route("/api/cart", get(get_cart))
            .route("/api/cart/add", post(cart_add))
            .route("/api/cart/item/{id}", put(cart_update).delete(cart_remove))
            .route("/api/cart/clear", delete(cart_clear))
            .route("/api/orders", post(create_order).get(list_orders))
            .route("/api/orders/{id}/cancel", axum::routing::patch(cancel_order))
            .layer(middleware::from_fn_with_state(state.clone(), track))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock API listener");
        let addr = listener.local_addr().expect("mock API local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve mock API");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            data_dir: tempfile::tempdir().expect("create data dir"),
        }
    }

    /// Client configuration pointing at this mock, with a session data
    /// directory that outlives individual `App` instances (so restart
    /// scenarios can restore it).
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            api_base_url: format!("{}/api", self.base_url).parse().unwrap(),
            request_timeout: Duration::from_secs(5),
            data_dir: self.data_dir.path().join("session"),
        }
    }

    /// Register an account directly, skipping the signup endpoint.
    pub fn register_account(&self, first_name: &str, last_name: &str, email: &str, password: &str) {
        let mut state = self.state.lock().unwrap();
        let seq = state.next_seq();
        state.accounts.push(Account {
            user: User {
                id: format!("u-{seq}"),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
            },
            password: password.to_string(),
        });
    }

    /// Seed an order for the given account directly.
    pub fn seed_order(&self, email: &str, status: OrderStatus, total: Decimal) -> String {
        let mut state = self.state.lock().unwrap();
        let user_id = state
            .accounts
            .iter()
            .find(|a| a.user.email == email)
            .map(|a| a.user.id.clone())
            .expect("seed_order: unknown account");
        let seq = state.next_seq();
        let order = Order {
            id: format!("o-{seq}"),
            order_number: format!("ORD-{seq:04}"),
            status,
            total_amount: total,
            items: vec![OrderItem {
                product_name: "Desk Lamp".to_string(),
                quantity: 1,
            }],
            shipping_address: ShippingAddress {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                address: "12 Analytical Row".to_string(),
            },
            created_at: Utc::now(),
        };
        let id = order.id.clone();
        state.orders.push((user_id, order));
        id
    }

    /// Every request seen so far, as `"METHOD /path"` lines.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().request_log.clone()
    }

    /// Number of requests whose path starts with the given prefix.
    pub fn requests_to(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|line| {
                line.split_once(' ')
                    .is_some_and(|(_, path)| path.starts_with(prefix))
            })
            .count()
    }

    /// Force `GET /cart` to fail with a server error.
    pub fn set_fail_cart_fetch(&self, fail: bool) {
        self.state.lock().unwrap().fail_cart_fetch = fail;
    }

    /// Force `POST /orders` to fail with a server error.
    pub fn set_fail_create_order(&self, fail: bool) {
        self.state.lock().unwrap().fail_create_order = fail;
    }

    /// Override the `totalAmount` the cart endpoint reports, regardless of
    /// its lines (models server-side discounting).
    pub fn set_total_override(&self, total: Option<Decimal>) {
        self.state.lock().unwrap().total_override = total;
    }

    /// Number of entries in the server-side cart of the given account.
    pub fn server_cart_len(&self, email: &str) -> usize {
        let state = self.state.lock().unwrap();
        let Some(user_id) = state
            .accounts
            .iter()
            .find(|a| a.user.email == email)
            .map(|a| a.user.id.clone())
        else {
            return 0;
        };
        state.carts.get(&user_id).map_or(0, Vec::len)
    }

    /// The current status of a seeded or placed order.
    pub fn order_status(&self, order_id: &str) -> Option<OrderStatus> {
        self.state
            .lock()
            .unwrap()
            .orders
            .iter()
            .find(|(_, order)| order.id == order_id)
            .map(|(_, order)| order.status)
    }
}
