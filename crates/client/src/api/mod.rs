//! HTTP gateway to the remote Pepperleaf API.
//!
//! A thin, typed wrapper over `reqwest`: attaches the bearer credential to
//! every authenticated request, decodes the `{ success, data?, message? }`
//! response envelope, and normalizes failures into [`ApiError`] so callers
//! never have to inspect raw responses.
//!
//! # Example
//!
//! ```rust,ignore
//! use pepperleaf_client::api::ApiClient;
//!
//! let api = ApiClient::new(&config)?;
//! api.set_bearer(Some(token));
//! let cart = api.fetch_cart().await?;
//! ```

mod conversions;
pub mod types;

use std::sync::{Arc, RwLock};

use pepperleaf_core::{Cart, Order, Product, User};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use crate::config::ClientConfig;

use conversions::convert_cart;
use types::{
    AddItemRequest, AuthPayload, Envelope, LoginRequest, OrderListData, OrderRequest,
    ProductListData, ProfileData, RawCart, SignupRequest, UpdateQuantityRequest,
};

/// Errors that can occur when talking to the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection, timeout, TLS).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status; carries the server's message when one could
    /// be extracted from the body.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The server answered 2xx but the envelope said `success: false`.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Response body did not parse as the expected envelope.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Successful envelope with no `data` payload where one was required.
    #[error("response envelope has no data")]
    MissingData,
}

impl ApiError {
    /// The server-provided human-readable message, when there is one.
    ///
    /// Transport and decode failures carry no message a user should see;
    /// callers fall back to an operation-specific generic string.
    #[must_use]
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } | Self::Rejected(message) => Some(message),
            Self::Http(_) | Self::Decode(_) | Self::MissingData => None,
        }
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Pepperleaf storefront API.
///
/// Cheap to clone; the bearer credential slot is shared between clones, so
/// the session store can swap credentials for every component at once.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    bearer: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a new API client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
                bearer: RwLock::new(None),
            }),
        })
    }

    /// Replace the bearer credential attached to subsequent requests.
    ///
    /// `None` clears the slot; unauthenticated requests are sent without an
    /// `Authorization` header.
    pub fn set_bearer(&self, token: Option<SecretString>) {
        if let Ok(mut bearer) = self.inner.bearer.write() {
            *bearer = token;
        }
    }

    /// Whether a bearer credential is currently held.
    #[must_use]
    pub fn has_bearer(&self) -> bool {
        self.inner
            .bearer
            .read()
            .is_ok_and(|bearer| bearer.is_some())
    }

    /// Execute a request and decode the response envelope, returning its
    /// `data` payload.
    async fn execute<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let envelope = self.execute_raw::<B, T>(method, path, body).await?;
        envelope.data.ok_or(ApiError::MissingData)
    }

    /// Execute a request where the caller only cares about success.
    ///
    /// Mutation acknowledgements carry payloads the client deliberately
    /// ignores - authoritative state is re-fetched instead.
    async fn execute_ack<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.execute_raw::<B, serde_json::Value>(method, path, body)
            .await?;
        Ok(())
    }

    async fn execute_raw<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Envelope<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.inner.base_url);

        let mut request = self.inner.http.request(method, &url);
        if let Some(token) = self.bearer_token() {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        // Read the body as text first for better error diagnostics
        let body_text = response.text().await?;

        if !status.is_success() {
            // Error responses usually still carry an envelope with a message
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body_text)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| format!("request failed with status {status}"));
            tracing::debug!(%status, %message, path, "API returned non-success status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body_text.chars().take(500).collect::<String>(),
                "failed to parse API response"
            );
            e
        })?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "request rejected".to_string());
            return Err(ApiError::Rejected(message));
        }

        Ok(envelope)
    }

    fn bearer_token(&self) -> Option<SecretString> {
        self.inner
            .bearer
            .read()
            .ok()
            .and_then(|bearer| bearer.clone())
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Create a new account and return the authenticated identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the account cannot be created (duplicate email,
    /// weak password) or the request fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthPayload, ApiError> {
        self.execute(Method::POST, "/auth/signup", Some(request))
            .await
    }

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error on bad credentials or request failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        self.execute(Method::POST, "/auth/login", Some(&LoginRequest { email, password }))
            .await
    }

    /// Fetch the profile of the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the bearer credential is missing or stale.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<User, ApiError> {
        let data: ProfileData = self.execute(Method::GET, "/auth/profile", None::<&()>).await?;
        Ok(data.user)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List the product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        let data: ProductListData = self.execute(Method::GET, "/products", None::<&()>).await?;
        Ok(data.products)
    }

    // =========================================================================
    // Cart Methods (never cached - mutable state)
    // =========================================================================

    /// Fetch the authenticated user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the caller is not
    /// authenticated.
    #[instrument(skip(self))]
    pub async fn fetch_cart(&self) -> Result<Cart, ApiError> {
        let raw: RawCart = self.execute(Method::GET, "/cart", None::<&()>).await?;
        Ok(convert_cart(raw))
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_cart_item(&self, product_id: &str, quantity: u32) -> Result<(), ApiError> {
        self.execute_ack(
            Method::POST,
            "/cart/add",
            Some(&AddItemRequest {
                product_id,
                quantity,
            }),
        )
        .await
    }

    /// Set the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_cart_item(&self, product_id: &str, quantity: u32) -> Result<(), ApiError> {
        self.execute_ack(
            Method::PUT,
            &format!("/cart/item/{product_id}"),
            Some(&UpdateQuantityRequest { quantity }),
        )
        .await
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_cart_item(&self, product_id: &str) -> Result<(), ApiError> {
        self.execute_ack::<()>(Method::DELETE, &format!("/cart/item/{product_id}"), None)
            .await
    }

    /// Empty the cart server-side.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        self.execute_ack::<()>(Method::DELETE, "/cart/clear", None)
            .await
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Place an order from the given shipping details and cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is rejected or the request fails.
    #[instrument(skip(self, request))]
    pub async fn create_order(&self, request: &OrderRequest) -> Result<(), ApiError> {
        self.execute_ack(Method::POST, "/orders", Some(request)).await
    }

    /// List the authenticated user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        let data: OrderListData = self.execute(Method::GET, "/orders", None::<&()>).await?;
        Ok(data.orders)
    }

    /// Request cancellation of an order.
    ///
    /// The server enforces eligibility; the client only offers the action
    /// for statuses that are still cancellable.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is no longer cancellable or the request
    /// fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn cancel_order(&self, order_id: &str) -> Result<(), ApiError> {
        self.execute_ack::<()>(Method::PATCH, &format!("/orders/{order_id}/cancel"), None)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Status {
            status: 401,
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(err.user_message(), Some("Invalid credentials"));

        let err = ApiError::Rejected("Cart is empty".to_string());
        assert_eq!(err.user_message(), Some("Cart is empty"));

        assert_eq!(ApiError::MissingData.user_message(), None);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ClientConfig {
            api_base_url: "http://localhost:5000/api/".parse().unwrap(),
            request_timeout: std::time::Duration::from_secs(1),
            data_dir: std::path::PathBuf::from(".pepperleaf"),
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.inner.base_url, "http://localhost:5000/api");
    }

    #[test]
    fn test_bearer_slot_is_shared_between_clones() {
        let config = ClientConfig {
            api_base_url: "http://localhost:5000/api".parse().unwrap(),
            request_timeout: std::time::Duration::from_secs(1),
            data_dir: std::path::PathBuf::from(".pepperleaf"),
        };
        let client = ApiClient::new(&config).unwrap();
        let clone = client.clone();

        assert!(!clone.has_bearer());
        client.set_bearer(Some(SecretString::from("tok-1")));
        assert!(clone.has_bearer());
        client.set_bearer(None);
        assert!(!clone.has_bearer());
    }
}
