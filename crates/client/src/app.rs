//! Top-level application assembly.
//!
//! Services are explicitly constructed here and injected into each other;
//! there is no ambient global state. The assembly also owns the lifecycle
//! coupling between session and cart: the cart loads only while
//! authenticated and resets locally when the session ends.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::api::types::SignupRequest;
use crate::cart::CartSynchronizer;
use crate::catalog::ProductCatalog;
use crate::checkout::CheckoutFlow;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::notify::Notify;
use crate::orders::OrderHistory;
use crate::session::{CredentialStore, SessionError, SessionStore};

/// The assembled storefront client.
pub struct App {
    api: ApiClient,
    session: SessionStore,
    cart: CartSynchronizer,
    checkout: CheckoutFlow,
    orders: OrderHistory,
    catalog: ProductCatalog,
}

impl App {
    /// Construct and wire every service.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, notifier: Arc<dyn Notify>) -> Result<Self, ClientError> {
        let api = ApiClient::new(config)?;
        let credentials = CredentialStore::new(config.data_dir.clone());
        let session = SessionStore::new(api.clone(), credentials, notifier.clone());
        let cart = CartSynchronizer::new(api.clone(), session.clone(), notifier.clone());
        let checkout = CheckoutFlow::new(api.clone(), cart.clone(), notifier.clone());
        let orders = OrderHistory::new(api.clone(), notifier.clone());
        let catalog = ProductCatalog::new(api.clone());

        Ok(Self {
            api,
            session,
            cart,
            checkout,
            orders,
            catalog,
        })
    }

    /// Restore a persisted session and, if one was restored, load the cart.
    ///
    /// Returns whether a session was restored. The restore itself never
    /// contacts the server; only the follow-up cart load does.
    pub async fn start(&self) -> bool {
        let restored = self.session.restore();
        if restored {
            // Cart load failures already fall back to the empty projection
            let _ = self.cart.load().await;
        }
        restored
    }

    /// Log in and bring the cart projection up for the new session.
    ///
    /// # Errors
    ///
    /// Returns the session error; the cart is only loaded on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), SessionError> {
        self.session.login(email, password).await?;
        let _ = self.cart.load().await;
        Ok(())
    }

    /// Sign up and bring the cart projection up for the new session.
    ///
    /// # Errors
    ///
    /// Returns the session error; the cart is only loaded on success.
    pub async fn signup(&self, profile: SignupRequest) -> Result<(), SessionError> {
        self.session.signup(profile).await?;
        let _ = self.cart.load().await;
        Ok(())
    }

    /// End the session and reset the local cart projection.
    ///
    /// The bearer slot is cleared synchronously; an in-flight cart
    /// operation is never aborted, but its trailing reload will fail
    /// unauthenticated and resolve to the empty-cart fallback, so the
    /// post-logout projection is empty either way.
    pub fn logout(&self) {
        self.session.logout();
        self.cart.reset();
    }

    /// The API gateway client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The cart synchronizer.
    #[must_use]
    pub fn cart(&self) -> &CartSynchronizer {
        &self.cart
    }

    /// The order submission flow.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutFlow {
        &self.checkout
    }

    /// The order history view-model.
    #[must_use]
    pub fn orders(&self) -> &OrderHistory {
        &self.orders
    }

    /// The product catalog.
    #[must_use]
    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }
}
