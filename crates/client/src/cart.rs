//! Cart synchronizer: a client-side cache of the server-owned cart.
//!
//! The projection is only ever trusted immediately after a fetch. Every
//! mutating operation (add/update/remove/clear) performs a full reload
//! instead of patching the cache locally, so server-side pricing and
//! availability recalculation can never drift out of the totals the UI
//! shows. One extra round trip per mutation buys a projection that is
//! never locally inconsistent.
//!
//! Overlapping mutations are not queued or debounced: each issues its own
//! mutate-then-reload sequence, and the projection reflects whichever
//! reload lands last. Callers needing strict ordering serialize their
//! calls.

use std::sync::{Arc, RwLock};

use pepperleaf_core::{Cart, Product};
use thiserror::Error;
use tracing::instrument;

use crate::api::{ApiClient, ApiError};
use crate::notify::SharedNotifier;
use crate::session::SessionStore;

/// Whether a successful clear surfaces its own notice.
///
/// `Silent` is used when clearing as a side effect of a placed order, where
/// the order confirmation should be the only notice shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearMode {
    Announce,
    Silent,
}

/// Errors surfaced by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The operation requires an authenticated session.
    #[error("not signed in")]
    NotAuthenticated,

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Default)]
struct CartState {
    cart: Cart,
    loading: bool,
}

/// Maintains the cached projection of the authenticated user's cart.
///
/// Cheap to clone; all clones share one projection.
#[derive(Clone)]
pub struct CartSynchronizer {
    inner: Arc<CartInner>,
}

struct CartInner {
    api: ApiClient,
    session: SessionStore,
    notifier: SharedNotifier,
    state: RwLock<CartState>,
}

impl CartSynchronizer {
    /// Create a synchronizer holding the empty projection.
    #[must_use]
    pub fn new(api: ApiClient, session: SessionStore, notifier: SharedNotifier) -> Self {
        Self {
            inner: Arc::new(CartInner {
                api,
                session,
                notifier,
                state: RwLock::new(CartState::default()),
            }),
        }
    }

    /// Fetch the current cart and replace the projection wholesale.
    ///
    /// Fail-safe, not fail-loud: any failure resets the projection to the
    /// empty cart, so the UI never renders a stale or partial cart. No
    /// notice is surfaced.
    ///
    /// # Errors
    ///
    /// Returns the underlying API error; the fallback state has already
    /// been applied when it does.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), CartError> {
        self.set_loading(true);
        let result = self.inner.api.fetch_cart().await;
        match result {
            Ok(cart) => {
                self.replace(cart);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load cart, resetting projection");
                self.replace(Cart::empty());
                Err(e.into())
            }
        }
    }

    /// Add one unit of the given product to the cart, then reload.
    ///
    /// Requires an authenticated session: otherwise an error notice is
    /// surfaced and no request is made.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` or the underlying API error. On API
    /// failure the prior projection is left untouched.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_item(&self, product: &Product) -> Result<(), CartError> {
        if !self.inner.session.is_authenticated() {
            self.inner
                .notifier
                .error("Please sign in to add items to cart");
            return Err(CartError::NotAuthenticated);
        }

        self.set_loading(true);
        match self.inner.api.add_cart_item(&product.id, 1).await {
            Ok(()) => {
                // Reload for authoritative totals; its own failure path
                // already falls back to the empty cart.
                let _ = self.load().await;
                self.inner
                    .notifier
                    .success(&format!("{} added to cart!", product.name));
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to add item to cart");
                self.inner.notifier.error("Failed to add item to cart");
                self.set_loading(false);
                Err(e.into())
            }
        }
    }

    /// Set the quantity of a cart line, then reload.
    ///
    /// A quantity of zero is defined as removal and delegates to
    /// [`remove_item`](Self::remove_item).
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` (without a notice) or the underlying API
    /// error.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn set_quantity(&self, product_id: &str, quantity: u32) -> Result<(), CartError> {
        if quantity < 1 {
            return self.remove_item(product_id).await;
        }
        if !self.inner.session.is_authenticated() {
            return Err(CartError::NotAuthenticated);
        }

        self.set_loading(true);
        match self.inner.api.update_cart_item(product_id, quantity).await {
            Ok(()) => {
                let _ = self.load().await;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to update cart");
                self.inner.notifier.error("Failed to update cart");
                self.set_loading(false);
                Err(e.into())
            }
        }
    }

    /// Remove a cart line, then reload.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` (without a notice) or the underlying API
    /// error.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_item(&self, product_id: &str) -> Result<(), CartError> {
        if !self.inner.session.is_authenticated() {
            return Err(CartError::NotAuthenticated);
        }

        // Resolve the display name before the line disappears
        let removed_name = self
            .snapshot()
            .line(product_id)
            .map(|line| line.name.clone());

        self.set_loading(true);
        match self.inner.api.remove_cart_item(product_id).await {
            Ok(()) => {
                let _ = self.load().await;
                if let Some(name) = removed_name {
                    self.inner
                        .notifier
                        .success(&format!("{name} removed from cart!"));
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to remove item from cart");
                self.inner.notifier.error("Failed to remove item from cart");
                self.set_loading(false);
                Err(e.into())
            }
        }
    }

    /// Empty the cart server-side and replace the projection with the
    /// empty cart.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` (without a notice) or the underlying API
    /// error; on failure the prior projection is left untouched.
    #[instrument(skip(self))]
    pub async fn clear(&self, mode: ClearMode) -> Result<(), CartError> {
        if !self.inner.session.is_authenticated() {
            return Err(CartError::NotAuthenticated);
        }

        self.set_loading(true);
        match self.inner.api.clear_cart().await {
            Ok(()) => {
                self.replace(Cart::empty());
                if mode == ClearMode::Announce {
                    self.inner.notifier.success("Cart cleared!");
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to clear cart");
                if mode == ClearMode::Announce {
                    self.inner.notifier.error("Failed to clear cart");
                }
                self.set_loading(false);
                Err(e.into())
            }
        }
    }

    /// Reset the local projection without contacting the server.
    ///
    /// Used by the application assembly when the session ends: the
    /// server-side cart belongs to the account, the local projection to the
    /// session.
    pub fn reset(&self) {
        self.replace(Cart::empty());
    }

    /// Snapshot of the current projection.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.inner
            .state
            .read()
            .map_or_else(|_| Cart::empty(), |state| state.cart.clone())
    }

    /// Quantity of the given product in the projection, 0 when absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.inner
            .state
            .read()
            .map_or(0, |state| state.cart.quantity_of(product_id))
    }

    /// Whether the projection holds a line for the given product.
    #[must_use]
    pub fn contains(&self, product_id: &str) -> bool {
        self.inner
            .state
            .read()
            .is_ok_and(|state| state.cart.contains(product_id))
    }

    /// Whether an operation is in flight (the busy flag).
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.read().is_ok_and(|state| state.loading)
    }

    fn replace(&self, cart: Cart) {
        if let Ok(mut state) = self.inner.state.write() {
            state.cart = cart;
            state.loading = false;
        }
    }

    fn set_loading(&self, loading: bool) {
        if let Ok(mut state) = self.inner.state.write() {
            state.loading = loading;
        }
    }
}
