//! Order history view-model.
//!
//! Fetches and annotates the authenticated user's past orders. Cancellation
//! re-fetches the whole list rather than patching one order's status
//! locally - the same drift-avoidance stance the cart takes.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, TimeDelta, Utc};
use pepperleaf_core::Order;
use rand::Rng;
use thiserror::Error;
use tracing::instrument;

use crate::api::{ApiClient, ApiError};
use crate::notify::SharedNotifier;

/// Errors surfaced by order-history operations.
#[derive(Debug, Error)]
pub enum OrderHistoryError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Default)]
struct OrdersState {
    orders: Vec<Order>,
    loading: bool,
    error: Option<String>,
}

/// View-model over the authenticated user's order history.
///
/// Cheap to clone; all clones share one list.
#[derive(Clone)]
pub struct OrderHistory {
    inner: Arc<OrdersInner>,
}

struct OrdersInner {
    api: ApiClient,
    notifier: SharedNotifier,
    state: RwLock<OrdersState>,
}

impl OrderHistory {
    #[must_use]
    pub fn new(api: ApiClient, notifier: SharedNotifier) -> Self {
        Self {
            inner: Arc::new(OrdersInner {
                api,
                notifier,
                state: RwLock::new(OrdersState::default()),
            }),
        }
    }

    /// Fetch the order list, replacing the held one on success.
    ///
    /// On failure the previous list is left unchanged and the error is held
    /// for display; [`retry`](Self::retry) re-runs the same fetch.
    ///
    /// # Errors
    ///
    /// Returns the underlying API error.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<(), OrderHistoryError> {
        self.begin_fetch();
        match self.inner.api.list_orders().await {
            Ok(orders) => {
                if let Ok(mut state) = self.inner.state.write() {
                    state.orders = orders;
                    state.loading = false;
                }
                Ok(())
            }
            Err(e) => {
                let message = e.user_message().unwrap_or("Failed to load orders").to_string();
                tracing::warn!(error = %e, "failed to fetch orders");
                if let Ok(mut state) = self.inner.state.write() {
                    state.error = Some(message);
                    state.loading = false;
                }
                self.inner
                    .notifier
                    .error("Failed to load orders. Please try again.");
                Err(e.into())
            }
        }
    }

    /// Re-run the last fetch.
    ///
    /// # Errors
    ///
    /// Returns the underlying API error.
    pub async fn retry(&self) -> Result<(), OrderHistoryError> {
        self.fetch().await
    }

    /// Request cancellation of an order.
    ///
    /// On success the full list is re-fetched and a refund-timeline notice
    /// is surfaced; on failure the list is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns the underlying API error.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn cancel(&self, order_id: &str) -> Result<(), OrderHistoryError> {
        match self.inner.api.cancel_order(order_id).await {
            Ok(()) => {
                self.inner.notifier.success(
                    "Order cancelled successfully! Refund will be processed within 3-5 business days.",
                );
                // Refresh to show the server's view of the updated status
                let _ = self.fetch().await;
                Ok(())
            }
            Err(e) => {
                let message = e
                    .user_message()
                    .unwrap_or("Failed to cancel order. Please try again.")
                    .to_string();
                tracing::warn!(error = %e, "failed to cancel order");
                self.inner.notifier.error(&message);
                Err(e.into())
            }
        }
    }

    /// Snapshot of the held order list.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.inner
            .state
            .read()
            .map_or_else(|_| Vec::new(), |state| state.orders.clone())
    }

    /// The held fetch error, if the last fetch failed.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner
            .state
            .read()
            .ok()
            .and_then(|state| state.error.clone())
    }

    /// Whether a fetch is in flight (the busy flag).
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.read().is_ok_and(|state| state.loading)
    }

    /// A display-only delivery estimate: the order date plus a
    /// pseudo-random 2-7 day offset.
    ///
    /// Cosmetic, not authoritative. The value is not sourced from the
    /// server, is not persisted or seeded, and will differ across repeated
    /// views of the same order.
    #[must_use]
    pub fn estimated_delivery(order: &Order) -> DateTime<Utc> {
        let days = rand::rng().random_range(2..=7);
        order.created_at + TimeDelta::days(days)
    }

    fn begin_fetch(&self) {
        if let Ok(mut state) = self.inner.state.write() {
            state.loading = true;
            state.error = None;
        }
    }
}
