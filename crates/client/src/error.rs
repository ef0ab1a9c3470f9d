//! Unified error type for embedders.
//!
//! Component operations return their own error enums; this aggregate exists
//! for callers (like the CLI) that funnel everything through one `Result`.
//! No failure in this crate is fatal - every operation resolves to a
//! defined fallback state and can be retried by re-invoking it.

use thiserror::Error;

use crate::api::ApiError;
use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::orders::OrderHistoryError;
use crate::session::{SessionError, StorageError};

/// Aggregate error for the client library.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// API transport or protocol failure.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Session operation failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Credential storage failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Order submission failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Order history operation failed.
    #[error("Order history error: {0}")]
    Orders(#[from] OrderHistoryError),
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;
