//! Pepperleaf Client - storefront synchronization core.
//!
//! This crate keeps a local projection of server-owned storefront state
//! (session, cart, orders) in sync with the remote Pepperleaf API. The
//! server is the source of truth for everything: the client never predicts
//! the result of a mutation, it re-fetches authoritative state instead
//! (reload-after-mutate).
//!
//! # Architecture
//!
//! - [`api::ApiClient`] - HTTP transport: bearer credentials, response
//!   envelope decoding, error normalization
//! - [`session::SessionStore`] - the single authenticated-identity slot,
//!   persisted across restarts
//! - [`cart::CartSynchronizer`] - cached cart projection, reloaded after
//!   every mutation
//! - [`checkout::CheckoutFlow`] - shipping form + cart contents into a
//!   placed order
//! - [`orders::OrderHistory`] - past orders with cancellation
//! - [`catalog::ProductCatalog`] - read-only catalog with a short TTL cache
//! - [`app::App`] - top-level assembly that constructs and wires the
//!   services
//!
//! Services are explicitly constructed and injected - there is no ambient
//! global state. All of them are cheap to clone (`Arc` internals) and safe
//! to share across tasks.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pepperleaf_client::{App, ClientConfig, notify::TracingNotifier};
//!
//! let config = ClientConfig::from_env()?;
//! let app = App::new(&config, Arc::new(TracingNotifier))?;
//!
//! // Restore a persisted session, then sync the cart
//! if app.start().await {
//!     app.cart().add_item(&product).await?;
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod notify;
pub mod orders;
pub mod session;

pub use app::App;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
