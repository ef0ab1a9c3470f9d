//! Core types for Pepperleaf.
//!
//! This module provides the domain vocabulary shared by the client library
//! and the CLI shell.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartLine};
pub use order::{Order, OrderItem, OrderStatus, OrderStatusError, ShippingAddress};
pub use product::Product;
pub use user::User;
