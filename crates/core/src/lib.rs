//! Pepperleaf Core - Shared domain types.
//!
//! This crate provides the common types used across all Pepperleaf components:
//! - `client` - The storefront synchronization library
//! - `cli` - Command-line shell driving the client services
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. Wire-format quirks of the remote API (envelope shapes, raw
//! cart entries) live in the client crate; the types here are the clean
//! domain view the rest of the codebase works with.
//!
//! # Modules
//!
//! - [`types`] - Users, products, carts, and orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
