//! Campus Market Core - Shared types library.
//!
//! This crate provides the types used across all Campus Market components:
//! - `client` - Browser-side cart manager (store, checkout, order actions)
//! - `cli` - Terminal front-end that drives the client
//!
//! # Architecture
//!
//! The core crate contains only types and the cart state machine - no I/O, no
//! persistence, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for item/order IDs, prices, and statuses
//! - [`cart`] - Line items and the cart upsert/remove/quantity transitions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{AddOutcome, Cart, LineItem, QuantityUpdate};
pub use types::*;
