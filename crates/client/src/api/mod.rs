//! Marketplace JSON endpoints.
//!
//! This module provides:
//! - [`OrderApi`], the request/response boundary used by checkout and order
//!   actions (substitutable with a fake in tests)
//! - [`MarketClient`], the `reqwest` implementation
//! - Request and response types for the place-order and order-action endpoints
//!
//! # Endpoints
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | `POST` | `/api/place_order` | `{ cart, payment_mode? }` |
//! | `POST` | `/orders/cancel/{order_id}` | none |
//! | `POST` | `/orders/mark_received/{order_id}` | none |
//!
//! All three answer `{ ok, error?, message? }`.

mod client;
mod error;
mod types;

use std::future::Future;

use campus_market_core::OrderId;

pub use client::MarketClient;
pub use error::ApiError;
pub use types::{ApiReply, ApiResponse, PlaceOrderRequest};

use crate::actions::OrderAction;

/// Request/response boundary to the order endpoints.
pub trait OrderApi {
    /// Submit the cart as an order.
    fn place_order(
        &self,
        request: &PlaceOrderRequest,
    ) -> impl Future<Output = Result<ApiReply, ApiError>> + Send;

    /// Run a state-changing action on an existing order.
    fn order_action(
        &self,
        action: OrderAction,
        order_id: &OrderId,
    ) -> impl Future<Output = Result<ApiReply, ApiError>> + Send;
}
