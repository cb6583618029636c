//! Order action commands.
//!
//! # Usage
//!
//! ```bash
//! # Cancel an order (asks for confirmation)
//! market cancel ORD-1A2B
//!
//! # Confirm receipt without prompting
//! market received ORD-1A2B --yes
//! ```

use campus_market_client::Command;
use campus_market_core::OrderId;

use super::AppDispatcher;
use crate::render::Renderer;

/// Cancel an order.
pub async fn cancel(dispatcher: &mut AppDispatcher, renderer: &mut Renderer, order_id: &str) {
    let effects = dispatcher
        .dispatch(Command::CancelOrder(OrderId::new(order_id)))
        .await;
    renderer.apply(effects).await;
}

/// Mark an order as received.
pub async fn received(dispatcher: &mut AppDispatcher, renderer: &mut Renderer, order_id: &str) {
    let effects = dispatcher
        .dispatch(Command::MarkReceived(OrderId::new(order_id)))
        .await;
    renderer.apply(effects).await;
}
