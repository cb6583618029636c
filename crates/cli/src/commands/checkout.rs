//! Checkout command.
//!
//! # Usage
//!
//! ```bash
//! market checkout
//! ```

use campus_market_client::Command;

use super::AppDispatcher;
use crate::render::Renderer;

/// Place an order with the current cart.
pub async fn run(dispatcher: &mut AppDispatcher, renderer: &mut Renderer) {
    let effects = dispatcher.dispatch(Command::Checkout).await;
    renderer.apply(effects).await;
}
