//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Add two pens (stock of 5) to the cart
//! market add --id 42 --name Pen --price 10 --qty 2 --max 5
//!
//! # Change or remove a line
//! market set 42 4
//! market remove 42
//!
//! # Inspect
//! market show
//! market badge
//! ```

use campus_market_client::{Command, Effect};
use campus_market_core::{ItemId, Price};

use super::{AppDispatcher, CliError};
use crate::render::Renderer;

/// Add an item, stepping the quantity selector up to `qty` first.
///
/// Steps past `max` are rejected by the stepper exactly as on the product
/// page, so the added quantity never exceeds the stock.
///
/// # Errors
///
/// Returns error if the price is not a non-negative number.
pub async fn add(
    dispatcher: &mut AppDispatcher,
    renderer: &mut Renderer,
    id: &str,
    name: &str,
    price: &str,
    qty: u32,
    max: u32,
) -> Result<(), CliError> {
    let price = Price::parse(price)?;
    let id = ItemId::new(id);

    let opened = dispatcher
        .dispatch(Command::OpenProduct {
            id: id.clone(),
            max_stock: max,
        })
        .await;
    renderer.apply(opened).await;
    for _ in 1..qty.max(1) {
        let effects = dispatcher.dispatch(Command::StepUp).await;
        let rejected = effects.iter().any(|e| matches!(e, Effect::Toast(_)));
        renderer.apply(effects).await;
        if rejected {
            break;
        }
    }

    let effects = dispatcher
        .dispatch(Command::AddToCart {
            id,
            name: name.to_string(),
            price,
        })
        .await;
    renderer.apply(effects).await;
    Ok(())
}

/// Remove a line.
pub async fn remove(dispatcher: &mut AppDispatcher, renderer: &mut Renderer, id: &str) {
    let effects = dispatcher
        .dispatch(Command::RemoveFromCart { id: ItemId::new(id) })
        .await;
    renderer.apply(effects).await;
}

/// Set the quantity of a line; zero removes it.
pub async fn set(dispatcher: &mut AppDispatcher, renderer: &mut Renderer, id: &str, qty: u32) {
    let effects = dispatcher
        .dispatch(Command::SetQuantity {
            id: ItemId::new(id),
            qty,
        })
        .await;
    renderer.apply(effects).await;
}

/// Print the cart contents.
pub fn show(dispatcher: &AppDispatcher, renderer: &Renderer) {
    renderer.print_cart(&dispatcher.manager().cart());
}

/// Print the header badge.
pub async fn badge(dispatcher: &mut AppDispatcher, renderer: &mut Renderer) {
    let effects = dispatcher.dispatch(Command::RefreshBadge).await;
    renderer.apply(effects).await;
}

/// Empty the cart.
///
/// # Errors
///
/// Returns error if the cart record cannot be removed.
pub fn clear(dispatcher: &AppDispatcher) -> Result<(), CliError> {
    dispatcher.manager().clear()?;
    tracing::info!("Cart cleared");
    Ok(())
}
