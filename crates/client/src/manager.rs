//! Cart operations over an injected store.

use campus_market_core::{AddOutcome, Cart, ItemId, Price, QuantityUpdate};
use tracing::{info, instrument};

use crate::config::UiTiming;
use crate::effect::Effect;
use crate::error::{CartError, Result};
use crate::store::CartStore;
use crate::toast::Toast;

/// Owns the stored cart and turns user actions into cart mutations.
#[derive(Debug)]
pub struct CartManager<S> {
    store: S,
    timing: UiTiming,
}

impl<S: CartStore> CartManager<S> {
    /// Create a manager over a store.
    #[must_use]
    pub const fn new(store: S, timing: UiTiming) -> Self {
        Self { store, timing }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Timers used for reload effects.
    #[must_use]
    pub const fn timing(&self) -> &UiTiming {
        &self.timing
    }

    /// Current cart contents.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.store.load()
    }

    /// Add `qty` of an item, merging with an existing line.
    ///
    /// The confirmation toast names the quantity just added, not the new
    /// line total.
    ///
    /// # Errors
    ///
    /// Returns an error if the id or name is blank, or the cart cannot be saved.
    #[instrument(skip(self, name, price), fields(item_id = %id))]
    pub fn add_item(&self, id: &ItemId, name: &str, price: Price, qty: u32) -> Result<Vec<Effect>> {
        if id.is_blank() {
            return Err(CartError::Invalid("item id is empty".to_string()));
        }
        if name.trim().is_empty() {
            return Err(CartError::Invalid("item name is empty".to_string()));
        }

        let qty = qty.max(1);
        let mut cart = self.store.load();
        let outcome = cart.add(id.clone(), name, price, qty);
        self.store.save(&cart)?;

        match outcome {
            AddOutcome::Inserted => info!(qty, "Added new cart line"),
            AddOutcome::Incremented { qty: total } => info!(qty, total, "Incremented cart line"),
        }

        Ok(vec![
            Effect::Badge(cart.badge_text()),
            Effect::toast(Toast::success(format!("Added {qty} x {name} to cart"))),
        ])
    }

    /// Remove an item. Missing ids are not an error.
    ///
    /// The page is reloaded afterwards so the cart view is re-rendered from
    /// the stored state.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    #[instrument(skip(self), fields(item_id = %id))]
    pub fn remove_item(&self, id: &ItemId) -> Result<Vec<Effect>> {
        let mut cart = self.store.load();
        let removed = cart.remove(id);
        self.store.save(&cart)?;
        info!(removed, "Removed cart line");

        Ok(vec![
            Effect::toast(Toast::info("Item removed from cart")),
            Effect::Reload {
                after: self.timing.reload_delay,
            },
        ])
    }

    /// Set the quantity of a line already in the cart, persisting
    /// immediately. A quantity of zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    #[instrument(skip(self), fields(item_id = %id))]
    pub fn update_quantity(&self, id: &ItemId, qty: u32) -> Result<Vec<Effect>> {
        let mut cart = self.store.load();
        let toast = match cart.set_quantity(id, qty) {
            QuantityUpdate::Set(qty) => Toast::success(format!("Quantity updated to {qty}")),
            QuantityUpdate::Removed => Toast::info("Item removed from cart"),
            QuantityUpdate::NotFound => {
                return Ok(vec![Effect::toast(Toast::warning("Item is no longer in your cart"))]);
            }
        };
        self.store.save(&cart)?;

        Ok(vec![Effect::Badge(cart.badge_text()), Effect::toast(toast)])
    }

    /// Badge text for the current cart.
    #[must_use]
    pub fn update_badge(&self) -> Effect {
        Effect::Badge(self.store.load().badge_text())
    }

    /// Drop the whole cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be removed.
    pub fn clear(&self) -> Result<()> {
        self.store.clear()?;
        Ok(())
    }
}
