//! Client-resident shopping cart.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s keyed by [`ItemId`]. The
//! transitions here are pure; persistence lives in the client crate.
//!
//! # Invariants
//!
//! - At most one line per `id`. Adding an existing `id` increments its
//!   quantity instead of appending a duplicate.
//! - Every stored line has `qty >= 1`. Reducing a line below one removes it.
//!
//! # Persisted shape
//!
//! The cart serializes as a bare JSON array:
//!
//! ```json
//! [{"id": "42", "name": "Pen", "price": 10.0, "qty": 3}]
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, Price};

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog item identifier.
    pub id: ItemId,
    /// Display label captured when the item was added.
    pub name: String,
    /// Unit price captured when the item was added.
    pub price: Price,
    /// Quantity, always at least one.
    pub qty: u32,
}

impl LineItem {
    /// Price of the whole line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.qty)
    }
}

/// Result of [`Cart::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended.
    Inserted,
    /// An existing line's quantity was increased; carries the new total.
    Incremented { qty: u32 },
}

/// Result of [`Cart::set_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line now holds this quantity.
    Set(u32),
    /// The requested quantity was below one, so the line was dropped.
    Removed,
    /// No line with that id.
    NotFound,
}

/// The user's full set of line items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from lines, merging duplicate ids and dropping zero
    /// quantities so the result upholds the cart invariants.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            if line.qty == 0 {
                continue;
            }
            cart.add(line.id, line.name, line.price, line.qty);
        }
        cart
    }

    /// Parse a persisted cart record.
    ///
    /// Anything that is not a well-formed array of line items yields an empty
    /// cart. Well-formed records are normalised through [`Cart::from_lines`].
    #[must_use]
    pub fn from_json_lenient(raw: &str) -> Self {
        serde_json::from_str::<Vec<LineItem>>(raw).map_or_else(|_| Self::new(), Self::from_lines)
    }

    /// Serialize to the persisted JSON record.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.lines)
    }

    /// Upsert a line.
    ///
    /// An existing line keeps its captured name and price and has `qty`
    /// added to it. A `qty` of zero is treated as one.
    pub fn add(
        &mut self,
        id: impl Into<ItemId>,
        name: impl Into<String>,
        price: Price,
        qty: u32,
    ) -> AddOutcome {
        let id = id.into();
        let qty = qty.max(1);

        if let Some(line) = self.lines.iter_mut().find(|l| l.id == id) {
            line.qty = line.qty.saturating_add(qty);
            return AddOutcome::Incremented { qty: line.qty };
        }

        self.lines.push(LineItem {
            id,
            name: name.into(),
            price,
            qty,
        });
        AddOutcome::Inserted
    }

    /// Remove the line with `id`. Returns whether a line was removed.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| &l.id != id);
        self.lines.len() != before
    }

    /// Set the quantity of an existing line, removing it when `qty < 1`.
    pub fn set_quantity(&mut self, id: &ItemId, qty: u32) -> QuantityUpdate {
        let Some(line) = self.lines.iter_mut().find(|l| &l.id == id) else {
            return QuantityUpdate::NotFound;
        };

        if qty == 0 {
            self.remove(id);
            return QuantityUpdate::Removed;
        }

        line.qty = qty;
        QuantityUpdate::Set(qty)
    }

    /// Look up a line by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&LineItem> {
        self.lines.iter().find(|l| &l.id == id)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct items (not the sum of quantities).
    #[must_use]
    pub fn distinct_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.qty)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(LineItem::line_total).sum()
    }

    /// Text for the header cart badge: the distinct item count, or empty
    /// when the cart is empty.
    #[must_use]
    pub fn badge_text(&self) -> String {
        match self.distinct_count() {
            0 => String::new(),
            n => n.to_string(),
        }
    }
}
