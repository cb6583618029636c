//! Pre-add quantity selector.
//!
//! A purely presentational counter bound to the product's stock. It never
//! reads or writes the cart store; its value is only the quantity used by
//! the next add-to-cart.
//!
//! Bounds are asymmetric: stepping past the maximum warns, stepping below
//! one is silent.

use crate::toast::Toast;

/// Result of a stepper click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The displayed value changed to this.
    Changed(u32),
    /// Already at the floor of one; nothing happens.
    Unchanged,
    /// Already at the stock maximum.
    Rejected { max: u32 },
}

impl StepOutcome {
    /// Warning toast for a rejected increment.
    #[must_use]
    pub fn toast(&self) -> Option<Toast> {
        match self {
            Self::Rejected { max } => Some(Toast::warning(format!(
                "Only {max} available in stock."
            ))),
            Self::Changed(_) | Self::Unchanged => None,
        }
    }
}

/// Quantity counter for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityStepper {
    value: u32,
    max: u32,
}

impl QuantityStepper {
    /// Create a stepper showing 1 with the given stock maximum (at least 1).
    #[must_use]
    pub fn new(max: u32) -> Self {
        Self {
            value: 1,
            max: max.max(1),
        }
    }

    /// Create a stepper from the product's stock data attribute. Unparsable
    /// values fall back to a maximum of one.
    #[must_use]
    pub fn from_data_attributes(max_stock: &str) -> Self {
        Self::new(max_stock.trim().parse().unwrap_or(1))
    }

    /// The displayed value.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// The stock maximum.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Increase by one while below the maximum.
    pub fn increment(&mut self) -> StepOutcome {
        if self.value < self.max {
            self.value += 1;
            StepOutcome::Changed(self.value)
        } else {
            StepOutcome::Rejected { max: self.max }
        }
    }

    /// Decrease by one while above one.
    pub fn decrement(&mut self) -> StepOutcome {
        if self.value > 1 {
            self.value -= 1;
            StepOutcome::Changed(self.value)
        } else {
            StepOutcome::Unchanged
        }
    }

    /// Back to 1, as after a page reload.
    pub fn reset(&mut self) {
        self.value = 1;
    }
}
