//! Side-effect intents returned by cart operations.

use std::time::Duration;

use crate::toast::Toast;

/// Path of the buyer's order listing page.
pub const ORDERS_PAGE: &str = "/orders";

/// Something the front-end must do after a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a notification.
    Toast(Toast),
    /// Replace the header cart badge text (empty hides the count).
    Badge(String),
    /// Replace the quantity stepper's displayed value.
    Stepper(u32),
    /// Reload the current page after a delay.
    Reload { after: Duration },
    /// Navigate to another page after a delay.
    Navigate { to: String, after: Duration },
}

impl Effect {
    /// Shorthand for [`Effect::Toast`].
    #[must_use]
    pub const fn toast(toast: Toast) -> Self {
        Self::Toast(toast)
    }

    /// The toast carried by this effect, if any.
    #[must_use]
    pub const fn as_toast(&self) -> Option<&Toast> {
        match self {
            Self::Toast(t) => Some(t),
            _ => None,
        }
    }

    /// Whether this effect reloads or leaves the current page.
    #[must_use]
    pub const fn is_page_transition(&self) -> bool {
        matches!(self, Self::Reload { .. } | Self::Navigate { .. })
    }
}
