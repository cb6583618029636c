//! Status enums for marketplace entities.
//!
//! The client never mutates these; they describe the shape of data the
//! marketplace server persists and renders (order history, listings), and
//! the payment flag sent with a place-order request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Order lifecycle status, as stored by the marketplace server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed by the buyer, awaiting the seller.
    #[default]
    Pending,
    /// Received by the campus warehouse.
    InTransit,
    /// Waiting at the pickup point.
    ReadyForPickup,
    /// Handed over to the buyer.
    Completed,
    /// Cancelled by the buyer.
    Cancelled,
}

impl OrderStatus {
    /// Whether a buyer may still cancel an order in this status.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        matches!(self, Self::Pending | Self::InTransit | Self::ReadyForPickup)
    }

    /// Whether the order has reached a terminal status.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InTransit => "in_transit",
            Self::ReadyForPickup => "ready_for_pickup",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_transit" => Ok(Self::InTransit),
            "ready_for_pickup" => Ok(Self::ReadyForPickup),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid order status: {s}")),
        }
    }
}

/// Catalog listing availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Available,
    Sold,
    Unavailable,
}

/// Payment mode flag carried by a place-order request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMode {
    /// Cash on delivery.
    #[default]
    #[serde(rename = "COD")]
    Cod,
}

impl FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "COD" => Ok(Self::Cod),
            _ => Err(format!("Invalid payment mode: {s}")),
        }
    }
}
