//! Campus Market Client - Browser-side cart manager.
//!
//! Owns the lifecycle of the client-resident cart and its presentation
//! affordances: badge count, quantity steppers, checkout submission, order
//! action confirmations, and toast notifications.
//!
//! # Architecture
//!
//! - [`store`] - Injected cart repository (`load`/`save`/`clear`)
//! - [`manager`] - Add / remove / quantity operations on the stored cart
//! - [`stepper`] - Pre-add quantity selector bounded by product stock
//! - [`checkout`] - Linear place-order state machine
//! - [`actions`] - Confirm-then-request cancel and mark-received flows
//! - [`toast`] - Stacking, auto-expiring notifications
//! - [`api`] - HTTP client for the marketplace JSON endpoints
//! - [`dispatch`] - Maps UI commands to state transitions plus [`Effect`]s
//!
//! Handlers never touch a rendering environment directly. Every operation
//! returns a list of [`Effect`]s (toast, badge text, reload, navigate) that
//! the embedding front-end carries out.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod actions;
pub mod api;
pub mod checkout;
pub mod config;
pub mod dispatch;
pub mod effect;
pub mod error;
pub mod manager;
pub mod stepper;
pub mod store;
pub mod toast;

pub use actions::{AutoConfirm, Confirm, OrderAction, run_order_action};
pub use api::{ApiError, ApiReply, ApiResponse, MarketClient, OrderApi, PlaceOrderRequest};
pub use checkout::{Checkout, CheckoutReport, CheckoutState, FailureKind};
pub use config::{CheckoutOptions, ClientConfig, ConfigError, UiTiming};
pub use dispatch::{Command, Dispatcher};
pub use effect::Effect;
pub use error::{CartError, StoreError};
pub use manager::CartManager;
pub use stepper::{QuantityStepper, StepOutcome};
pub use store::{CartStore, FileCartStore, MemoryCartStore};
pub use toast::{Delivery, Severity, Toast, ToastOverlay, Toaster};
