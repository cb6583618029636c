//! Checkout submission.
//!
//! Linear state machine with no automatic retries:
//!
//! ```text
//! Idle --empty cart--> Idle (error toast, no request)
//! Idle --submit------> Submitting --ok:true----------> Succeeded (cart cleared, go to orders)
//!                                 --ok:false / 4xx---> Failed(Application)
//!                                                      (cart kept, optional reload)
//!                                 --transport error--> Failed(Network) (cart kept, no reload)
//! ```
//!
//! A second submit while one is in flight is rejected without a request.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, instrument, warn};

use crate::actions::NETWORK_ERROR_MESSAGE;
use crate::api::{OrderApi, PlaceOrderRequest};
use crate::config::{CheckoutOptions, UiTiming};
use crate::effect::{Effect, ORDERS_PAGE};
use crate::store::CartStore;
use crate::toast::Toast;

pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty";
pub const PROCESSING_MESSAGE: &str = "Placing your order...";
pub const IN_FLIGHT_MESSAGE: &str = "Your order is already being placed.";
pub const SUCCESS_MESSAGE: &str = "Order placed successfully!";
pub const FAILURE_MESSAGE: &str = "Could not place order.";

/// Why a checkout attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The server answered and rejected the order.
    Application,
    /// No usable answer arrived.
    Network,
}

/// Checkout state after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(FailureKind),
}

/// Outcome of one checkout trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReport {
    pub state: CheckoutState,
    pub effects: Vec<Effect>,
    /// Whether a place-order request was sent.
    pub request_sent: bool,
}

/// Clears the in-flight flag when a submission ends, even on early return.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Checkout flow over an order API.
#[derive(Debug)]
pub struct Checkout<A> {
    api: A,
    options: CheckoutOptions,
    timing: UiTiming,
    in_flight: AtomicBool,
}

impl<A: OrderApi + Sync> Checkout<A> {
    /// Create a checkout flow.
    #[must_use]
    pub const fn new(api: A, options: CheckoutOptions, timing: UiTiming) -> Self {
        Self {
            api,
            options,
            timing,
            in_flight: AtomicBool::new(false),
        }
    }

    /// The order API.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Whether a submission is currently in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit the stored cart as an order.
    ///
    /// The cart is cleared only after the server confirms the order.
    #[instrument(skip(self, store))]
    pub async fn submit<S: CartStore + Sync>(&self, store: &S) -> CheckoutReport {
        let cart = store.load();
        if cart.is_empty() {
            info!("Checkout with empty cart");
            return CheckoutReport {
                state: CheckoutState::Idle,
                effects: vec![Effect::toast(Toast::error(EMPTY_CART_MESSAGE))],
                request_sent: false,
            };
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Checkout already in flight");
            return CheckoutReport {
                state: CheckoutState::Submitting,
                effects: vec![Effect::toast(Toast::warning(IN_FLIGHT_MESSAGE))],
                request_sent: false,
            };
        }
        let _guard = InFlight(&self.in_flight);

        let mut effects = vec![Effect::toast(Toast::info(PROCESSING_MESSAGE))];
        let request = PlaceOrderRequest {
            cart,
            payment_mode: self.options.payment_mode,
        };
        info!(lines = request.cart.distinct_count(), "Submitting order");

        let state = match self.api.place_order(&request).await {
            Ok(reply) if reply.is_success() => match store.clear() {
                Ok(()) => {
                    info!("Order placed");
                    let message = reply.message_or(SUCCESS_MESSAGE);
                    effects.push(Effect::toast(Toast::success(message)));
                    effects.push(Effect::Badge(String::new()));
                    effects.push(Effect::Navigate {
                        to: ORDERS_PAGE.to_string(),
                        after: self.timing.redirect_delay,
                    });
                    CheckoutState::Succeeded
                }
                Err(e) => {
                    // Order exists server-side; leave the page anyway.
                    error!(error = %e, "Order placed but cart could not be cleared");
                    let message = reply.message_or(SUCCESS_MESSAGE);
                    effects.push(Effect::toast(Toast::success(message)));
                    effects.push(Effect::toast(Toast::warning(
                        "Your cart could not be emptied; please remove ordered items.",
                    )));
                    effects.push(Effect::Navigate {
                        to: ORDERS_PAGE.to_string(),
                        after: self.timing.redirect_delay,
                    });
                    CheckoutState::Succeeded
                }
            },
            Ok(reply) => {
                warn!(status = reply.status, error = ?reply.body.error, "Order rejected");
                effects.push(Effect::toast(Toast::error(reply.error_or(FAILURE_MESSAGE))));
                if self.options.reload_on_failure {
                    effects.push(Effect::Reload {
                        after: self.timing.reload_delay,
                    });
                }
                CheckoutState::Failed(FailureKind::Application)
            }
            Err(e) => {
                warn!(error = %e, "Order request failed");
                effects.push(Effect::toast(Toast::error(NETWORK_ERROR_MESSAGE)));
                CheckoutState::Failed(FailureKind::Network)
            }
        };

        CheckoutReport {
            state,
            effects,
            request_sent: true,
        }
    }
}
