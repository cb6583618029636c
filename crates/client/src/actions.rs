//! Cancel and mark-received confirmations.
//!
//! Both flows follow the same shape: ask the user, send one request for the
//! order, then either toast and reload (success) or toast only (failure).
//! Neither touches the cart.

use std::future::Future;

use campus_market_core::OrderId;
use tracing::{info, instrument, warn};

use crate::api::OrderApi;
use crate::config::UiTiming;
use crate::effect::Effect;
use crate::toast::Toast;

/// Message shown when the request never got a usable answer.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// A state-changing action on an existing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderAction {
    /// Buyer cancels the order.
    Cancel,
    /// Buyer confirms the order was handed over.
    MarkReceived,
}

impl OrderAction {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::MarkReceived => "mark_received",
        }
    }

    /// Endpoint path segments for this action on `order_id`.
    ///
    /// The id is one segment; the HTTP client percent-encodes it.
    #[must_use]
    pub fn segments<'a>(&self, order_id: &'a OrderId) -> [&'a str; 3] {
        ["orders", self.name(), order_id.as_str()]
    }

    /// Question shown before sending the request.
    #[must_use]
    pub const fn confirm_prompt(&self) -> &'static str {
        match self {
            Self::Cancel => "Are you sure you want to cancel this order?",
            Self::MarkReceived => "Confirm that you have received this order?",
        }
    }

    /// Success toast when the server sends no message.
    #[must_use]
    pub const fn success_message(&self) -> &'static str {
        match self {
            Self::Cancel => "Order cancelled.",
            Self::MarkReceived => "Order marked as received.",
        }
    }

    /// Error toast when the server sends no error text.
    #[must_use]
    pub const fn failure_message(&self) -> &'static str {
        match self {
            Self::Cancel => "Could not cancel the order.",
            Self::MarkReceived => "Could not update the order.",
        }
    }
}

/// Asks the user to confirm an action.
pub trait Confirm {
    /// Return `true` to proceed.
    fn ask(&self, prompt: &str) -> impl Future<Output = bool> + Send;
}

/// Confirm handler that always answers the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    async fn ask(&self, _prompt: &str) -> bool {
        self.0
    }
}

/// Confirm, send the action, and report the outcome as effects.
///
/// Declining produces no effects and no request.
#[instrument(skip(api, confirm, timing), fields(action = action.name(), order_id = %order_id))]
pub async fn run_order_action<A, C>(
    api: &A,
    confirm: &C,
    action: OrderAction,
    order_id: &OrderId,
    timing: &UiTiming,
) -> Vec<Effect>
where
    A: OrderApi + Sync,
    C: Confirm + Sync,
{
    if order_id.is_blank() {
        warn!("Order action triggered without an order id");
        return vec![Effect::toast(Toast::error("Missing order id."))];
    }

    if !confirm.ask(action.confirm_prompt()).await {
        info!("Order action declined");
        return Vec::new();
    }

    match api.order_action(action, order_id).await {
        Ok(reply) if reply.is_success() => {
            info!("Order action succeeded");
            vec![
                Effect::toast(Toast::success(reply.message_or(action.success_message()))),
                Effect::Reload {
                    after: timing.reload_delay,
                },
            ]
        }
        Ok(reply) => {
            warn!(status = reply.status, error = ?reply.body.error, "Order action rejected");
            vec![Effect::toast(Toast::error(
                reply.error_or(action.failure_message()),
            ))]
        }
        Err(e) => {
            warn!(error = %e, "Order action failed");
            vec![Effect::toast(Toast::error(NETWORK_ERROR_MESSAGE))]
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::api::{ApiError, ApiReply, ApiResponse, PlaceOrderRequest};
    use crate::toast::Severity;

    /// Records order actions and answers with a canned reply.
    struct FakeApi {
        reply: Mutex<Option<Result<ApiReply, ApiError>>>,
        calls: Mutex<Vec<(OrderAction, OrderId)>>,
    }

    impl FakeApi {
        fn answering(reply: Result<ApiReply, ApiError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(OrderAction, OrderId)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl OrderApi for FakeApi {
        async fn place_order(&self, _request: &PlaceOrderRequest) -> Result<ApiReply, ApiError> {
            unreachable!("order actions never place orders")
        }

        async fn order_action(
            &self,
            action: OrderAction,
            order_id: &OrderId,
        ) -> Result<ApiReply, ApiError> {
            self.calls.lock().unwrap().push((action, order_id.clone()));
            self.reply.lock().unwrap().take().unwrap()
        }
    }

    fn reply(status: u16, body: ApiResponse) -> Result<ApiReply, ApiError> {
        Ok(ApiReply { status, body })
    }

    #[test]
    fn test_segments() {
        let id = OrderId::new("ORD1");
        assert_eq!(
            OrderAction::Cancel.segments(&id),
            ["orders", "cancel", "ORD1"]
        );
        assert_eq!(
            OrderAction::MarkReceived.segments(&id),
            ["orders", "mark_received", "ORD1"]
        );
    }

    #[tokio::test]
    async fn test_declined_sends_nothing() {
        let api = FakeApi::answering(reply(200, ApiResponse::success(None)));
        let effects = run_order_action(
            &api,
            &AutoConfirm(false),
            OrderAction::Cancel,
            &OrderId::new("ORD1"),
            &UiTiming::default(),
        )
        .await;

        assert!(effects.is_empty());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_success_toasts_then_reloads() {
        let api = FakeApi::answering(reply(
            200,
            ApiResponse::success(Some("Order successfully cancelled.")),
        ));
        let timing = UiTiming::default();
        let effects = run_order_action(
            &api,
            &AutoConfirm(true),
            OrderAction::Cancel,
            &OrderId::new("ORD1"),
            &timing,
        )
        .await;

        assert_eq!(
            effects,
            vec![
                Effect::toast(Toast::success("Order successfully cancelled.")),
                Effect::Reload {
                    after: timing.reload_delay
                },
            ]
        );
        assert_eq!(
            api.calls(),
            vec![(OrderAction::Cancel, OrderId::new("ORD1"))]
        );
    }

    #[tokio::test]
    async fn test_application_failure_uses_server_message_and_no_reload() {
        let api = FakeApi::answering(reply(
            400,
            ApiResponse::failure("This order is already finalized."),
        ));
        let effects = run_order_action(
            &api,
            &AutoConfirm(true),
            OrderAction::MarkReceived,
            &OrderId::new("ORD2"),
            &UiTiming::default(),
        )
        .await;

        assert_eq!(effects.len(), 1);
        let toast = effects[0].as_toast().unwrap();
        assert_eq!(toast.severity, Severity::Error);
        assert_eq!(toast.message, "This order is already finalized.");
    }

    #[tokio::test]
    async fn test_network_failure_uses_generic_message() {
        let api = FakeApi::answering(Err(ApiError::Request("connection refused".to_string())));
        let effects = run_order_action(
            &api,
            &AutoConfirm(true),
            OrderAction::Cancel,
            &OrderId::new("ORD3"),
            &UiTiming::default(),
        )
        .await;

        assert_eq!(
            effects,
            vec![Effect::toast(Toast::error(NETWORK_ERROR_MESSAGE))]
        );
    }

    #[tokio::test]
    async fn test_blank_order_id_is_rejected_before_confirm() {
        let api = FakeApi::answering(reply(200, ApiResponse::success(None)));
        let effects = run_order_action(
            &api,
            &AutoConfirm(true),
            OrderAction::Cancel,
            &OrderId::new(""),
            &UiTiming::default(),
        )
        .await;

        assert_eq!(effects.len(), 1);
        assert!(api.calls().is_empty());
    }
}
