//! UI command dispatcher.
//!
//! Maps each user action to a cart transition and the effects the front-end
//! must apply. Failures are reported as toasts; dispatch itself never fails.

use campus_market_core::{ItemId, OrderId, Price};
use tracing::{error, instrument};

use crate::actions::{Confirm, OrderAction, run_order_action};
use crate::api::OrderApi;
use crate::checkout::Checkout;
use crate::effect::Effect;
use crate::error::CartError;
use crate::manager::CartManager;
use crate::stepper::{QuantityStepper, StepOutcome};
use crate::store::CartStore;
use crate::toast::Toast;

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A product detail view was opened; binds the stepper to its stock.
    OpenProduct { id: ItemId, max_stock: u32 },
    /// Quantity stepper plus button.
    StepUp,
    /// Quantity stepper minus button.
    StepDown,
    /// Add an item to the cart, using the stepper's quantity when the
    /// stepper belongs to that item and one otherwise.
    AddToCart {
        id: ItemId,
        name: String,
        price: Price,
    },
    /// Remove a line from the cart page.
    RemoveFromCart { id: ItemId },
    /// Edit the quantity of a line on the cart page.
    SetQuantity { id: ItemId, qty: u32 },
    /// Place the order.
    Checkout,
    /// Cancel an order from the order history.
    CancelOrder(OrderId),
    /// Confirm receipt of an order.
    MarkReceived(OrderId),
    /// Recompute the header badge (page load).
    RefreshBadge,
}

/// Routes commands to the cart manager, stepper, checkout, and order actions.
#[derive(Debug)]
pub struct Dispatcher<S, A, C> {
    manager: CartManager<S>,
    checkout: Checkout<A>,
    confirm: C,
    stepper: QuantityStepper,
    stepper_item: Option<ItemId>,
}

impl<S, A, C> Dispatcher<S, A, C>
where
    S: CartStore + Sync,
    A: OrderApi + Sync,
    C: Confirm + Sync,
{
    /// Create a dispatcher.
    #[must_use]
    pub fn new(manager: CartManager<S>, checkout: Checkout<A>, confirm: C) -> Self {
        Self {
            manager,
            checkout,
            confirm,
            stepper: QuantityStepper::new(1),
            stepper_item: None,
        }
    }

    /// The cart manager.
    #[must_use]
    pub const fn manager(&self) -> &CartManager<S> {
        &self.manager
    }

    /// The checkout flow.
    #[must_use]
    pub const fn checkout(&self) -> &Checkout<A> {
        &self.checkout
    }

    /// The active quantity stepper.
    #[must_use]
    pub const fn stepper(&self) -> &QuantityStepper {
        &self.stepper
    }

    /// Handle one command.
    #[instrument(skip(self))]
    pub async fn dispatch(&mut self, command: Command) -> Vec<Effect> {
        match command {
            Command::OpenProduct { id, max_stock } => {
                self.stepper = QuantityStepper::new(max_stock);
                self.stepper_item = Some(id);
                vec![Effect::Stepper(self.stepper.value())]
            }
            Command::StepUp => step_effects(self.stepper.increment()),
            Command::StepDown => step_effects(self.stepper.decrement()),
            Command::AddToCart { id, name, price } => {
                let bound = self.stepper_item.as_ref() == Some(&id);
                let qty = if bound { self.stepper.value() } else { 1 };
                match self.manager.add_item(&id, &name, price, qty) {
                    Ok(mut effects) if bound => {
                        self.stepper.reset();
                        effects.push(Effect::Stepper(self.stepper.value()));
                        effects
                    }
                    Ok(effects) => effects,
                    Err(e) => cart_failure(&e),
                }
            }
            Command::RemoveFromCart { id } => self
                .manager
                .remove_item(&id)
                .unwrap_or_else(|e| cart_failure(&e)),
            Command::SetQuantity { id, qty } => self
                .manager
                .update_quantity(&id, qty)
                .unwrap_or_else(|e| cart_failure(&e)),
            Command::Checkout => self.checkout.submit(self.manager.store()).await.effects,
            Command::CancelOrder(order_id) => {
                self.order_action(OrderAction::Cancel, &order_id).await
            }
            Command::MarkReceived(order_id) => {
                self.order_action(OrderAction::MarkReceived, &order_id)
                    .await
            }
            Command::RefreshBadge => vec![self.manager.update_badge()],
        }
    }

    async fn order_action(&self, action: OrderAction, order_id: &OrderId) -> Vec<Effect> {
        run_order_action(
            self.checkout.api(),
            &self.confirm,
            action,
            order_id,
            self.manager.timing(),
        )
        .await
    }
}

fn step_effects(outcome: StepOutcome) -> Vec<Effect> {
    match outcome {
        StepOutcome::Changed(value) => vec![Effect::Stepper(value)],
        StepOutcome::Unchanged => Vec::new(),
        StepOutcome::Rejected { .. } => outcome.toast().map(Effect::Toast).into_iter().collect(),
    }
}

fn cart_failure(err: &CartError) -> Vec<Effect> {
    match err {
        CartError::Invalid(reason) => {
            vec![Effect::toast(Toast::error(format!("Could not add item: {reason}")))]
        }
        CartError::Store(e) => {
            error!(error = %e, "Cart store failure");
            vec![Effect::toast(Toast::error("Could not update your cart."))]
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::actions::AutoConfirm;
    use crate::api::{ApiError, ApiReply, ApiResponse, PlaceOrderRequest};
    use crate::config::{CheckoutOptions, UiTiming};
    use crate::store::MemoryCartStore;
    use crate::toast::Severity;

    #[derive(Default)]
    struct OkApi {
        orders: AtomicUsize,
        actions: Mutex<Vec<OrderAction>>,
    }

    impl OrderApi for OkApi {
        async fn place_order(&self, _request: &PlaceOrderRequest) -> Result<ApiReply, ApiError> {
            self.orders.fetch_add(1, Ordering::SeqCst);
            Ok(ApiReply {
                status: 200,
                body: ApiResponse::success(None),
            })
        }

        async fn order_action(
            &self,
            action: OrderAction,
            _order_id: &OrderId,
        ) -> Result<ApiReply, ApiError> {
            self.actions.lock().unwrap().push(action);
            Ok(ApiReply {
                status: 200,
                body: ApiResponse::success(None),
            })
        }
    }

    fn dispatcher(confirm: bool) -> Dispatcher<MemoryCartStore, OkApi, AutoConfirm> {
        let timing = UiTiming::default();
        Dispatcher::new(
            CartManager::new(MemoryCartStore::new(), timing),
            Checkout::new(OkApi::default(), CheckoutOptions::default(), timing),
            AutoConfirm(confirm),
        )
    }

    fn open_pen(max_stock: u32) -> Command {
        Command::OpenProduct {
            id: ItemId::new("42"),
            max_stock,
        }
    }

    fn add_pen() -> Command {
        Command::AddToCart {
            id: ItemId::new("42"),
            name: "Pen".to_string(),
            price: Price::from_units(10),
        }
    }

    #[tokio::test]
    async fn test_stepper_value_feeds_add_to_cart() {
        let mut d = dispatcher(true);
        d.dispatch(open_pen(5)).await;
        assert_eq!(d.dispatch(Command::StepUp).await, vec![Effect::Stepper(2)]);
        d.dispatch(Command::StepUp).await;

        let effects = d.dispatch(add_pen()).await;
        assert_eq!(effects[0], Effect::Badge("1".to_string()));
        assert_eq!(
            effects[1].as_toast().unwrap().message,
            "Added 3 x Pen to cart"
        );
        assert_eq!(d.manager().cart().lines()[0].qty, 3);
        assert_eq!(d.stepper().value(), 1);
    }

    #[tokio::test]
    async fn test_stepper_only_applies_to_its_product() {
        let mut d = dispatcher(true);
        d.dispatch(open_pen(9)).await;
        for _ in 0..8 {
            d.dispatch(Command::StepUp).await;
        }

        let effects = d
            .dispatch(Command::AddToCart {
                id: ItemId::new("lamp"),
                name: "Lamp".to_string(),
                price: Price::from_units(25),
            })
            .await;

        assert_eq!(
            effects[1].as_toast().unwrap().message,
            "Added 1 x Lamp to cart"
        );
        assert_eq!(d.manager().cart().get(&ItemId::new("lamp")).unwrap().qty, 1);
        // The open product keeps its selection.
        assert_eq!(d.stepper().value(), 9);
    }

    #[tokio::test]
    async fn test_add_without_open_product_adds_one() {
        let mut d = dispatcher(true);
        d.dispatch(Command::StepUp).await;
        d.dispatch(add_pen()).await;
        assert_eq!(d.manager().cart().lines()[0].qty, 1);
    }

    #[tokio::test]
    async fn test_step_up_at_max_warns() {
        let mut d = dispatcher(true);
        d.dispatch(open_pen(1)).await;
        let effects = d.dispatch(Command::StepUp).await;
        assert_eq!(
            effects,
            vec![Effect::toast(Toast::new(
                "Only 1 available in stock.",
                Severity::Warning
            ))]
        );
    }

    #[tokio::test]
    async fn test_step_down_at_floor_is_silent() {
        let mut d = dispatcher(true);
        assert!(d.dispatch(Command::StepDown).await.is_empty());
    }

    #[tokio::test]
    async fn test_stepper_does_not_touch_store() {
        let mut d = dispatcher(true);
        d.dispatch(open_pen(9)).await;
        d.dispatch(Command::StepUp).await;
        assert!(d.manager().store().raw().is_none());
    }

    #[tokio::test]
    async fn test_invalid_add_becomes_error_toast() {
        let mut d = dispatcher(true);
        let effects = d
            .dispatch(Command::AddToCart {
                id: ItemId::new(""),
                name: "Pen".to_string(),
                price: Price::from_units(10),
            })
            .await;
        assert_eq!(effects.len(), 1);
        assert_eq!(
            effects[0].as_toast().map(|t| t.severity),
            Some(Severity::Error)
        );
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_never_calls_api() {
        let mut d = dispatcher(true);
        let effects = d.dispatch(Command::Checkout).await;
        assert_eq!(
            effects,
            vec![Effect::toast(Toast::error("Your cart is empty"))]
        );
        assert_eq!(d.checkout().api().orders.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_checkout_success_empties_cart() {
        let mut d = dispatcher(true);
        d.dispatch(add_pen()).await;
        d.dispatch(Command::Checkout).await;

        assert!(d.manager().cart().is_empty());
        assert_eq!(
            d.dispatch(Command::RefreshBadge).await,
            vec![Effect::Badge(String::new())]
        );
    }

    #[tokio::test]
    async fn test_order_actions_do_not_touch_cart() {
        let mut d = dispatcher(true);
        d.dispatch(add_pen()).await;
        let before = d.manager().cart();

        d.dispatch(Command::CancelOrder(OrderId::new("A1"))).await;
        d.dispatch(Command::MarkReceived(OrderId::new("A2"))).await;

        assert_eq!(d.manager().cart(), before);
        assert_eq!(
            *d.checkout().api().actions.lock().unwrap(),
            vec![OrderAction::Cancel, OrderAction::MarkReceived]
        );
    }

    #[tokio::test]
    async fn test_declined_order_action_has_no_effects() {
        let mut d = dispatcher(false);
        let effects = d.dispatch(Command::CancelOrder(OrderId::new("A1"))).await;
        assert!(effects.is_empty());
        assert!(d.checkout().api().actions.lock().unwrap().is_empty());
    }
}
