//! End-to-end cancel and mark-received flows against the fake marketplace.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use campus_market_client::{
    AutoConfirm, Command, Effect, MarketClient, OrderAction, Severity, run_order_action,
};
use campus_market_core::{ItemId, OrderId, OrderStatus, Price};
use campus_market_integration_tests::{
    FakeMarket, closed_port_url, instant_timing, market_dispatcher,
};
use tempfile::TempDir;

fn only_toast(effects: &[Effect]) -> (String, Severity) {
    let toast = effects[0].as_toast().unwrap();
    (toast.message.clone(), toast.severity)
}

// =============================================================================
// Cancel
// =============================================================================

#[tokio::test]
async fn test_cancel_pending_order_restocks() {
    let market = FakeMarket::start(&[("42", 0)]).await;
    market.seed_order("ORD-9", "42", 2, OrderStatus::Pending);
    let profile = TempDir::new().unwrap();
    let mut d = market_dispatcher(&market.base_url(), profile.path(), true);

    let effects = d
        .dispatch(Command::CancelOrder(OrderId::new("ORD-9")))
        .await;

    assert_eq!(
        only_toast(&effects),
        ("Order successfully cancelled.".to_string(), Severity::Success)
    );
    assert!(matches!(effects[1], Effect::Reload { .. }));

    let state = market.state();
    assert_eq!(state.orders[0].status, OrderStatus::Cancelled);
    assert_eq!(state.listings[&ItemId::new("42")].stock, 2);
}

#[tokio::test]
async fn test_cancel_completed_order_is_rejected() {
    let market = FakeMarket::start(&[]).await;
    market.seed_order("ORD-1", "42", 1, OrderStatus::Completed);
    let profile = TempDir::new().unwrap();
    let mut d = market_dispatcher(&market.base_url(), profile.path(), true);

    let effects = d
        .dispatch(Command::CancelOrder(OrderId::new("ORD-1")))
        .await;

    assert_eq!(
        effects.len(),
        1,
        "a rejected action must not reload the page"
    );
    assert_eq!(
        only_toast(&effects),
        ("This order cannot be cancelled.".to_string(), Severity::Error)
    );
    assert_eq!(market.state().orders[0].status, OrderStatus::Completed);
}

#[tokio::test]
async fn test_cancel_unknown_order() {
    let market = FakeMarket::start(&[]).await;
    let profile = TempDir::new().unwrap();
    let mut d = market_dispatcher(&market.base_url(), profile.path(), true);

    let effects = d
        .dispatch(Command::CancelOrder(OrderId::new("ORD-404")))
        .await;

    assert_eq!(
        only_toast(&effects),
        (
            "Order not found or permission denied.".to_string(),
            Severity::Error
        )
    );
}

#[tokio::test]
async fn test_declined_cancel_sends_nothing() {
    let market = FakeMarket::start(&[]).await;
    market.seed_order("ORD-2", "42", 1, OrderStatus::Pending);
    let profile = TempDir::new().unwrap();
    let mut d = market_dispatcher(&market.base_url(), profile.path(), false);

    let effects = d
        .dispatch(Command::CancelOrder(OrderId::new("ORD-2")))
        .await;

    assert!(effects.is_empty());
    assert_eq!(market.state().orders[0].status, OrderStatus::Pending);
}

// =============================================================================
// Mark received
// =============================================================================

#[tokio::test]
async fn test_mark_received_completes_order() {
    let market = FakeMarket::start(&[]).await;
    market.seed_order("ORD-3", "42", 1, OrderStatus::ReadyForPickup);
    let profile = TempDir::new().unwrap();
    let mut d = market_dispatcher(&market.base_url(), profile.path(), true);

    let effects = d
        .dispatch(Command::MarkReceived(OrderId::new("ORD-3")))
        .await;

    assert_eq!(
        only_toast(&effects),
        ("Order marked as received.".to_string(), Severity::Success)
    );
    assert_eq!(market.state().orders[0].status, OrderStatus::Completed);
}

#[tokio::test]
async fn test_mark_received_twice_is_rejected() {
    let market = FakeMarket::start(&[]).await;
    market.seed_order("ORD-4", "42", 1, OrderStatus::InTransit);
    let client = MarketClient::new(&market.base_url()).unwrap();
    let timing = instant_timing();
    let order = OrderId::new("ORD-4");

    run_order_action(
        &client,
        &AutoConfirm(true),
        OrderAction::MarkReceived,
        &order,
        &timing,
    )
    .await;
    let effects = run_order_action(
        &client,
        &AutoConfirm(true),
        OrderAction::MarkReceived,
        &order,
        &timing,
    )
    .await;

    assert_eq!(
        only_toast(&effects),
        (
            "This order is already finalized.".to_string(),
            Severity::Error
        )
    );
}

#[tokio::test]
async fn test_order_action_network_failure() {
    let profile = TempDir::new().unwrap();
    let mut d = market_dispatcher(&closed_port_url().await, profile.path(), true);

    let effects = d
        .dispatch(Command::MarkReceived(OrderId::new("ORD-5")))
        .await;

    assert_eq!(
        effects,
        vec![Effect::toast(campus_market_client::Toast::error(
            "Network error. Please try again."
        ))]
    );
}

// =============================================================================
// Cart isolation
// =============================================================================

#[tokio::test]
async fn test_order_actions_leave_cart_alone() {
    let market = FakeMarket::start(&[("42", 3)]).await;
    market.seed_order("ORD-6", "42", 1, OrderStatus::Pending);
    let profile = TempDir::new().unwrap();
    let mut d = market_dispatcher(&market.base_url(), profile.path(), true);

    d.dispatch(Command::AddToCart {
        id: ItemId::new("42"),
        name: "Pen".to_string(),
        price: Price::from_units(10),
    })
    .await;
    d.dispatch(Command::CancelOrder(OrderId::new("ORD-6"))).await;

    assert_eq!(d.manager().cart().total_quantity(), 1);
    assert_eq!(
        d.dispatch(Command::RefreshBadge).await,
        vec![Effect::Badge("1".to_string())]
    );
}
