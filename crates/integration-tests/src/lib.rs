//! Integration tests for Campus Market.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p campus-market-integration-tests
//! ```
//!
//! # Fake Marketplace
//!
//! [`FakeMarket`] starts an `axum` server on an ephemeral localhost port that
//! speaks the same JSON contract as the real marketplace:
//!
//! - `POST /api/place_order` - checks stock, creates one order per line
//! - `POST /orders/cancel/{order_id}` - cancels and restocks
//! - `POST /orders/mark_received/{order_id}` - completes the order
//!
//! Two extra prefixes simulate broken servers:
//!
//! - `/garbled/...` answers `200` with an HTML body
//! - `/down/...` answers `503` with a plain-text body

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use campus_market_client::{
    ApiResponse, AutoConfirm, CartManager, Checkout, CheckoutOptions, Dispatcher, FileCartStore,
    MarketClient, PlaceOrderRequest, UiTiming,
};
use campus_market_core::{ItemId, ItemStatus, OrderId, OrderStatus, PaymentMode};
use url::Url;

/// A listing in the fake catalog.
#[derive(Debug, Clone)]
pub struct Listing {
    pub stock: u32,
    pub status: ItemStatus,
}

/// An order created by the fake server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub id: OrderId,
    pub item_id: ItemId,
    pub qty: u32,
    pub status: OrderStatus,
    pub payment_mode: Option<PaymentMode>,
}

/// Server-side state shared with the test.
#[derive(Debug, Default)]
pub struct MarketState {
    pub listings: HashMap<ItemId, Listing>,
    pub orders: Vec<PlacedOrder>,
    pub place_order_calls: usize,
    next_order: u32,
}

type Shared = Arc<Mutex<MarketState>>;

/// Running fake marketplace.
#[derive(Debug, Clone)]
pub struct FakeMarket {
    base_url: Url,
    state: Shared,
}

impl FakeMarket {
    /// Start the server with the given stock levels.
    pub async fn start(stock: &[(&str, u32)]) -> Self {
        let mut state = MarketState::default();
        for (id, qty) in stock {
            state.listings.insert(
                ItemId::new(*id),
                Listing {
                    stock: *qty,
                    status: if *qty > 0 {
                        ItemStatus::Available
                    } else {
                        ItemStatus::Sold
                    },
                },
            );
        }
        let state: Shared = Arc::new(Mutex::new(state));

        let app = Router::new()
            .route("/api/place_order", post(place_order))
            .route("/orders/cancel/{order_id}", post(cancel_order))
            .route("/orders/mark_received/{order_id}", post(mark_received))
            .route("/garbled/{*rest}", post(garbled))
            .route("/down/{*rest}", post(down))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Fake market stopped");
            }
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/")).unwrap(),
            state,
        }
    }

    /// Base URL of the well-behaved endpoints.
    #[must_use]
    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    /// Base URL whose endpoints answer 200 with a non-JSON body.
    #[must_use]
    pub fn garbled_url(&self) -> Url {
        self.base_url.join("garbled/").unwrap()
    }

    /// Base URL whose endpoints answer 503 with a plain-text body.
    #[must_use]
    pub fn down_url(&self) -> Url {
        self.base_url.join("down/").unwrap()
    }

    /// Lock the server state for inspection or seeding.
    pub fn state(&self) -> MutexGuard<'_, MarketState> {
        self.state.lock().unwrap()
    }

    /// Insert an order directly, as if placed earlier.
    pub fn seed_order(&self, id: &str, item_id: &str, qty: u32, status: OrderStatus) {
        self.state().orders.push(PlacedOrder {
            id: OrderId::new(id),
            item_id: ItemId::new(item_id),
            qty,
            status,
            payment_mode: Some(PaymentMode::Cod),
        });
    }
}

/// Timing with no page-transition delays.
#[must_use]
pub fn instant_timing() -> UiTiming {
    UiTiming {
        reload_delay: Duration::ZERO,
        redirect_delay: Duration::ZERO,
        ..UiTiming::default()
    }
}

/// Dispatcher wired the way the CLI wires it, against `base_url`.
pub type MarketDispatcher = Dispatcher<FileCartStore, MarketClient, AutoConfirm>;

/// Build a dispatcher with a file-backed cart in `profile_dir`.
pub fn market_dispatcher(
    base_url: &Url,
    profile_dir: &std::path::Path,
    confirm: bool,
) -> MarketDispatcher {
    let timing = instant_timing();
    let store = FileCartStore::open(profile_dir).unwrap();
    let client = MarketClient::new(base_url).unwrap();
    Dispatcher::new(
        CartManager::new(store, timing),
        Checkout::new(client, CheckoutOptions::default(), timing),
        AutoConfirm(confirm),
    )
}

/// A localhost URL with nothing listening on it.
pub async fn closed_port_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/")).unwrap()
}

fn reply(status: StatusCode, body: ApiResponse) -> Response {
    (status, Json(body)).into_response()
}

async fn place_order(
    State(state): State<Shared>,
    Json(request): Json<PlaceOrderRequest>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.place_order_calls += 1;

    if request.cart.is_empty() {
        return reply(
            StatusCode::BAD_REQUEST,
            ApiResponse::failure("Cart is invalid or empty"),
        );
    }

    // All lines must be in stock before anything is committed.
    for line in request.cart.lines() {
        let available = state
            .listings
            .get(&line.id)
            .is_some_and(|l| l.status == ItemStatus::Available && l.stock >= line.qty);
        if !available {
            return reply(
                StatusCode::BAD_REQUEST,
                ApiResponse::failure(format!("'{}' is out of stock or unavailable.", line.name)),
            );
        }
    }

    for line in request.cart.lines() {
        if let Some(listing) = state.listings.get_mut(&line.id) {
            listing.stock -= line.qty;
            if listing.stock == 0 {
                listing.status = ItemStatus::Sold;
            }
        }
        state.next_order += 1;
        let id = OrderId::new(format!("ORD-{}", state.next_order));
        state.orders.push(PlacedOrder {
            id,
            item_id: line.id.clone(),
            qty: line.qty,
            status: OrderStatus::Pending,
            payment_mode: request.payment_mode,
        });
    }

    reply(
        StatusCode::OK,
        ApiResponse::success(Some("Order placed successfully!")),
    )
}

async fn cancel_order(State(state): State<Shared>, Path(order_id): Path<String>) -> Response {
    let mut state = state.lock().unwrap();
    let state = &mut *state;

    let Some(order) = state.orders.iter_mut().find(|o| o.id.as_str() == order_id) else {
        return reply(
            StatusCode::NOT_FOUND,
            ApiResponse::failure("Order not found or permission denied."),
        );
    };
    if !order.status.is_cancellable() {
        return reply(
            StatusCode::BAD_REQUEST,
            ApiResponse::failure("This order cannot be cancelled."),
        );
    }

    order.status = OrderStatus::Cancelled;
    if let Some(listing) = state.listings.get_mut(&order.item_id) {
        listing.stock += order.qty;
        listing.status = ItemStatus::Available;
    }

    reply(
        StatusCode::OK,
        ApiResponse::success(Some("Order successfully cancelled.")),
    )
}

async fn mark_received(State(state): State<Shared>, Path(order_id): Path<String>) -> Response {
    let mut state = state.lock().unwrap();

    let Some(order) = state.orders.iter_mut().find(|o| o.id.as_str() == order_id) else {
        return reply(
            StatusCode::NOT_FOUND,
            ApiResponse::failure("Order not found or permission denied."),
        );
    };
    if order.status.is_finalized() {
        return reply(
            StatusCode::BAD_REQUEST,
            ApiResponse::failure("This order is already finalized."),
        );
    }

    order.status = OrderStatus::Completed;
    reply(
        StatusCode::OK,
        ApiResponse::success(Some("Order marked as received.")),
    )
}

async fn garbled() -> Html<&'static str> {
    Html("<html><body>Maintenance</body></html>")
}

async fn down() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "upstream unavailable")
}
