//! Marketplace HTTP client.
//!
//! Sends JSON requests to the order endpoints. The session cookie set by the
//! server at login is kept in the client's cookie store; no other auth is
//! handled here.

use campus_market_core::OrderId;
use reqwest::{Client, Response};
use tracing::{debug, error, instrument, warn};
use url::Url;

use super::error::ApiError;
use super::types::{ApiReply, ApiResponse, PlaceOrderRequest};
use super::OrderApi;
use crate::actions::OrderAction;

/// Place-order endpoint path segments.
pub const PLACE_ORDER_PATH: [&str; 2] = ["api", "place_order"];

/// Client for the marketplace order endpoints.
#[derive(Debug, Clone)]
pub struct MarketClient {
    /// HTTP client with a cookie store.
    client: Client,
    /// Server base URL, always ending in `/`.
    base_url: Url,
}

impl MarketClient {
    /// Create a new client for a server base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(base_url: &Url) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client, base_url: &Url) -> Self {
        let mut base_url = base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    /// Get the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL.
    ///
    /// Each segment is percent-encoded on its own, so `/`, `?` and `#` inside
    /// an id stay inside that segment. Empty and dot segments are rejected.
    fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            for segment in segments {
                if matches!(segment, "" | "." | "..") {
                    return Err(ApiError::InvalidUrl(format!(
                        "invalid path segment {segment:?}"
                    )));
                }
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Decode an order endpoint response.
    ///
    /// Error statuses with a non-JSON body still count as a server answer
    /// (an application failure without a message). A 2xx status with an
    /// unreadable body is a decode error.
    async fn read_reply(response: Response) -> Result<ApiReply, ApiError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        match serde_json::from_str::<ApiResponse>(&text) {
            Ok(body) => Ok(ApiReply {
                status: status.as_u16(),
                body,
            }),
            Err(e) if status.is_success() => {
                error!(%status, error = %e, "Unreadable marketplace response");
                Err(ApiError::Decode(e.to_string()))
            }
            Err(_) => {
                warn!(%status, "Marketplace returned a non-JSON error body");
                Ok(ApiReply {
                    status: status.as_u16(),
                    body: ApiResponse::default(),
                })
            }
        }
    }
}

impl OrderApi for MarketClient {
    #[instrument(skip(self, request), fields(lines = request.cart.distinct_count()))]
    async fn place_order(&self, request: &PlaceOrderRequest) -> Result<ApiReply, ApiError> {
        let url = self.endpoint(PLACE_ORDER_PATH)?;

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let reply = Self::read_reply(response).await?;
        debug!(status = reply.status, ok = reply.body.ok, "Place order answered");

        Ok(reply)
    }

    #[instrument(skip(self), fields(action = action.name(), order_id = %order_id))]
    async fn order_action(
        &self,
        action: OrderAction,
        order_id: &OrderId,
    ) -> Result<ApiReply, ApiError> {
        let url = self.endpoint(action.segments(order_id))?;

        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let reply = Self::read_reply(response).await?;
        debug!(status = reply.status, ok = reply.body.ok, "Order action answered");

        Ok(reply)
    }
}
