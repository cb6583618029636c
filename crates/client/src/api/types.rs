//! Wire types for the marketplace endpoints.

use campus_market_core::{Cart, PaymentMode};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/place_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub cart: Cart,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub payment_mode: Option<PaymentMode>,
}

/// JSON body returned by every order endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    /// Successful response with an optional message.
    #[must_use]
    pub fn success(message: Option<&str>) -> Self {
        Self {
            ok: true,
            error: None,
            message: message.map(String::from),
        }
    }

    /// Failed response with an error message.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            message: None,
        }
    }
}

/// A response received from the server (transport success).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReply {
    /// HTTP status code
    pub status: u16,
    /// Decoded body
    pub body: ApiResponse,
}

impl ApiReply {
    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_http_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Both the HTTP status and the application flag report success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.is_http_success() && self.body.ok
    }

    /// Server-supplied error text, or `fallback`.
    #[must_use]
    pub fn error_or(&self, fallback: &str) -> String {
        self.body
            .error
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    /// Server-supplied success text, or `fallback`.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        self.body
            .message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use campus_market_core::Price;

    use super::*;

    #[test]
    fn test_place_order_body_shape() {
        let mut cart = Cart::new();
        cart.add("42", "Pen", Price::from_units(10), 1);

        let with_mode = PlaceOrderRequest {
            cart: cart.clone(),
            payment_mode: Some(PaymentMode::Cod),
        };
        let value = serde_json::to_value(&with_mode).unwrap();
        assert_eq!(value["payment_mode"], "COD");
        assert_eq!(value["cart"][0]["id"], "42");

        let without_mode = PlaceOrderRequest {
            cart,
            payment_mode: None,
        };
        let value = serde_json::to_value(&without_mode).unwrap();
        assert!(value.get("payment_mode").is_none());
    }

    #[test]
    fn test_response_defaults_missing_fields() {
        let body: ApiResponse = serde_json::from_str("{}").unwrap();
        assert!(!body.ok);
        assert!(body.error.is_none());
    }

    #[test]
    fn test_success_requires_status_and_flag() {
        let ok = ApiReply {
            status: 200,
            body: ApiResponse::success(None),
        };
        assert!(ok.is_success());

        let flagged = ApiReply {
            status: 200,
            body: ApiResponse::failure("out of stock"),
        };
        assert!(!flagged.is_success());

        let bad_status = ApiReply {
            status: 500,
            body: ApiResponse::success(None),
        };
        assert!(!bad_status.is_success());
    }

    #[test]
    fn test_error_or_prefers_server_message() {
        let reply = ApiReply {
            status: 400,
            body: ApiResponse::failure("'Lamp' is out of stock or unavailable."),
        };
        assert_eq!(
            reply.error_or("fallback"),
            "'Lamp' is out of stock or unavailable."
        );

        let blank = ApiReply {
            status: 400,
            body: ApiResponse::failure("  "),
        };
        assert_eq!(blank.error_or("fallback"), "fallback");
    }
}
