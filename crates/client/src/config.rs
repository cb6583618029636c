//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MARKET_BASE_URL` - Marketplace server URL (e.g. `http://127.0.0.1:5000`)
//!
//! ## Optional
//! - `MARKET_PROFILE_DIR` - Directory holding the persisted cart (default: `.market-profile`)
//! - `MARKET_TOAST_MS` - Toast lifetime in milliseconds (default: 3000)
//! - `MARKET_RELOAD_DELAY_MS` - Delay before a page reload (default: 1500)
//! - `MARKET_REDIRECT_DELAY_MS` - Delay before leaving checkout for the orders page (default: 1500)
//! - `MARKET_PAYMENT_MODE` - Payment flag sent with orders, `COD` or `none` (default: `COD`)
//! - `MARKET_RELOAD_ON_CHECKOUT_FAILURE` - Reload after a rejected order (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use campus_market_core::PaymentMode;
use thiserror::Error;
use url::Url;

use crate::toast::DEFAULT_TOAST_DURATION;

const DEFAULT_PROFILE_DIR: &str = ".market-profile";
const DEFAULT_DELAY_MS: u64 = 1500;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Timers used by toasts and page transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiTiming {
    /// How long each toast stays visible
    pub toast_duration: Duration,
    /// Delay before reloading the current page
    pub reload_delay: Duration,
    /// Delay before navigating to the orders page after checkout
    pub redirect_delay: Duration,
}

impl Default for UiTiming {
    fn default() -> Self {
        Self {
            toast_duration: DEFAULT_TOAST_DURATION,
            reload_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            redirect_delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

/// Checkout request options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutOptions {
    /// Payment flag sent with the order, omitted when `None`
    pub payment_mode: Option<PaymentMode>,
    /// Reload after the server rejects an order, to pick up fresh stock
    pub reload_on_failure: bool,
}

impl Default for CheckoutOptions {
    fn default() -> Self {
        Self {
            payment_mode: Some(PaymentMode::Cod),
            reload_on_failure: true,
        }
    }
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Marketplace server base URL
    pub base_url: Url,
    /// Directory for the persisted cart
    pub profile_dir: PathBuf,
    /// Toast and page transition timers
    pub timing: UiTiming,
    /// Checkout request options
    pub checkout: CheckoutOptions,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_base_url("MARKET_BASE_URL", &get_required_env("MARKET_BASE_URL")?)?;
        let profile_dir =
            PathBuf::from(get_env_or_default("MARKET_PROFILE_DIR", DEFAULT_PROFILE_DIR));

        let timing = UiTiming {
            toast_duration: parse_millis(
                "MARKET_TOAST_MS",
                get_optional_env("MARKET_TOAST_MS"),
                DEFAULT_TOAST_DURATION,
            )?,
            reload_delay: parse_millis(
                "MARKET_RELOAD_DELAY_MS",
                get_optional_env("MARKET_RELOAD_DELAY_MS"),
                Duration::from_millis(DEFAULT_DELAY_MS),
            )?,
            redirect_delay: parse_millis(
                "MARKET_REDIRECT_DELAY_MS",
                get_optional_env("MARKET_REDIRECT_DELAY_MS"),
                Duration::from_millis(DEFAULT_DELAY_MS),
            )?,
        };

        let checkout = CheckoutOptions {
            payment_mode: parse_payment_mode(
                "MARKET_PAYMENT_MODE",
                get_optional_env("MARKET_PAYMENT_MODE"),
            )?,
            reload_on_failure: parse_bool(
                "MARKET_RELOAD_ON_CHECKOUT_FAILURE",
                get_optional_env("MARKET_RELOAD_ON_CHECKOUT_FAILURE"),
                true,
            )?,
        };

        Ok(Self {
            base_url,
            profile_dir,
            timing,
            checkout,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "URL cannot be used as a base".to_string(),
        ));
    }
    Ok(url)
}

fn parse_millis(
    key: &str,
    value: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    value.map_or(Ok(default), |v| {
        v.trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

fn parse_bool(key: &str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(v) = value else {
        return Ok(default);
    };
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got {other:?}"),
        )),
    }
}

fn parse_payment_mode(
    key: &str,
    value: Option<String>,
) -> Result<Option<PaymentMode>, ConfigError> {
    match value.as_deref().map(str::trim) {
        None => Ok(Some(PaymentMode::Cod)),
        Some(v) if v.eq_ignore_ascii_case("none") => Ok(None),
        Some(v) => v
            .parse::<PaymentMode>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_millis() {
        let default = Duration::from_millis(3000);
        assert_eq!(parse_millis("K", None, default).ok(), Some(default));
        assert_eq!(
            parse_millis("K", Some("2500".into()), default).ok(),
            Some(Duration::from_millis(2500))
        );
        assert!(matches!(
            parse_millis("K", Some("soon".into()), default),
            Err(ConfigError::InvalidEnvVar(..))
        ));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("K", None, true).ok(), Some(true));
        assert_eq!(parse_bool("K", Some("off".into()), true).ok(), Some(false));
        assert_eq!(parse_bool("K", Some("YES".into()), false).ok(), Some(true));
        assert!(parse_bool("K", Some("maybe".into()), false).is_err());
    }

    #[test]
    fn test_parse_payment_mode() {
        assert_eq!(parse_payment_mode("K", None).ok(), Some(Some(PaymentMode::Cod)));
        assert_eq!(parse_payment_mode("K", Some("none".into())).ok(), Some(None));
        assert_eq!(
            parse_payment_mode("K", Some("cod".into())).ok(),
            Some(Some(PaymentMode::Cod))
        );
        assert!(parse_payment_mode("K", Some("card".into())).is_err());
    }

    #[test]
    fn test_parse_base_url() {
        assert!(parse_base_url("K", "http://127.0.0.1:5000").is_ok());
        assert!(parse_base_url("K", "not a url").is_err());
        assert!(parse_base_url("K", "mailto:market@example.com").is_err());
    }

    #[test]
    fn test_default_timing() {
        let timing = UiTiming::default();
        assert_eq!(timing.toast_duration, Duration::from_millis(3000));
        assert_eq!(timing.reload_delay, Duration::from_millis(1500));
    }
}
