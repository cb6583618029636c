//! Command implementations and shared wiring.

pub mod cart;
pub mod checkout;
pub mod orders;

use campus_market_client::{
    ApiError, CartError, CartManager, Checkout, ClientConfig, ConfigError, Dispatcher,
    FileCartStore, MarketClient, StoreError,
};
use campus_market_core::PriceError;
use thiserror::Error;

use crate::render::StdinConfirm;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The cart store could not be opened.
    #[error("Cart store error: {0}")]
    Store(#[from] StoreError),

    /// A cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// The HTTP client could not be created.
    #[error("Marketplace client error: {0}")]
    Api(#[from] ApiError),

    /// A price argument was rejected.
    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),
}

/// Dispatcher wired to the file store, the HTTP client and stdin prompts.
pub type AppDispatcher = Dispatcher<FileCartStore, MarketClient, StdinConfirm>;

/// Build the dispatcher from configuration.
///
/// # Errors
///
/// Returns error if the profile directory or HTTP client cannot be set up.
pub fn build_dispatcher(
    config: &ClientConfig,
    assume_yes: bool,
) -> Result<AppDispatcher, CliError> {
    let store = FileCartStore::open(&config.profile_dir)?;
    let client = MarketClient::new(&config.base_url)?;

    tracing::debug!(
        profile = %config.profile_dir.display(),
        base_url = %config.base_url,
        "Dispatcher ready"
    );

    Ok(Dispatcher::new(
        CartManager::new(store, config.timing),
        Checkout::new(client, config.checkout, config.timing),
        StdinConfirm { assume_yes },
    ))
}
