//! Cart manager errors.

use thiserror::Error;

/// Errors from the persistent cart store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("Cart store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cart could not be serialized.
    #[error("Cart serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The in-memory store lock was poisoned by a panicking writer.
    #[error("Cart store lock poisoned")]
    Poisoned,
}

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Persisting the cart failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Input rejected before touching the cart.
    #[error("Invalid input: {0}")]
    Invalid(String),
}

/// Result type alias for [`CartError`].
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CartError::Invalid("item id is empty".to_string());
        assert_eq!(err.to_string(), "Invalid input: item id is empty");

        let err = CartError::from(StoreError::Poisoned);
        assert_eq!(err.to_string(), "Store error: Cart store lock poisoned");
    }
}
