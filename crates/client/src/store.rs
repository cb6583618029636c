//! Persistent cart storage.
//!
//! The cart is stored per browser profile under the key `cart` as a JSON
//! array of line items. Reads never fail: a missing or malformed record is
//! an empty cart. Writes replace the whole record (last write wins, no
//! merge), which is also the behaviour across concurrent tabs.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use campus_market_core::Cart;
use tracing::{debug, warn};

use crate::error::StoreError;

/// Storage key of the persisted cart record.
pub const CART_KEY: &str = "cart";

/// Durable, synchronous access to the cart.
pub trait CartStore {
    /// Return the persisted cart, or an empty cart if none exists or the
    /// stored value is malformed.
    fn load(&self) -> Cart;

    /// Persist the full cart, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written.
    fn save(&self, cart: &Cart) -> Result<(), StoreError>;

    /// Remove the persisted cart. Subsequent loads return an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be removed.
    fn clear(&self) -> Result<(), StoreError>;
}

impl<S: CartStore + ?Sized> CartStore for Arc<S> {
    fn load(&self) -> Cart {
        (**self).load()
    }

    fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        (**self).save(cart)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

impl<S: CartStore + ?Sized> CartStore for &S {
    fn load(&self) -> Cart {
        (**self).load()
    }

    fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        (**self).save(cart)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

// =============================================================================
// File Store
// =============================================================================

/// Cart store backed by a JSON file inside a profile directory.
#[derive(Debug, Clone)]
pub struct FileCartStore {
    path: PathBuf,
}

impl FileCartStore {
    /// Open the store for a profile directory, creating the directory and an
    /// empty cart record if they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the initial record cannot be
    /// created.
    pub fn open(profile_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let profile_dir = profile_dir.as_ref();
        fs::create_dir_all(profile_dir)?;

        let store = Self {
            path: profile_dir.join(format!("{CART_KEY}.json")),
        };

        if !store.path.exists() {
            debug!(path = %store.path.display(), "Initializing empty cart");
            store.save(&Cart::new())?;
        }

        Ok(store)
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl CartStore for FileCartStore {
    fn load(&self) -> Cart {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let cart = Cart::from_json_lenient(&raw);
                if cart.is_empty() && !raw.trim().is_empty() && raw.trim() != "[]" {
                    warn!(path = %self.path.display(), "Discarding malformed cart record");
                }
                cart
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Cart::new(),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read cart, treating as empty"
                );
                Cart::new()
            }
        }
    }

    fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        let json = cart.to_json()?;
        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(lines = cart.distinct_count(), "Cart saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory cart store holding the serialized record.
///
/// Keeps the raw string rather than a [`Cart`] so the same parse path as the
/// file store is exercised, including recovery from malformed records.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    raw: RwLock<Option<String>>,
}

impl MemoryCartStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a raw record.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RwLock::new(Some(raw.into())),
        }
    }

    /// Create a store seeded with a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be serialized.
    pub fn with_cart(cart: &Cart) -> Result<Self, StoreError> {
        Ok(Self::with_raw(cart.to_json()?))
    }

    /// The raw persisted record, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.raw.read().ok().and_then(|r| r.clone())
    }
}

impl CartStore for MemoryCartStore {
    fn load(&self) -> Cart {
        self.raw
            .read()
            .ok()
            .and_then(|r| r.as_deref().map(Cart::from_json_lenient))
            .unwrap_or_default()
    }

    fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        let json = cart.to_json()?;
        let mut raw = self.raw.write().map_err(|_| StoreError::Poisoned)?;
        *raw = Some(json);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut raw = self.raw.write().map_err(|_| StoreError::Poisoned)?;
        *raw = None;
        Ok(())
    }
}
