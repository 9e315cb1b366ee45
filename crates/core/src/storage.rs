//! Persistent store adapter.
//!
//! Wraps a string key/value [`Storage`] backend (the visitor's local storage)
//! with JSON encoding and shape validation. Persistence is best effort:
//!
//! - `load` deletes any key whose value fails to parse or validate and returns
//!   `None`, so callers fall back to defaults.
//! - `save` logs write failures and carries on.
//!
//! Card numbers and CVVs are never written: the checkout payment secrets are
//! `SecretString`s with no serde support, and the persisted checkout shapes in
//! [`crate::checkout`] do not carry them.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::cart::{Cart, CartLineItem};

/// Storage keys.
pub mod keys {
    /// Cart line items.
    pub const CART_ITEMS: &str = "devico-cart-items";

    /// Checkout customer information.
    pub const CHECKOUT_CUSTOMER: &str = "devico-checkout-customer";

    /// Checkout shipping and billing addresses.
    pub const CHECKOUT_ADDRESSES: &str = "devico-checkout-addresses";

    /// Checkout preferences (same-as-shipping flag, shipping method,
    /// cardholder name).
    pub const CHECKOUT_PREFERENCES: &str = "devico-checkout-preferences";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The write would exceed the backend's capacity.
    #[error("storage quota exceeded writing {key} ({needed} bytes, {available} available)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },
    /// The backend cannot be used at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A string key/value store with local-storage semantics.
pub trait Storage {
    /// Read the raw value for a key.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Write the raw value for a key.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend refuses the write.
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn remove_item(&mut self, key: &str);
}

/// In-memory [`Storage`] backend with an optional byte quota.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    #[must_use]
    pub const fn from_entries(entries: BTreeMap<String, String>) -> Self {
        Self {
            entries,
            quota_bytes: None,
        }
    }

    /// Limit total key + value bytes.
    #[must_use]
    pub const fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    /// Raw entries, for handing back to the session layer.
    #[must_use]
    pub const fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Consume the store and return its entries.
    #[must_use]
    pub fn into_entries(self) -> BTreeMap<String, String> {
        self.entries
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        if let Some(quota) = self.quota_bytes {
            let available = quota.saturating_sub(self.used_bytes_excluding(key));
            let needed = key.len() + value.len();
            if needed > available {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available,
                });
            }
        }
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// A value that can be written to and read back from the persistent store.
///
/// Deserialization enforces field presence and types; `is_valid` layers value
/// invariants on top.
pub trait Persisted: Serialize + DeserializeOwned {
    /// Check value invariants after a successful parse.
    fn is_valid(&self) -> bool {
        true
    }
}

impl Persisted for Vec<CartLineItem> {
    fn is_valid(&self) -> bool {
        self.iter().all(CartLineItem::is_valid)
    }
}

/// JSON-encoding, self-healing adapter over a [`Storage`] backend.
#[derive(Debug, Clone, Default)]
pub struct PersistentStore<S> {
    storage: S,
}

impl<S: Storage> PersistentStore<S> {
    /// Wrap a storage backend.
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Borrow the backend.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Unwrap the backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Load and validate a value.
    ///
    /// Returns `None` when the key is missing. When the stored text is not
    /// valid JSON, does not match the expected shape, or fails
    /// [`Persisted::is_valid`], the key is deleted and `None` is returned.
    pub fn load<T: Persisted>(&mut self, key: &str) -> Option<T> {
        let raw = self.storage.get_item(key)?;

        match serde_json::from_str::<T>(&raw) {
            Ok(value) if value.is_valid() => Some(value),
            Ok(_) => {
                tracing::warn!(key, "Discarding persisted value that failed validation");
                self.storage.remove_item(key);
                None
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unreadable persisted value");
                self.storage.remove_item(key);
                None
            }
        }
    }

    /// Serialize and write a value. Failures are logged and swallowed.
    pub fn save<T: Persisted>(&mut self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to serialize value for storage");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(key, json) {
            tracing::warn!(key, error = %e, "Failed to write to storage");
        }
    }

    /// Delete a key.
    pub fn remove(&mut self, key: &str) {
        self.storage.remove_item(key);
    }

    /// Load the cart, falling back to an empty cart.
    pub fn load_cart(&mut self) -> Cart {
        self.load::<Vec<CartLineItem>>(keys::CART_ITEMS)
            .map(Cart::from_items)
            .unwrap_or_default()
    }

    /// Mirror the cart to storage.
    pub fn save_cart(&mut self, cart: &Cart) {
        self.save(keys::CART_ITEMS, &cart.items().to_vec());
    }
}
