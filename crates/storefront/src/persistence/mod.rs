//! Durable key/value storage for the cart and wishlist.
//!
//! Each collection is stored under its own key as a JSON array holding a
//! full snapshot; every mutation overwrites the whole value. The two keys
//! are independent: there is no transaction spanning them.
//!
//! Reads are forgiving. Missing, unreadable or malformed data loads as an
//! empty collection and never reaches the caller as an error.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage keys.
pub mod keys {
    /// Cart line items (durable).
    pub const CART: &str = "cart";

    /// Wishlist entries (durable).
    pub const WISHLIST: &str = "wishlist";

    /// Pending buy-now item (session storage).
    pub const EXPRESS_CHECKOUT: &str = "express_checkout";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Key contains characters the backend can't store.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// A string key/value store.
pub trait Storage {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend can't be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend can't be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`; deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend can't be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Load the collection stored under `key`.
///
/// Absent, unreadable or unparsable data yields an empty vector.
pub fn load_entries<T, S>(storage: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    load_value::<Vec<T>, S>(storage, key).unwrap_or_default()
}

/// Load a single value stored under `key`, or `None` if absent or malformed.
pub fn load_value<T, S>(storage: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read stored value, treating as empty");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Stored value is malformed, treating as empty");
            None
        }
    }
}

/// Overwrite the collection stored under `key` with a full snapshot.
///
/// Write failures are logged and otherwise ignored.
pub fn save_entries<T, S>(storage: &mut S, key: &str, entries: &[T])
where
    T: Serialize,
    S: Storage + ?Sized,
{
    save_value(storage, key, entries);
}

/// Overwrite the value stored under `key`.
///
/// Write failures are logged and otherwise ignored.
pub fn save_value<T, S>(storage: &mut S, key: &str, value: &T)
where
    T: Serialize + ?Sized,
    S: Storage + ?Sized,
{
    let result = serde_json::to_string(value)
        .map_err(StorageError::from)
        .and_then(|json| storage.set(key, &json));

    if let Err(e) = result {
        tracing::error!(key, error = %e, "Failed to persist value");
    }
}

/// Delete `key`, logging failures.
pub fn clear_value<S>(storage: &mut S, key: &str)
where
    S: Storage + ?Sized,
{
    if let Err(e) = storage.remove(key) {
        tracing::error!(key, error = %e, "Failed to clear stored value");
    }
}
