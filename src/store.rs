//! Persistent key-value store adapter.
//!
//! A [`Storage`] is a flat map from string keys to text, the way a browser's
//! local storage is. [`Persisted`] layers one typed value on top of one key:
//! it reads the stored text once on construction and writes the serialized
//! value back after every change.

mod memory;
mod persisted;

use thiserror::Error;

pub use memory::MemoryStorage;
pub use persisted::Persisted;

/// Errors raised while reading or writing a storage slot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Text under `key` could not be parsed as the expected type.
    #[error("stored value under `{key}` is malformed: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory value could not be serialized.
    #[error("failed to serialize value for `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The storage medium rejected a read or write.
    #[error("storage backend error: {0}")]
    Backend(#[from] rusqlite::Error),
}

/// A text key-value medium.
///
/// Methods take `&self`; implementations are single-threaded and may use
/// interior mutability.
pub trait Storage {
    /// Returns the text stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous text.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Removing an absent key succeeds.
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}
