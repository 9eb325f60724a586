use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Storage, StoreError};

/// A typed value bound to one storage key.
///
/// On construction the key is read: stored text, if present, is parsed and
/// becomes the value, and the supplied default is never evaluated. Every
/// change made through [`set`](Self::set) or [`update`](Self::update) is
/// serialized and written back under the same key before the call returns.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use marknote::store::{MemoryStorage, Persisted, Storage};
///
/// # fn main() -> Result<(), marknote::store::StoreError> {
/// let storage = Rc::new(MemoryStorage::new());
///
/// let mut counter = Persisted::new(storage.clone(), "COUNTER", 0u32)?;
/// counter.set(5)?;
/// assert_eq!(storage.get_item("COUNTER")?.as_deref(), Some("5"));
///
/// // A fresh cell over the same storage sees the written value.
/// let reloaded = Persisted::new(storage, "COUNTER", 0u32)?;
/// assert_eq!(*reloaded.get(), 5);
/// # Ok(())
/// # }
/// ```
pub struct Persisted<T> {
    storage: Rc<dyn Storage>,
    key: String,
    value: T,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Binds `key`, falling back to `initial` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Malformed`] if stored text does not parse, or a
    /// backend error if the key cannot be read or the value written back.
    pub fn new(
        storage: Rc<dyn Storage>,
        key: impl Into<String>,
        initial: T,
    ) -> Result<Self, StoreError> {
        Self::with_default(storage, key, || initial)
    }

    /// Binds `key`, invoking `default` only when nothing is stored.
    ///
    /// Empty stored text counts as nothing stored.
    pub fn with_default<F>(
        storage: Rc<dyn Storage>,
        key: impl Into<String>,
        default: F,
    ) -> Result<Self, StoreError>
    where
        F: FnOnce() -> T,
    {
        let key = key.into();
        let value = match storage.get_item(&key)? {
            Some(text) if !text.is_empty() => {
                serde_json::from_str(&text).map_err(|source| StoreError::Malformed {
                    key: key.clone(),
                    source,
                })?
            }
            _ => {
                debug!(key = %key, "no stored value, using default");
                default()
            }
        };

        let cell = Self {
            storage,
            key,
            value,
        };
        // The slot holds the current value as soon as the cell exists.
        cell.persist()?;
        Ok(cell)
    }

    /// Returns the current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replaces the value and persists it.
    ///
    /// The in-memory value is replaced even if the write fails.
    pub fn set(&mut self, value: T) -> Result<(), StoreError> {
        self.value = value;
        self.persist()
    }

    /// Replaces the value with `f(current)` and persists it.
    pub fn update<F>(&mut self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.value);
        self.set(next)
    }

    fn persist(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string(&self.value).map_err(|source| StoreError::Serialize {
            key: self.key.clone(),
            source,
        })?;
        self.storage.set_item(&self.key, &text)?;
        debug!(key = %self.key, bytes = text.len(), "persisted value");
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for Persisted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persisted")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}
