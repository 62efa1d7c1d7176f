//! Durable per-origin key-value storage.
//!
//! Values are opaque strings. Callers own their own encoding and decide how
//! to degrade when a stored value is missing or corrupt.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unsafe storage key: {0}")]
    UnsafeKey(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable")]
    Unavailable,
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Keys double as file names, so only a conservative alphabet is accepted.
pub fn is_safe_key(key: &str) -> bool {
    if key.is_empty() || key == "." || key == ".." {
        return false;
    }
    key.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
}

pub(crate) fn check_key(key: &str) -> Result<(), StorageError> {
    if is_safe_key(key) {
        Ok(())
    } else {
        Err(StorageError::UnsafeKey(key.to_string()))
    }
}
