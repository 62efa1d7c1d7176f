use crate::{check_key, KeyValueStore, StorageError};
use std::collections::BTreeMap;

/// In-process store. `failing()` builds one whose every call errors, for
/// exercising best-effort persistence paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            values: BTreeMap::new(),
            failing: true,
        }
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        check_key(key)?;
        if self.failing {
            return Err(StorageError::Unavailable);
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        check_key(key)?;
        if self.failing {
            return Err(StorageError::Unavailable);
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        check_key(key)?;
        if self.failing {
            return Err(StorageError::Unavailable);
        }
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_store_errors_on_every_call() {
        let mut store = MemoryStore::failing();
        assert!(matches!(store.get("k"), Err(StorageError::Unavailable)));
        assert!(matches!(store.set("k", "v"), Err(StorageError::Unavailable)));
        store.set_failing(false);
        store.set("k", "v").unwrap();
        assert_eq!(store.len(), 1);
    }
}
