//! In-memory policy store

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use super::{PolicyStore, StoreValue, display_path, validate_segment};
use crate::error::StoreError;

type Values = BTreeMap<String, StoreValue>;

/// Map-backed store for tests and dry runs.
///
/// Keys are addressed by their display path. Creating `a\b` also creates `a`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    keys: RwLock<HashMap<String, Values>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, creating the key and its parents.
    pub fn with_value(self, path: &[&str], name: &str, value: StoreValue) -> Self {
        {
            let mut keys = self.keys.write().unwrap_or_else(|e| e.into_inner());
            for depth in 1..=path.len() {
                keys.entry(display_path(&path[..depth])).or_default();
            }
            keys.entry(display_path(path))
                .or_default()
                .insert(name.to_string(), value);
        }
        self
    }

    /// Read a value directly, bypassing handles.
    pub fn value(&self, path: &[&str], name: &str) -> Option<StoreValue> {
        let keys = self.keys.read().unwrap_or_else(|e| e.into_inner());
        keys.get(&display_path(path))
            .and_then(|values| values.get(name))
            .cloned()
    }

    pub fn contains_key(&self, path: &[&str]) -> bool {
        let keys = self.keys.read().unwrap_or_else(|e| e.into_inner());
        keys.contains_key(&display_path(path))
    }

    pub fn key_count(&self) -> usize {
        let keys = self.keys.read().unwrap_or_else(|e| e.into_inner());
        keys.len()
    }
}

impl PolicyStore for MemoryStore {
    type Handle = String;

    fn open_or_create(&self, path: &[&str]) -> Result<String, StoreError> {
        for segment in path {
            validate_segment(segment)?;
        }
        let mut keys = self.keys.write().unwrap_or_else(|e| e.into_inner());
        for depth in 1..=path.len() {
            keys.entry(display_path(&path[..depth])).or_default();
        }
        Ok(display_path(path))
    }

    fn open_existing(&self, path: &[&str]) -> Result<Option<String>, StoreError> {
        for segment in path {
            validate_segment(segment)?;
        }
        let key = display_path(path);
        let keys = self.keys.read().unwrap_or_else(|e| e.into_inner());
        Ok(keys.contains_key(&key).then_some(key))
    }

    fn get(&self, handle: &String, name: &str) -> Result<Option<StoreValue>, StoreError> {
        let keys = self.keys.read().unwrap_or_else(|e| e.into_inner());
        Ok(keys.get(handle).and_then(|values| values.get(name)).cloned())
    }

    fn set(&self, handle: &String, name: &str, value: StoreValue) -> Result<(), StoreError> {
        let mut keys = self.keys.write().unwrap_or_else(|e| e.into_inner());
        keys.entry(handle.clone())
            .or_default()
            .insert(name.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_or_create_creates_parent_levels() {
        let store = MemoryStore::new();
        let handle = store.open_or_create(&["Software", "Vendor", "Product"]).unwrap();

        assert_eq!(handle, r"Software\Vendor\Product");
        assert!(store.contains_key(&["Software"]));
        assert!(store.contains_key(&["Software", "Vendor"]));
        assert_eq!(store.key_count(), 3);
    }

    #[test]
    fn open_or_create_is_idempotent() {
        let store = MemoryStore::new();
        store.open_or_create(&["a", "b"]).unwrap();
        store.open_or_create(&["a", "b"]).unwrap();
        assert_eq!(store.key_count(), 2);
    }

    #[test]
    fn open_existing_does_not_create() {
        let store = MemoryStore::new();
        assert!(store.open_existing(&["a", "b"]).unwrap().is_none());
        assert_eq!(store.key_count(), 0);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let store = MemoryStore::new();
        let handle = store.open_or_create(&["k"]).unwrap();
        store
            .set(&handle, "v", StoreValue::String("one".into()))
            .unwrap();
        store
            .set(&handle, "v", StoreValue::MultiString(vec!["two".into()]))
            .unwrap();

        assert_eq!(
            store.get(&handle, "v").unwrap(),
            Some(StoreValue::MultiString(vec!["two".into()]))
        );
    }

    #[test]
    fn get_missing_value_is_none() {
        let store = MemoryStore::new();
        let handle = store.open_or_create(&["k"]).unwrap();
        assert!(store.get(&handle, "missing").unwrap().is_none());
    }
}
