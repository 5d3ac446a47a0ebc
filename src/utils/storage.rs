use std::cell::RefCell;
use std::collections::HashMap;

/// Minimal key-value store handed explicitly to the flows that need
/// persistence, so they stay testable without a browser environment.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage` backed store. Every operation degrades to a no-op
/// when storage is unavailable (private browsing, missing window).
pub struct BrowserStorage;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = local_storage() {
            if storage.set_item(key, value).is_err() {
                log::warn!("failed to persist {} to local storage", key);
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// In-memory store used by tests.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trips() {
        let store = MemoryStorage::default();
        assert_eq!(store.get("k"), None);
        store.set("k", "v");
        assert_eq!(store.get("k"), Some("v".to_string()));
        store.set("k", "w");
        assert_eq!(store.get("k"), Some("w".to_string()));
        store.remove("k");
        assert_eq!(store.get("k"), None);
    }
}
