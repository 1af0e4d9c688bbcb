//! Platform abstraction layer
//!
//! The simulation core never touches a storage backend directly; it talks to
//! the [`KeyValueStore`] trait and the embedding shell decides what backs it
//! (LocalStorage in the browser, nothing in tests). Backend failures are
//! swallowed by the implementations - a missing or broken store behaves like
//! an empty one.

use std::collections::HashMap;

/// Injected persistent key-value interface
pub trait KeyValueStore {
    /// Read a value, `None` when absent or the backend failed
    fn load(&self, key: &str) -> Option<String>;
    /// Write a value; backend failures are dropped silently
    fn save(&mut self, key: &str, value: &str);
}

/// In-memory store for tests and native runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Absent backing store: loads nothing, drops every write
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl KeyValueStore for NullStore {
    fn load(&self, _key: &str) -> Option<String> {
        None
    }

    fn save(&mut self, _key: &str, _value: &str) {}
}

/// Browser LocalStorage store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn load(&self, key: &str) -> Option<String> {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten();
        storage.and_then(|s| s.get_item(key).ok()).flatten()
    }

    fn save(&mut self, key: &str, value: &str) {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten();
        if let Some(storage) = storage {
            let _ = storage.set_item(key, value);
        }
    }
}
