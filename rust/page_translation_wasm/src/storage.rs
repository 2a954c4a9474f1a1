// Durable string key-value store: browser localStorage or an in-memory map

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{describe_js, TranslateError};

pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), TranslateError>;

    fn remove_item(&self, key: &str) -> Result<(), TranslateError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), TranslateError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), TranslateError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// `window.localStorage`.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn from_window() -> Result<Self, TranslateError> {
        let window = web_sys::window()
            .ok_or_else(|| TranslateError::Storage("no window available".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| TranslateError::Storage(describe_js(&e)))?
            .ok_or_else(|| TranslateError::Storage("localStorage is disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), TranslateError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| TranslateError::Storage(describe_js(&e)))
    }

    fn remove_item(&self, key: &str) -> Result<(), TranslateError> {
        self.storage
            .remove_item(key)
            .map_err(|e| TranslateError::Storage(describe_js(&e)))
    }
}
