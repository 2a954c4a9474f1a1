// Translation cache persisted as one JSON object in the key-value store.
// No eviction: entries live until the cache is cleared.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::TranslateError;
use crate::locale::Locale;
use crate::storage::KeyValueStore;

pub fn get_cache_key(source: &Locale, target: &Locale, text: &str) -> String {
    format!("{}:{}:{}", source, target, text)
}

pub struct TranslationCache {
    entries: RefCell<HashMap<String, String>>,
    store: Rc<dyn KeyValueStore>,
    storage_key: String,
}

impl TranslationCache {
    /// Reads the stored mapping. Missing or malformed data starts an empty cache.
    pub fn load(store: Rc<dyn KeyValueStore>, storage_key: &str) -> Self {
        let entries = match store.get_item(storage_key) {
            Some(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(entries) => {
                    debug!(count = entries.len(), "loaded translation cache");
                    entries
                }
                Err(err) => {
                    warn!(error = %err, "discarding malformed translation cache");
                    HashMap::new()
                }
            },
            None => HashMap::new(),
        };
        Self {
            entries: RefCell::new(entries),
            store,
            storage_key: storage_key.to_string(),
        }
    }

    pub fn get(&self, source: &Locale, target: &Locale, text: &str) -> Option<String> {
        self.entries
            .borrow()
            .get(&get_cache_key(source, target, text))
            .cloned()
    }

    pub fn put(&self, source: &Locale, target: &Locale, text: &str, translated: &str) {
        self.entries
            .borrow_mut()
            .insert(get_cache_key(source, target, text), translated.to_string());
    }

    /// Overwrites the stored mapping with the full in-memory one.
    pub fn flush(&self) -> Result<(), TranslateError> {
        let raw = serde_json::to_string(&*self.entries.borrow())?;
        self.store.set_item(&self.storage_key, &raw)
    }

    /// Like `flush`, but a failed write is only logged.
    pub fn persist(&self) {
        if let Err(err) = self.flush() {
            warn!(error = %err, "failed to persist translation cache");
        }
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn ja() -> Locale {
        Locale::from("ja")
    }

    fn en() -> Locale {
        Locale::from("en")
    }

    #[test]
    fn key_includes_both_locales_and_text() {
        assert_eq!(get_cache_key(&ja(), &en(), "予約する"), "ja:en:予約する");
        assert_ne!(
            get_cache_key(&ja(), &en(), "a"),
            get_cache_key(&ja(), &Locale::from("ko"), "a")
        );
    }

    #[test]
    fn flush_then_load_restores_entries() {
        let store = Rc::new(MemoryStore::new());
        let cache = TranslationCache::load(store.clone(), "translationCache");
        cache.put(&ja(), &en(), "予約する", "Book Now");
        cache.flush().unwrap();

        let reloaded = TranslationCache::load(store, "translationCache");
        assert_eq!(reloaded.get(&ja(), &en(), "予約する").as_deref(), Some("Book Now"));
        assert_eq!(reloaded.get(&ja(), &Locale::from("ko"), "予約する"), None);
    }

    #[test]
    fn malformed_storage_is_treated_as_empty() {
        let store = Rc::new(MemoryStore::new());
        store.set_item("translationCache", "{not json").unwrap();
        let cache = TranslationCache::load(store.clone(), "translationCache");
        assert!(cache.is_empty());

        store.set_item("translationCache", "[1,2,3]").unwrap();
        assert!(TranslationCache::load(store, "translationCache").is_empty());
    }

    #[test]
    fn last_write_wins() {
        let store = Rc::new(MemoryStore::new());
        let cache = TranslationCache::load(store, "translationCache");
        cache.put(&ja(), &en(), "猫", "cat");
        cache.put(&ja(), &en(), "猫", "Cat");
        assert_eq!(cache.get(&ja(), &en(), "猫").as_deref(), Some("Cat"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_empties_and_persists() {
        let store = Rc::new(MemoryStore::new());
        let cache = TranslationCache::load(store.clone(), "translationCache");
        cache.put(&ja(), &en(), "猫", "cat");
        cache.persist();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(store.get_item("translationCache").as_deref(), Some("{}"));
    }
}
