// Display-language state: resolution at startup and persistence on change

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::TranslatorConfig;
use crate::storage::KeyValueStore;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Locale(tag.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Primary subtag, lowercased: `ja-JP` -> `ja`.
    pub fn primary(&self) -> String {
        self.0
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Locale::new(tag)
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Locale::new(tag)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Picks the starting locale: stored preference, then browser language, then the fixed fallback.
pub fn resolve_initial(
    stored: Option<&str>,
    browser_language: Option<&str>,
    config: &TranslatorConfig,
) -> Locale {
    if let Some(stored) = stored.map(Locale::from).filter(|l| !l.is_empty()) {
        return stored;
    }
    match browser_language.map(Locale::from).filter(|l| !l.is_empty()) {
        Some(browser) if browser.primary() == config.source_locale.primary() => {
            config.source_locale.clone()
        }
        Some(_) => config.default_target.clone(),
        None => config.fallback_locale.clone(),
    }
}

pub struct LocaleState {
    current: RefCell<Locale>,
    source: Locale,
    store: Rc<dyn KeyValueStore>,
    storage_key: String,
}

impl LocaleState {
    pub fn load(
        store: Rc<dyn KeyValueStore>,
        browser_language: Option<&str>,
        config: &TranslatorConfig,
    ) -> Self {
        let stored = store.get_item(&config.locale_key);
        let current = resolve_initial(stored.as_deref(), browser_language, config);
        Self {
            current: RefCell::new(current),
            source: config.source_locale.clone(),
            store,
            storage_key: config.locale_key.clone(),
        }
    }

    pub fn current(&self) -> Locale {
        self.current.borrow().clone()
    }

    pub fn source(&self) -> &Locale {
        &self.source
    }

    pub fn is_source(&self) -> bool {
        *self.current.borrow() == self.source
    }

    /// Stores the new locale. Returns `false` without touching storage when unchanged.
    pub fn set(&self, locale: Locale) -> bool {
        if *self.current.borrow() == locale {
            return false;
        }
        if let Err(err) = self.store.set_item(&self.storage_key, locale.as_str()) {
            warn!(locale = %locale, error = %err, "failed to persist locale");
        }
        *self.current.borrow_mut() = locale;
        true
    }
}
