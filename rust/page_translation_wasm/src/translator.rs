// Per-page translation context: owns the client, locale state and document,
// and drives the source <-> other locale transitions.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::cache::TranslationCache;
use crate::client::TranslationClient;
use crate::config::TranslatorConfig;
use crate::document::PageDocument;
use crate::dynamic::{DynamicContent, RefetchHook};
use crate::locale::{Locale, LocaleState};
use crate::storage::KeyValueStore;
use crate::substitution;
use crate::transport::Transport;

/// Clears the busy flag when a page pass ends, however it ends.
struct BusyGuard<'a>(&'a Cell<bool>);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct PageTranslator<T, D> {
    config: TranslatorConfig,
    client: TranslationClient<T>,
    locale: LocaleState,
    document: D,
    refetch: Option<RefetchHook>,
    busy: Cell<bool>,
}

impl<T: Transport, D: PageDocument> PageTranslator<T, D> {
    pub fn new(
        config: TranslatorConfig,
        transport: T,
        store: Rc<dyn KeyValueStore>,
        document: D,
        browser_language: Option<&str>,
    ) -> Self {
        let cache = TranslationCache::load(store.clone(), &config.cache_key);
        let locale = LocaleState::load(store, browser_language, &config);
        info!(locale = %locale.current(), cached = cache.len(), "page translator ready");
        Self {
            client: TranslationClient::new(transport, cache),
            locale,
            document,
            refetch: None,
            busy: Cell::new(false),
            config,
        }
    }

    pub fn with_refetch_hook(mut self, hook: RefetchHook) -> Self {
        self.refetch = Some(hook);
        self
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub fn client(&self) -> &TranslationClient<T> {
        &self.client
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn current_locale(&self) -> Locale {
        self.locale.current()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    fn dynamic(&self) -> DynamicContent<'_, D> {
        DynamicContent {
            doc: &self.document,
            dom: &self.config.dom,
            refetch: self.refetch.as_ref(),
        }
    }

    /// Applies the locale resolved at construction to a freshly loaded page.
    pub async fn initialize(&self) {
        let current = self.locale.current();
        self.document.set_document_lang(current.as_str());
        self.update_language_selector();
        if !self.locale.is_source() {
            self.translate_page().await;
            self.retranslate_dynamic_content().await;
        }
    }

    pub async fn set_locale(&self, locale: impl Into<Locale>) {
        let locale = locale.into();
        if locale.is_empty() {
            warn!("ignoring empty locale");
            return;
        }
        if !self.locale.set(locale.clone()) {
            return;
        }
        info!(%locale, "switching display language");
        self.document.set_document_lang(locale.as_str());

        if self.locale.is_source() {
            self.restore_original_text();
            self.restore_dynamic_content().await;
        } else {
            self.translate_page().await;
            self.retranslate_dynamic_content().await;
        }
        self.update_language_selector();
    }

    /// Translates every marked element into the current locale.
    pub async fn translate_page(&self) {
        if self.locale.is_source() {
            return;
        }
        if self.busy.get() {
            debug!("page translation already in progress");
            return;
        }
        self.busy.set(true);
        let _guard = BusyGuard(&self.busy);

        let target = self.locale.current();
        let records = substitution::collect_records(&self.document, &self.config.dom);
        if records.is_empty() {
            return;
        }

        let originals = substitution::originals(&records);
        let translated = self
            .client
            .translate_batch(&originals, self.locale.source(), &target)
            .await;
        let writes = substitution::plan_writes(&substitution::slots(&records), &translated);
        substitution::apply_writes(&self.document, &records, &writes);
        info!(%target, elements = records.len(), "translated page");
    }

    pub fn restore_original_text(&self) {
        let restored = substitution::restore_originals(&self.document, &self.config.dom);
        debug!(elements = restored, "restored original text");
    }

    pub async fn retranslate_dynamic_content(&self) {
        if self.locale.is_source() {
            return;
        }
        let target = self.locale.current();
        self.dynamic()
            .retranslate(&self.client, self.locale.source(), &target)
            .await;
    }

    pub async fn restore_dynamic_content(&self) {
        self.dynamic().restore().await;
    }

    /// Single text into the current locale.
    pub async fn translate_text(&self, text: &str) -> String {
        let target = self.locale.current();
        self.client
            .translate(text, self.locale.source(), &target)
            .await
    }

    pub fn clear_cache(&self) {
        self.client.cache().clear();
        info!("translation cache cleared");
    }

    pub fn update_language_selector(&self) {
        let current = self.locale.current();
        let dom = &self.config.dom;
        for button in self.document.select_all(&dom.lang_button_selector) {
            let active = self.document.attribute(&button, &dom.lang_attr).as_deref()
                == Some(current.as_str());
            self.document.set_class(&button, &dom.active_class, active);
        }
    }
}
