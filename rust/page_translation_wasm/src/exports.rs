// wasm-bindgen exports: the browser-facing handle around PageTranslator

use std::rc::Rc;

use futures::FutureExt;
use js_sys::{Function, Promise};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};

use crate::config::TranslatorConfig;
use crate::dynamic::RefetchHook;
use crate::error::describe_js;
use crate::logging;
use crate::storage::{KeyValueStore, LocalStorage, MemoryStore};
use crate::transport::FetchTransport;
use crate::translator::PageTranslator;
use crate::web::{browser_language, WebDocument};

type BrowserTranslator = PageTranslator<FetchTransport, WebDocument>;

/// Wraps a JS function; a returned Promise is awaited before the pass continues.
fn js_refetch_hook(function: Function) -> RefetchHook {
    Rc::new(move || {
        let function = function.clone();
        async move {
            match function.call0(&JsValue::NULL) {
                Ok(value) => {
                    if let Ok(promise) = value.dyn_into::<Promise>() {
                        if let Err(err) = JsFuture::from(promise).await {
                            warn!(error = %describe_js(&err), "refetch hook rejected");
                        }
                    }
                }
                Err(err) => warn!(error = %describe_js(&err), "refetch hook threw"),
            }
        }
        .boxed_local()
    })
}

#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
    logging::init_logging(level);
}

#[wasm_bindgen]
pub struct PageTranslatorHandle {
    inner: Rc<BrowserTranslator>,
}

#[wasm_bindgen]
impl PageTranslatorHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, refetch_hook: Option<Function>) -> Result<PageTranslatorHandle, JsValue> {
        let config = TranslatorConfig::from_js(config)?;
        logging::init_logging(&config.log_level);

        let store: Rc<dyn KeyValueStore> = match LocalStorage::from_window() {
            Ok(storage) => Rc::new(storage),
            Err(err) => {
                warn!(error = %err, "localStorage unavailable, translations will not persist");
                Rc::new(MemoryStore::new())
            }
        };
        let document = WebDocument::from_window()?;
        let transport = FetchTransport::new(config.endpoint.clone());
        let language = browser_language();

        let mut translator =
            PageTranslator::new(config, transport, store, document, language.as_deref());
        if let Some(function) = refetch_hook {
            translator = translator.with_refetch_hook(js_refetch_hook(function));
        }
        Ok(PageTranslatorHandle {
            inner: Rc::new(translator),
        })
    }

    #[wasm_bindgen(js_name = currentLocale)]
    pub fn current_locale(&self) -> String {
        self.inner.current_locale().to_string()
    }

    #[wasm_bindgen(js_name = isBusy)]
    pub fn is_busy(&self) -> bool {
        self.inner.is_busy()
    }

    #[wasm_bindgen(js_name = setLocale)]
    pub fn set_locale(&self, locale: String) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            inner.set_locale(locale).await;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn initialize(&self) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            inner.initialize().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = translatePage)]
    pub fn translate_page(&self) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            inner.translate_page().await;
            inner.retranslate_dynamic_content().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn restore(&self) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            inner.restore_original_text();
            inner.restore_dynamic_content().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn translate(&self, text: String) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let translated = inner.translate_text(&text).await;
            Ok(JsValue::from_str(&translated))
        })
    }

    #[wasm_bindgen(js_name = clearCache)]
    pub fn clear_cache(&self) {
        self.inner.clear_cache();
    }

    #[wasm_bindgen(js_name = cachedEntries)]
    pub fn cached_entries(&self) -> usize {
        self.inner.client().cache().len()
    }
}
