// Browser-side page translation: swaps marked page text for the selected
// locale through a /translate endpoint, caches results in durable storage and
// restores the original text when switching back to the source language.

mod escape;
mod exports;

pub mod cache;
pub mod client;
pub mod config;
pub mod document;
pub mod dynamic;
pub mod error;
pub mod html;
pub mod locale;
pub mod logging;
pub mod storage;
pub mod substitution;
pub mod translator;
pub mod transport;
pub mod web;

pub use cache::TranslationCache;
pub use client::TranslationClient;
pub use config::{DomConfig, TranslatorConfig};
pub use document::PageDocument;
pub use dynamic::RefetchHook;
pub use error::TranslateError;
pub use exports::PageTranslatorHandle;
pub use html::HtmlDocument;
pub use locale::{Locale, LocaleState};
pub use storage::{KeyValueStore, LocalStorage, MemoryStore};
pub use transport::{FetchTransport, TextPayload, TranslateRequest, TranslateResponse, Transport};
pub use translator::PageTranslator;
pub use web::WebDocument;
