// Translation client: cache lookup, remote call, and fallback to the original text

use tracing::{debug, warn};

use crate::cache::TranslationCache;
use crate::locale::Locale;
use crate::transport::{TextPayload, TranslateRequest, Transport};

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

pub struct TranslationClient<T> {
    transport: T,
    cache: TranslationCache,
}

impl<T: Transport> TranslationClient<T> {
    pub fn new(transport: T, cache: TranslationCache) -> Self {
        Self { transport, cache }
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Translates one string. Any failure returns `text` unchanged.
    pub async fn translate(&self, text: &str, source: &Locale, target: &Locale) -> String {
        if target == source || is_blank(text) {
            return text.to_string();
        }
        if let Some(hit) = self.cache.get(source, target, text) {
            return hit;
        }

        let request = TranslateRequest {
            text: TextPayload::Single(text.to_string()),
            source: source.clone(),
            target: target.clone(),
        };
        let result = match self.transport.post_translate(request).await {
            Ok(response) => response.into_single(),
            Err(err) => Err(err),
        };

        match result {
            Ok(translated) => {
                self.cache.put(source, target, text, &translated);
                self.cache.persist();
                translated
            }
            Err(err) => {
                warn!(%source, %target, error = %err, "translation failed, keeping original text");
                text.to_string()
            }
        }
    }

    /// Translates many strings with at most one request for the uncached ones.
    /// On failure the whole input comes back untouched, cached entries included.
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source: &Locale,
        target: &Locale,
    ) -> Vec<String> {
        if target == source {
            return texts.to_vec();
        }

        let mut results: Vec<String> = Vec::with_capacity(texts.len());
        let mut pending_indices: Vec<usize> = Vec::new();
        let mut pending_texts: Vec<String> = Vec::new();

        for (index, text) in texts.iter().enumerate() {
            if is_blank(text) {
                results.push(text.clone());
            } else if let Some(hit) = self.cache.get(source, target, text) {
                results.push(hit);
            } else {
                results.push(text.clone());
                pending_indices.push(index);
                pending_texts.push(text.clone());
            }
        }

        if pending_texts.is_empty() {
            return results;
        }

        debug!(%source, %target, total = texts.len(), uncached = pending_texts.len(), "requesting batch translation");

        let expected = pending_texts.len();
        let request = TranslateRequest {
            text: TextPayload::Batch(pending_texts),
            source: source.clone(),
            target: target.clone(),
        };
        let translated = match self.transport.post_translate(request).await {
            Ok(response) => response.into_batch(expected),
            Err(err) => Err(err),
        };

        match translated {
            Ok(translated) => {
                for (index, value) in pending_indices.into_iter().zip(translated) {
                    self.cache.put(source, target, &texts[index], &value);
                    results[index] = value;
                }
                self.cache.persist();
                results
            }
            Err(err) => {
                warn!(%source, %target, count = texts.len(), error = %err, "batch translation failed, keeping original texts");
                texts.to_vec()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use futures::executor::block_on;
    use futures::future::LocalBoxFuture;

    use crate::error::TranslateError;
    use crate::storage::{KeyValueStore, MemoryStore};
    use crate::transport::TranslateResponse;

    /// Replays scripted responses in order and records every request it sees.
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        pub(crate) requests: RefCell<Vec<TranslateRequest>>,
        replies: RefCell<VecDeque<Result<TranslateResponse, TranslateError>>>,
    }

    impl ScriptedTransport {
        pub(crate) fn reply_batch(&self, texts: &[&str]) {
            self.replies.borrow_mut().push_back(Ok(TranslateResponse {
                translated: TextPayload::Batch(texts.iter().map(|t| t.to_string()).collect()),
            }));
        }

        pub(crate) fn reply_single(&self, text: &str) {
            self.replies.borrow_mut().push_back(Ok(TranslateResponse {
                translated: TextPayload::Single(text.to_string()),
            }));
        }

        pub(crate) fn fail(&self, status: u16) {
            self.replies
                .borrow_mut()
                .push_back(Err(TranslateError::Status(status)));
        }

        pub(crate) fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Transport for ScriptedTransport {
        fn post_translate(
            &self,
            request: TranslateRequest,
        ) -> LocalBoxFuture<'_, Result<TranslateResponse, TranslateError>> {
            self.requests.borrow_mut().push(request);
            let reply = self
                .replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TranslateError::Network("no scripted reply".to_string())));
            Box::pin(async move { reply })
        }
    }

    fn client() -> (TranslationClient<ScriptedTransport>, Rc<MemoryStore>) {
        let store = Rc::new(MemoryStore::new());
        let cache = TranslationCache::load(store.clone(), "translationCache");
        (TranslationClient::new(ScriptedTransport::default(), cache), store)
    }

    fn ja() -> Locale {
        Locale::from("ja")
    }

    fn en() -> Locale {
        Locale::from("en")
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn same_locale_passes_through_without_requests() {
        let (client, _) = client();
        assert_eq!(block_on(client.translate("猫", &ja(), &ja())), "猫");
        assert_eq!(
            block_on(client.translate_batch(&strings(&["猫", "犬"]), &ja(), &ja())),
            strings(&["猫", "犬"])
        );
        assert_eq!(client.transport().request_count(), 0);
    }

    #[test]
    fn blank_text_is_never_sent() {
        let (client, _) = client();
        assert_eq!(block_on(client.translate("   ", &ja(), &en())), "   ");
        assert_eq!(block_on(client.translate("", &ja(), &en())), "");
        assert_eq!(
            block_on(client.translate_batch(&strings(&["", " \n"]), &ja(), &en())),
            strings(&["", " \n"])
        );
        assert_eq!(client.transport().request_count(), 0);
    }

    #[test]
    fn single_translation_is_cached_and_persisted() {
        let (client, store) = client();
        client.transport().reply_single("cat");

        assert_eq!(block_on(client.translate("猫", &ja(), &en())), "cat");
        assert_eq!(block_on(client.translate("猫", &ja(), &en())), "cat");
        assert_eq!(client.transport().request_count(), 1);

        let sent = &client.transport().requests.borrow()[0];
        assert_eq!(sent.text, TextPayload::Single("猫".to_string()));
        assert!(store.get_item("translationCache").unwrap().contains("ja:en:猫"));
    }

    #[test]
    fn single_failure_returns_original() {
        let (client, _) = client();
        client.transport().fail(500);
        assert_eq!(block_on(client.translate("猫", &ja(), &en())), "猫");
        assert!(client.cache().is_empty());
    }

    #[test]
    fn batch_sends_only_uncached_and_preserves_positions() {
        let (client, _) = client();
        client.cache().put(&ja(), &en(), "b", "B");
        client.transport().reply_batch(&["A", "C"]);

        let out = block_on(client.translate_batch(&strings(&["a", "b", "c"]), &ja(), &en()));
        assert_eq!(out, strings(&["A", "B", "C"]));

        let requests = client.transport().requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].text, TextPayload::Batch(strings(&["a", "c"])));
    }

    #[test]
    fn fully_cached_batch_makes_no_request() {
        let (client, _) = client();
        client.cache().put(&ja(), &en(), "a", "A");
        let out = block_on(client.translate_batch(&strings(&["a", "a"]), &ja(), &en()));
        assert_eq!(out, strings(&["A", "A"]));
        assert_eq!(client.transport().request_count(), 0);
    }

    #[test]
    fn batch_failure_returns_original_input_even_for_cached_entries() {
        let (client, _) = client();
        client.cache().put(&ja(), &en(), "x", "X");
        client.transport().fail(503);

        let out = block_on(client.translate_batch(&strings(&["x", "y"]), &ja(), &en()));
        assert_eq!(out, strings(&["x", "y"]));
    }

    #[test]
    fn short_batch_response_is_treated_as_failure() {
        let (client, _) = client();
        client.transport().reply_batch(&["A"]);
        let out = block_on(client.translate_batch(&strings(&["a", "b"]), &ja(), &en()));
        assert_eq!(out, strings(&["a", "b"]));
        assert!(client.cache().is_empty());
    }

    #[test]
    fn duplicate_texts_are_both_sent() {
        let (client, store) = client();
        client.transport().reply_batch(&["Cat", "Cat"]);
        let out = block_on(client.translate_batch(&strings(&["猫", "猫"]), &ja(), &en()));
        assert_eq!(out, strings(&["Cat", "Cat"]));
        assert_eq!(
            client.transport().requests.borrow()[0].text,
            TextPayload::Batch(strings(&["猫", "猫"]))
        );
        assert_eq!(client.cache().len(), 1);
        assert!(store.get_item("translationCache").is_some());
    }
}
