// Second pass over content rendered after load: candidate buttons, emotion
// labels and recommendation cards. Elements are handled one at a time so at
// most one request is in flight.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use tracing::debug;

use crate::client::TranslationClient;
use crate::config::DomConfig;
use crate::document::PageDocument;
use crate::locale::Locale;
use crate::transport::Transport;

/// Re-renders recommendation cards for the active locale. Owned by the host page.
pub type RefetchHook = Rc<dyn Fn() -> LocalBoxFuture<'static, ()>>;

pub fn rating_text(label: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => format!("{}: {}", label, value),
        None => label.to_string(),
    }
}

pub struct DynamicContent<'a, D> {
    pub doc: &'a D,
    pub dom: &'a DomConfig,
    pub refetch: Option<&'a RefetchHook>,
}

impl<'a, D: PageDocument> DynamicContent<'a, D> {
    pub async fn retranslate<T: Transport>(
        &self,
        client: &TranslationClient<T>,
        source: &Locale,
        target: &Locale,
    ) {
        self.translate_candidates(client, source, target).await;
        self.translate_emotion_labels(client, source, target).await;
        self.translate_cards(client, source, target).await;
    }

    pub async fn restore(&self) {
        self.restore_candidates();
        self.restore_emotion_labels();
        self.restore_cards().await;
    }

    fn emotion_labels(&self) -> Vec<D::Element> {
        self.dom
            .emotion_label_ids
            .iter()
            .filter_map(|id| self.doc.element_by_id(id))
            .collect()
    }

    async fn translate_candidates<T: Transport>(
        &self,
        client: &TranslationClient<T>,
        source: &Locale,
        target: &Locale,
    ) {
        for button in self.doc.select_all(&self.dom.candidate_selector) {
            if let Some(original) = self.doc.attribute(&button, &self.dom.original_emotion_attr) {
                let translated = client.translate(&original, source, target).await;
                self.doc.set_text_content(&button, &translated);
            }
        }
    }

    async fn translate_emotion_labels<T: Transport>(
        &self,
        client: &TranslationClient<T>,
        source: &Locale,
        target: &Locale,
    ) {
        for label in self.emotion_labels() {
            if let Some(original) = self.doc.attribute(&label, &self.dom.original_label_attr) {
                let translated = client.translate(&original, source, target).await;
                self.doc.set_text_content(&label, &translated);
            }
        }
    }

    async fn translate_cards<T: Transport>(
        &self,
        client: &TranslationClient<T>,
        source: &Locale,
        target: &Locale,
    ) {
        if let Some(refetch) = self.refetch {
            debug!(%target, "delegating recommendation cards to refetch hook");
            refetch().await;
            return;
        }

        let cards = self.doc.select_all(&self.dom.card_selector);
        if cards.is_empty() {
            return;
        }
        let rating_label = client.translate(&self.dom.rating_label, source, target).await;

        for card in cards {
            if let Some(rating) = self.doc.select_within(&card, &self.dom.rating_selector) {
                let value = self.doc.attribute(&rating, &self.dom.rating_value_attr);
                self.doc
                    .set_text_content(&rating, &rating_text(&rating_label, value.as_deref()));
            }
            if let Some(link) = self.doc.select_within(&card, &self.dom.link_selector) {
                let original = self
                    .doc
                    .attribute(&link, &self.dom.original_text_attr)
                    .unwrap_or_else(|| self.dom.link_label.clone());
                let translated = client.translate(&original, source, target).await;
                self.doc.set_text_content(&link, &translated);
            }
        }
    }

    fn restore_candidates(&self) {
        for button in self.doc.select_all(&self.dom.candidate_selector) {
            if let Some(original) = self.doc.attribute(&button, &self.dom.original_emotion_attr) {
                self.doc.set_text_content(&button, &original);
            }
        }
    }

    fn restore_emotion_labels(&self) {
        for label in self.emotion_labels() {
            if let Some(original) = self.doc.attribute(&label, &self.dom.original_label_attr) {
                self.doc.set_text_content(&label, &original);
            }
        }
    }

    async fn restore_cards(&self) {
        if let Some(refetch) = self.refetch {
            debug!("refetching recommendation cards in source language");
            refetch().await;
            return;
        }

        for card in self.doc.select_all(&self.dom.card_selector) {
            if let Some(rating) = self.doc.select_within(&card, &self.dom.rating_selector) {
                let value = self.doc.attribute(&rating, &self.dom.rating_value_attr);
                self.doc
                    .set_text_content(&rating, &rating_text(&self.dom.rating_label, value.as_deref()));
            }
            if let Some(link) = self.doc.select_within(&card, &self.dom.link_selector) {
                let original = self
                    .doc
                    .attribute(&link, &self.dom.original_text_attr)
                    .unwrap_or_else(|| self.dom.link_label.clone());
                self.doc.set_text_content(&link, &original);
            }
        }
    }
}
