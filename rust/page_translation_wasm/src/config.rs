// Translator configuration, supplied from JS as a plain object or as JSON

use serde::{Deserialize, Serialize};

use crate::error::TranslateError;
use crate::locale::Locale;

pub const MAX_EMOTION_LABELS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranslatorConfig {
    pub endpoint: String,
    pub source_locale: Locale,
    /// Locale chosen when the browser reports something other than the source.
    pub default_target: Locale,
    /// Locale used when neither a stored preference nor a browser language exists.
    pub fallback_locale: Locale,
    pub locale_key: String,
    pub cache_key: String,
    pub log_level: String,
    pub dom: DomConfig,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: "/translate".to_string(),
            source_locale: Locale::from("ja"),
            default_target: Locale::from("en"),
            fallback_locale: Locale::from("ja"),
            locale_key: "locale".to_string(),
            cache_key: "translationCache".to_string(),
            log_level: "info".to_string(),
            dom: DomConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomConfig {
    pub translatable_selector: String,
    pub original_text_attr: String,
    pub lang_button_selector: String,
    pub lang_attr: String,
    pub active_class: String,
    pub candidate_selector: String,
    pub original_emotion_attr: String,
    pub emotion_label_ids: Vec<String>,
    pub original_label_attr: String,
    pub card_selector: String,
    pub rating_selector: String,
    pub rating_value_attr: String,
    pub link_selector: String,
    pub rating_label: String,
    pub link_label: String,
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            translatable_selector: "[data-i18n]".to_string(),
            original_text_attr: "data-original-text".to_string(),
            lang_button_selector: ".lang-btn".to_string(),
            lang_attr: "data-lang".to_string(),
            active_class: "active".to_string(),
            candidate_selector: ".candidate-btn".to_string(),
            original_emotion_attr: "data-original-emotion".to_string(),
            emotion_label_ids: (1..=MAX_EMOTION_LABELS)
                .map(|i| format!("emotion-label-{}", i))
                .collect(),
            original_label_attr: "data-original-label".to_string(),
            card_selector: ".recommendation-card".to_string(),
            rating_selector: ".rating".to_string(),
            rating_value_attr: "data-rating-value".to_string(),
            link_selector: ".map-link".to_string(),
            rating_label: "評価".to_string(),
            link_label: "地図で見る".to_string(),
        }
    }
}

impl TranslatorConfig {
    pub fn from_json(json: &str) -> Result<Self, TranslateError> {
        let config: TranslatorConfig =
            serde_json::from_str(json).map_err(|e| TranslateError::Config(e.to_string()))?;
        config.validated()
    }

    pub fn from_js(value: wasm_bindgen::JsValue) -> Result<Self, TranslateError> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        let config: TranslatorConfig = serde_wasm_bindgen::from_value(value)
            .map_err(|e| TranslateError::Config(e.to_string()))?;
        config.validated()
    }

    /// Rejects empty endpoint/locale/key values and caps the emotion-label list.
    pub fn validated(mut self) -> Result<Self, TranslateError> {
        if self.endpoint.trim().is_empty() {
            return Err(TranslateError::Config("endpoint must not be empty".to_string()));
        }
        for (name, locale) in [
            ("sourceLocale", &self.source_locale),
            ("defaultTarget", &self.default_target),
            ("fallbackLocale", &self.fallback_locale),
        ] {
            if locale.is_empty() {
                return Err(TranslateError::Config(format!("{} must not be empty", name)));
            }
        }
        if self.default_target == self.source_locale {
            return Err(TranslateError::Config(
                "defaultTarget must differ from sourceLocale".to_string(),
            ));
        }
        if self.locale_key.is_empty() || self.cache_key.is_empty() {
            return Err(TranslateError::Config("storage keys must not be empty".to_string()));
        }
        self.dom.emotion_label_ids.truncate(MAX_EMOTION_LABELS);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = TranslatorConfig::from_json("{}").unwrap();
        assert_eq!(config.endpoint, "/translate");
        assert_eq!(config.source_locale.as_str(), "ja");
        assert_eq!(config.default_target.as_str(), "en");
        assert_eq!(config.cache_key, "translationCache");
        assert_eq!(config.dom.translatable_selector, "[data-i18n]");
        assert_eq!(config.dom.emotion_label_ids.len(), 3);
    }

    #[test]
    fn blank_locale_is_rejected() {
        assert!(TranslatorConfig::from_json(r#"{"sourceLocale":"  "}"#).is_err());
        assert!(TranslatorConfig::from_json(r#"{"defaultTarget":"\t"}"#).is_err());
    }

    #[test]
    fn locales_are_trimmed_on_load() {
        let config = TranslatorConfig::from_json(r#"{"sourceLocale":"ja ","defaultTarget":" en"}"#).unwrap();
        assert_eq!(config.source_locale, Locale::from("ja"));
        assert_eq!(config.default_target.as_str(), "en");

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""sourceLocale":"ja""#));
    }

    #[test]
    fn padded_target_equal_to_source_is_rejected() {
        assert!(TranslatorConfig::from_json(r#"{"defaultTarget":"ja "}"#).is_err());
    }

    #[test]
    fn camel_case_fields_override_defaults() {
        let config = TranslatorConfig::from_json(
            r#"{"endpoint":"https://api.example.com/translate","defaultTarget":"ko","dom":{"activeClass":"selected"}}"#,
        )
        .unwrap();
        assert_eq!(config.endpoint, "https://api.example.com/translate");
        assert_eq!(config.default_target.as_str(), "ko");
        assert_eq!(config.dom.active_class, "selected");
        assert_eq!(config.dom.lang_attr, "data-lang");
    }

    #[test]
    fn rejects_empty_endpoint() {
        let err = TranslatorConfig::from_json(r#"{"endpoint":"  "}"#).unwrap_err();
        assert!(matches!(err, TranslateError::Config(_)));
    }

    #[test]
    fn rejects_target_equal_to_source() {
        let err = TranslatorConfig::from_json(r#"{"defaultTarget":"ja"}"#).unwrap_err();
        assert!(err.to_string().contains("defaultTarget"));
    }

    #[test]
    fn caps_emotion_labels_at_three() {
        let config = TranslatorConfig::from_json(
            r#"{"dom":{"emotionLabelIds":["a","b","c","d","e"]}}"#,
        )
        .unwrap();
        assert_eq!(config.dom.emotion_label_ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            TranslatorConfig::from_json("not json"),
            Err(TranslateError::Config(_))
        ));
    }
}
