// Error type shared by the transport, storage and configuration layers.
// Translation operations never hand these to callers; they log and fall back.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("network error: {0}")]
    Network(String),

    #[error("translation endpoint returned HTTP {0}")]
    Status(u16),

    #[error("malformed translation response: {0}")]
    Decode(String),

    #[error("expected {expected} translation(s), endpoint returned {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for TranslateError {
    fn from(err: serde_json::Error) -> Self {
        TranslateError::Decode(err.to_string())
    }
}

impl From<TranslateError> for wasm_bindgen::JsValue {
    fn from(err: TranslateError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

/// Renders a JS exception into something loggable.
pub(crate) fn describe_js(value: &wasm_bindgen::JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(
            TranslateError::Status(502).to_string(),
            "translation endpoint returned HTTP 502"
        );
        let mismatch = TranslateError::ShapeMismatch { expected: 2, actual: 1 };
        assert!(mismatch.to_string().contains("expected 2"));
    }

    #[test]
    fn json_errors_become_decode_errors() {
        let err = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        assert!(matches!(TranslateError::from(err), TranslateError::Decode(_)));
    }
}
