// Wire types for POST /translate and the fetch-backed transport

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::error::{describe_js, TranslateError};
use crate::locale::Locale;

/// `text` / `translated` are a bare string for single requests and an array for batches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextPayload {
    Single(String),
    Batch(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: TextPayload,
    pub source: Locale,
    pub target: Locale,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated: TextPayload,
}

impl TranslateResponse {
    pub fn into_single(self) -> Result<String, TranslateError> {
        match self.translated {
            TextPayload::Single(text) => Ok(text),
            TextPayload::Batch(texts) => Err(TranslateError::ShapeMismatch {
                expected: 1,
                actual: texts.len(),
            }),
        }
    }

    /// Requires exactly `expected` entries, in request order.
    pub fn into_batch(self, expected: usize) -> Result<Vec<String>, TranslateError> {
        match self.translated {
            TextPayload::Batch(texts) if texts.len() == expected => Ok(texts),
            TextPayload::Batch(texts) => Err(TranslateError::ShapeMismatch {
                expected,
                actual: texts.len(),
            }),
            TextPayload::Single(_) => Err(TranslateError::ShapeMismatch { expected, actual: 1 }),
        }
    }
}

pub trait Transport {
    fn post_translate(
        &self,
        request: TranslateRequest,
    ) -> LocalBoxFuture<'_, Result<TranslateResponse, TranslateError>>;
}

pub struct FetchTransport {
    endpoint: String,
}

impl FetchTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    async fn send(&self, request: TranslateRequest) -> Result<TranslateResponse, TranslateError> {
        let body = serde_json::to_string(&request)?;

        let mut opts = RequestInit::new();
        opts.method("POST");
        opts.mode(RequestMode::Cors);
        opts.body(Some(&JsValue::from_str(&body)));

        let req = Request::new_with_str_and_init(&self.endpoint, &opts)
            .map_err(|e| TranslateError::Network(describe_js(&e)))?;
        req.headers()
            .set("Content-Type", "application/json")
            .map_err(|e| TranslateError::Network(describe_js(&e)))?;

        let window =
            web_sys::window().ok_or_else(|| TranslateError::Network("no window".to_string()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&req))
            .await
            .map_err(|e| TranslateError::Network(describe_js(&e)))?;
        let resp: Response = resp_value
            .dyn_into()
            .map_err(|e| TranslateError::Network(describe_js(&e)))?;

        if !resp.ok() {
            return Err(TranslateError::Status(resp.status()));
        }

        let text_promise = resp
            .text()
            .map_err(|e| TranslateError::Network(describe_js(&e)))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|e| TranslateError::Network(describe_js(&e)))?
            .as_string()
            .ok_or_else(|| TranslateError::Decode("response body is not text".to_string()))?;

        Ok(serde_json::from_str(&text)?)
    }
}

impl Transport for FetchTransport {
    fn post_translate(
        &self,
        request: TranslateRequest,
    ) -> LocalBoxFuture<'_, Result<TranslateResponse, TranslateError>> {
        Box::pin(self.send(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_request_serializes_text_as_string() {
        let request = TranslateRequest {
            text: TextPayload::Single("予約する".to_string()),
            source: Locale::from("ja"),
            target: Locale::from("en"),
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"text":"予約する","source":"ja","target":"en"}"#
        );
    }

    #[test]
    fn batch_request_serializes_text_as_array() {
        let request = TranslateRequest {
            text: TextPayload::Batch(vec!["a".to_string(), "c".to_string()]),
            source: Locale::from("ja"),
            target: Locale::from("en"),
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"text":["a","c"],"source":"ja","target":"en"}"#
        );
    }

    #[test]
    fn response_shapes_decode() {
        let single: TranslateResponse = serde_json::from_str(r#"{"translated":"Book Now"}"#).unwrap();
        assert_eq!(single.into_single().unwrap(), "Book Now");

        let batch: TranslateResponse =
            serde_json::from_str(r#"{"translated":["Book Now","Cancel"]}"#).unwrap();
        assert_eq!(batch.into_batch(2).unwrap(), vec!["Book Now", "Cancel"]);
    }

    #[test]
    fn mismatched_shapes_are_errors() {
        let batch: TranslateResponse = serde_json::from_str(r#"{"translated":["x"]}"#).unwrap();
        assert!(matches!(
            batch.clone().into_batch(2),
            Err(TranslateError::ShapeMismatch { expected: 2, actual: 1 })
        ));
        assert!(batch.into_single().is_err());

        let single: TranslateResponse = serde_json::from_str(r#"{"translated":"x"}"#).unwrap();
        assert!(single.into_batch(1).is_err());
    }

    #[test]
    fn missing_translated_field_fails_to_decode() {
        assert!(serde_json::from_str::<TranslateResponse>(r#"{"error":"boom"}"#).is_err());
    }
}
