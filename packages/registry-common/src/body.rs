//! Response decoding.
//!
//! Registry endpoints normally answer JSON, but some (document downloads in
//! particular) answer PDF or plain text with a success status. Those are not
//! failures: they decode to [`ResponseBody::NonJson`] and the caller decides
//! how to represent them.

use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use serde_json::{json, Value};

use crate::error::{ApiError, Result};

/// Characters kept from a non-JSON text body.
pub const TEXT_PREVIEW_CHARS: usize = 2000;

/// What a non-JSON body looked like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonJsonBody {
    /// PDF or octet-stream content; only the size is kept.
    Binary { len: usize },
    /// Anything else, truncated to [`TEXT_PREVIEW_CHARS`].
    Text { preview: String },
}

/// A successful response whose body is not JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonJsonResponse {
    pub status: u16,
    pub content_type: String,
    pub body: NonJsonBody,
}

impl NonJsonResponse {
    fn from_bytes(status: u16, content_type: String, bytes: &[u8]) -> Self {
        let body = if content_type.contains("pdf") || content_type.contains("octet-stream") {
            NonJsonBody::Binary { len: bytes.len() }
        } else {
            NonJsonBody::Text {
                preview: String::from_utf8_lossy(bytes)
                    .chars()
                    .take(TEXT_PREVIEW_CHARS)
                    .collect(),
            }
        };
        Self {
            status,
            content_type,
            body,
        }
    }

    /// Diagnostic record standing in for the missing JSON payload.
    pub fn into_diagnostic(self) -> Value {
        let mut record = json!({
            "_status_code": self.status,
            "_content_type": self.content_type,
        });
        match self.body {
            NonJsonBody::Binary { len } => {
                record["_note"] = json!("Réponse binaire (probablement un PDF ou un flux).");
                record["_bytes_length"] = json!(len);
            }
            NonJsonBody::Text { preview } => {
                record["_text_preview"] = json!(preview);
            }
        }
        record
    }
}

/// Decoded body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    NonJson(NonJsonResponse),
}

impl ResponseBody {
    /// JSON payload, or the diagnostic record for non-JSON bodies.
    pub fn into_value(self) -> Value {
        match self {
            ResponseBody::Json(value) => value,
            ResponseBody::NonJson(non_json) => non_json.into_diagnostic(),
        }
    }
}

/// Read and classify a response.
///
/// Statuses >= 400 become [`ApiError::Remote`] carrying the raw body text.
pub async fn decode(service: &'static str, response: Response) -> Result<ResponseBody> {
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::Transport { service, source: e })?;

    classify(service, status, content_type, &bytes)
}

fn classify(
    service: &'static str,
    status: u16,
    content_type: String,
    bytes: &[u8],
) -> Result<ResponseBody> {
    if status >= 400 {
        return Err(ApiError::Remote {
            service,
            status,
            body: String::from_utf8_lossy(bytes).into_owned(),
        });
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => Ok(ResponseBody::Json(value)),
        Err(_) => Ok(ResponseBody::NonJson(NonJsonResponse::from_bytes(
            status,
            content_type,
            bytes,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_success() {
        let body = classify("legalmap", 200, "application/json".into(), br#"{"a":1}"#).unwrap();
        assert_eq!(body, ResponseBody::Json(json!({"a": 1})));
    }

    #[test]
    fn test_error_status_carries_body() {
        let err = classify("legalmap", 403, "application/json".into(), br#"{"message":"Forbidden"}"#)
            .unwrap_err();
        match err {
            ApiError::Remote { status, body, .. } => {
                assert_eq!(status, 403);
                assert_eq!(body, r#"{"message":"Forbidden"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_json_error_is_still_remote() {
        let err = classify("legalmap", 502, "text/html".into(), b"<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_pdf_becomes_diagnostic_with_length() {
        let body = classify("legalmap", 200, "application/pdf".into(), b"%PDF-1.7 binary").unwrap();
        let diagnostic = body.into_value();
        assert_eq!(diagnostic["_status_code"], 200);
        assert_eq!(diagnostic["_content_type"], "application/pdf");
        assert_eq!(diagnostic["_bytes_length"], 15);
        assert!(diagnostic.get("_text_preview").is_none());
    }

    #[test]
    fn test_text_preview_is_truncated() {
        let long = "é".repeat(TEXT_PREVIEW_CHARS + 10);
        let body = classify("legalmap", 200, "text/plain".into(), long.as_bytes()).unwrap();
        let diagnostic = body.into_value();
        let preview = diagnostic["_text_preview"].as_str().unwrap();
        assert_eq!(preview.chars().count(), TEXT_PREVIEW_CHARS);
        assert!(diagnostic.get("_bytes_length").is_none());
    }
}
