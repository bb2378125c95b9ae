//! HTTP transport seam.
//!
//! The client core talks to PaperAPI only through [`Transport`], so tests (and callers with
//! special networking needs) can substitute their own implementation. A transport performs
//! exactly one round trip per call and never retries.

mod http;

pub use http::HttpTransport;

use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use tokio_util::sync::CancellationToken;

pub const ACCEPT_JSON: &str = "application/json";
pub const ACCEPT_PDF: &str = "application/pdf";

/// Correlation header names checked on responses, in priority order.
pub const REQUEST_ID_HEADERS: &[&str] = &["x-request-id", "request-id"];

/// A single outgoing request, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    /// Relative path such as `v1/jobs/{id}`. Never starts with `/`.
    pub path: String,
    /// Media type placed in the `Accept` header.
    pub accept: &'static str,
    pub headers: HeaderMap,
    /// Serialized JSON body, if any.
    pub body: Option<Bytes>,
}

impl TransportRequest {
    pub fn get(path: impl Into<String>, accept: &'static str) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            accept,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn post_json(path: impl Into<String>, accept: &'static str, body: Bytes) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            accept,
            headers: HeaderMap::new(),
            body: Some(body),
        }
    }
}

/// Status, headers and raw body of a completed round trip.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// First non-blank value among `names`.
    pub fn header_first(&self, names: &[&str]) -> Option<String> {
        header_first(&self.headers, names)
    }

    pub fn request_id(&self) -> Option<String> {
        self.header_first(REQUEST_ID_HEADERS)
    }
}

pub(crate) fn header_first(headers: &HeaderMap, names: &[&str]) -> Option<String> {
    for name in names {
        if let Some(v) = headers.get(*name) {
            if let Ok(s) = v.to_str() {
                let s = s.trim();
                if !s.is_empty() {
                    return Some(s.to_string());
                }
            }
        }
    }
    None
}

/// Sends requests to PaperAPI.
///
/// Implementations attach authentication and the `Accept` header. When `cancel` fires while a
/// request is in flight, the call must stop and return [`crate::Error::Cancelled`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: TransportRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<TransportResponse>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn header_first_skips_blank_values() {
        let mut resp = TransportResponse::new(StatusCode::OK, Bytes::new());
        resp.headers
            .insert("x-request-id", HeaderValue::from_static("  "));
        resp.headers
            .insert("request-id", HeaderValue::from_static("abc-123"));
        assert_eq!(resp.request_id().as_deref(), Some("abc-123"));
    }

    #[test]
    fn request_constructors_set_method_and_body() {
        let get = TransportRequest::get("v1/usage", ACCEPT_JSON);
        assert_eq!(get.method, Method::GET);
        assert!(get.body.is_none());

        let post = TransportRequest::post_json("v1/generate", ACCEPT_PDF, Bytes::from_static(b"{}"));
        assert_eq!(post.method, Method::POST);
        assert_eq!(post.accept, ACCEPT_PDF);
        assert_eq!(post.body.as_deref(), Some(&b"{}"[..]));
    }
}
