//! Error classification for non-2xx responses.
//!
//! [`classify`] is a pure function: the same response always yields the same [`ApiError`].

use crate::transport::TransportResponse;
use serde_json::Value;
use std::fmt;

/// A non-2xx response from PaperAPI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    /// Canonical reason phrase for `status`, if known.
    pub reason: Option<String>,
    /// Machine-readable code from `errorCode` / `code`.
    pub error_code: Option<String>,
    pub message: String,
    /// Raw response body, preserved for diagnostics.
    pub body: String,
    /// Server correlation id (`x-request-id`).
    pub request_id: Option<String>,
    /// Relative endpoint path that failed.
    pub path: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PaperAPI error: HTTP {}", self.status)?;
        if let Some(code) = &self.error_code {
            write!(f, " [{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn class(&self) -> ErrorClass {
        ErrorClass::from_status(self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Build an [`ApiError`] from a non-2xx response.
///
/// Message priority: `message`, `error`, `title`. Code priority: `errorCode`, `code`.
/// The first key that is present and not `null` wins; if its value is not a non-blank string
/// the field counts as absent. Unparsable bodies fall back to a generic message.
pub fn classify(resp: &TransportResponse, path: &str) -> ApiError {
    let status = resp.status.as_u16();
    let reason = resp.status.canonical_reason().map(str::to_string);
    let body = String::from_utf8_lossy(&resp.body).into_owned();

    let payload: Option<Value> = if body.trim().is_empty() {
        None
    } else {
        serde_json::from_str(&body).ok()
    };

    let message = payload
        .as_ref()
        .and_then(|p| first_string(p, &["message", "error", "title"]))
        .unwrap_or_else(|| {
            format!(
                "PaperAPI request to {} failed with status code {} ({})",
                path,
                status,
                reason.as_deref().unwrap_or("Unknown Status")
            )
        });
    let error_code = payload
        .as_ref()
        .and_then(|p| first_string(p, &["errorCode", "code"]));

    ApiError {
        status,
        reason,
        error_code,
        message,
        body,
        request_id: resp.request_id(),
        path: path.to_string(),
    }
}

fn first_string(payload: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| payload.get(*k).filter(|v| !v.is_null()))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Coarse category of an HTTP failure.
///
/// The library never retries on its own; [`ErrorClass::retryable`] is a hint for callers that
/// wrap operations in their own retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    InvalidRequest,
    Authentication,
    PermissionDenied,
    NotFound,
    Conflict,
    RequestTooLarge,
    RateLimited,
    ServerError,
    Overloaded,
    Timeout,
    Unknown,
}

impl ErrorClass {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::InvalidRequest,
            401 => Self::Authentication,
            402 | 403 => Self::PermissionDenied,
            404 | 410 => Self::NotFound,
            408 | 504 => Self::Timeout,
            409 => Self::Conflict,
            413 => Self::RequestTooLarge,
            429 => Self::RateLimited,
            502 | 503 => Self::Overloaded,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Authentication => "authentication",
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::RequestTooLarge => "request_too_large",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Overloaded => "overloaded",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }

    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServerError | Self::Overloaded | Self::Timeout | Self::Conflict
        )
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
