use crate::client::error_classification::ApiError;
use crate::jobs::JobState;
use crate::response::SchemaViolation;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "request.html", "config.base_url")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "request_validator", "client_config")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the PaperAPI client.
///
/// Every failure surfaces as exactly one of these variants. Variants that originate from a
/// server response keep the raw body so callers can log without re-requesting.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// Bad local input. Never sent over the wire.
    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("{0}")]
    Api(ApiError),

    #[error("PaperAPI returned an empty response for {path} (HTTP {status})")]
    EmptyResponse {
        path: String,
        status: u16,
        request_id: Option<String>,
        body: String,
    },

    #[error("PaperAPI returned invalid JSON for {path} (HTTP {status}): {source}")]
    MalformedJson {
        path: String,
        status: u16,
        request_id: Option<String>,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("PaperAPI returned an unexpected payload for {path} (HTTP {status}): {}", format_violations(.violations))]
    SchemaMismatch {
        path: String,
        status: u16,
        request_id: Option<String>,
        body: String,
        violations: Vec<SchemaViolation>,
    },

    #[error("PDF job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },

    #[error("PDF job {job_id} did not reach a terminal status within {attempts} polling attempts")]
    PollingTimedOut { job_id: String, attempts: u32 },

    #[error("PDF job {job_id} is {state}; the result is only available once the job has succeeded")]
    InvalidJobState { job_id: String, state: JobState },

    #[error("Request cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn format_violations(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// HTTP status of the response that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(api) => Some(api.status),
            Error::EmptyResponse { status, .. }
            | Error::MalformedJson { status, .. }
            | Error::SchemaMismatch { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body attached to server-originated errors.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Error::Api(api) => Some(api.body.as_str()),
            Error::EmptyResponse { body, .. }
            | Error::MalformedJson { body, .. }
            | Error::SchemaMismatch { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    /// Correlation id reported by the server, if any.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Error::Api(api) => api.request_id.as_deref(),
            Error::EmptyResponse { request_id, .. }
            | Error::MalformedJson { request_id, .. }
            | Error::SchemaMismatch { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_includes_context() {
        let err = Error::validation_with_context(
            "html must be a non-empty string",
            ErrorContext::new()
                .with_field_path("request.html")
                .with_source("request_validator"),
        );
        assert_eq!(
            err.to_string(),
            "Validation error: html must be a non-empty string (field: request.html, source: request_validator)"
        );
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("request.html")
        );
    }

    #[test]
    fn response_shape_errors_expose_status_and_body() {
        let err = Error::EmptyResponse {
            path: "v1/usage".into(),
            status: 200,
            request_id: Some("req-1".into()),
            body: "   ".into(),
        };
        assert_eq!(err.status(), Some(200));
        assert_eq!(err.raw_body(), Some("   "));
        assert_eq!(err.request_id(), Some("req-1"));
        assert!(err.context().is_none());
    }

    #[test]
    fn lifecycle_errors_carry_no_http_details() {
        let err = Error::PollingTimedOut {
            job_id: "job-9".into(),
            attempts: 3,
        };
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("job-9"));
        assert!(err.to_string().contains("3 polling attempts"));
        assert!(Error::Cancelled.is_cancelled());
    }
}
