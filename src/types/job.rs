//! Asynchronous job envelope returned by `v1/generate-async` and `v1/jobs/{id}`.

use crate::response::{FieldKind, FieldSpec, ResponseSchema, Schema};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Server-side snapshot of a job. The client only ever reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub id: String,
    /// Open enumeration; see [`JobStatus::phase`].
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub job_status_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    pub links: JobLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    #[serde(default)]
    pub result: Option<String>,
}

const JOB_LINKS_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("self", FieldKind::String),
    FieldSpec::optional("result", FieldKind::String),
];

impl ResponseSchema for JobStatus {
    const SCHEMA: Schema = Schema {
        name: "JobStatus",
        fields: &[
            FieldSpec::required("id", FieldKind::String),
            FieldSpec::required("status", FieldKind::String),
            FieldSpec::optional("errorMessage", FieldKind::String),
            FieldSpec::optional("downloadUrl", FieldKind::String),
            FieldSpec::optional("jobStatusUrl", FieldKind::String),
            FieldSpec::required("createdAt", FieldKind::Timestamp),
            FieldSpec::required("expiresAt", FieldKind::Timestamp),
            FieldSpec::required("links", FieldKind::Object(JOB_LINKS_FIELDS)),
        ],
    };
}

/// Parsed view of the `status` string. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerJobStatus {
    Queued,
    Processing,
    Succeeded,
    Failed,
    /// Any status this client does not know; treated as still in progress.
    Other(String),
}

impl ServerJobStatus {
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.eq_ignore_ascii_case("queued") {
            ServerJobStatus::Queued
        } else if s.eq_ignore_ascii_case("processing") {
            ServerJobStatus::Processing
        } else if s.eq_ignore_ascii_case("succeeded") {
            ServerJobStatus::Succeeded
        } else if s.eq_ignore_ascii_case("failed") {
            ServerJobStatus::Failed
        } else {
            ServerJobStatus::Other(raw.to_string())
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ServerJobStatus::Succeeded | ServerJobStatus::Failed)
    }
}

impl fmt::Display for ServerJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerJobStatus::Queued => f.write_str("queued"),
            ServerJobStatus::Processing => f.write_str("processing"),
            ServerJobStatus::Succeeded => f.write_str("succeeded"),
            ServerJobStatus::Failed => f.write_str("failed"),
            ServerJobStatus::Other(s) => f.write_str(s),
        }
    }
}

impl JobStatus {
    pub fn phase(&self) -> ServerJobStatus {
        ServerJobStatus::parse(&self.status)
    }

    pub fn is_succeeded(&self) -> bool {
        self.phase() == ServerJobStatus::Succeeded
    }

    pub fn is_failed(&self) -> bool {
        self.phase() == ServerJobStatus::Failed
    }

    pub fn is_terminal(&self) -> bool {
        self.phase().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_matching_ignores_case() {
        for raw in ["succeeded", "Succeeded", "SUCCEEDED", " succeeded "] {
            assert_eq!(ServerJobStatus::parse(raw), ServerJobStatus::Succeeded);
        }
        assert_eq!(ServerJobStatus::parse("FAILED"), ServerJobStatus::Failed);
        assert_eq!(
            ServerJobStatus::parse("rendering"),
            ServerJobStatus::Other("rendering".into())
        );
        assert!(!ServerJobStatus::parse("rendering").is_terminal());
    }

    #[test]
    fn deserializes_wire_format() {
        let job: JobStatus = serde_json::from_value(json!({
            "id": "5b0c2f0e-8a55-4a4b-9a59-3f1d0d8a7e11",
            "status": "queued",
            "createdAt": "2025-03-01T12:00:00Z",
            "expiresAt": "2025-03-02T12:00:00+00:00",
            "links": { "self": "/v1/jobs/5b0c2f0e-8a55-4a4b-9a59-3f1d0d8a7e11", "result": null }
        }))
        .unwrap();

        assert_eq!(job.phase(), ServerJobStatus::Queued);
        assert!(job.error_message.is_none());
        assert!(job.links.result.is_none());
        assert_eq!(job.expires_at - job.created_at, time::Duration::days(1));
    }
}
