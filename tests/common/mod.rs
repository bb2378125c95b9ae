//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use paperapi_rust::transport::TransportError;
use paperapi_rust::{
    Backoff, CancellationToken, Error, PaperApiClient, Transport, TransportRequest,
    TransportResponse,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const API_KEY: &str = "test-key";

pub fn job_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "errorMessage": null,
        "downloadUrl": null,
        "jobStatusUrl": format!("/v1/jobs/{id}"),
        "createdAt": "2026-03-01T12:00:00Z",
        "expiresAt": "2026-03-02T12:00:00Z",
        "links": { "self": format!("/v1/jobs/{id}"), "result": null }
    })
}

pub fn failed_job_json(id: &str, message: &str) -> Value {
    let mut v = job_json(id, "failed");
    v["errorMessage"] = json!(message);
    v
}

pub fn json_response(status: u16, body: &Value) -> TransportResponse {
    TransportResponse::new(
        StatusCode::from_u16(status).unwrap(),
        Bytes::from(serde_json::to_vec(body).unwrap()),
    )
}

pub fn pdf_response(bytes: &'static [u8]) -> TransportResponse {
    TransportResponse::new(StatusCode::OK, Bytes::from_static(bytes))
}

/// Replays queued responses in order and records every request path.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<paperapi_rust::Result<TransportResponse>>>,
    paths: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, resp: TransportResponse) -> &Self {
        self.script.lock().unwrap().push_back(Ok(resp));
        self
    }

    pub fn push_job(&self, id: &str, status: &str) -> &Self {
        self.push(json_response(200, &job_json(id, status)))
    }

    pub fn push_err(&self, err: Error) -> &Self {
        self.script.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        request: TransportRequest,
        _cancel: Option<&CancellationToken>,
    ) -> paperapi_rust::Result<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.paths.lock().unwrap().push(request.path.clone());
        self.script.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(Error::Transport(TransportError::Other(format!(
                "no scripted response for {}",
                request.path
            ))))
        })
    }
}

/// Zero-delay backoff that remembers every attempt it was asked about.
#[derive(Clone, Default)]
pub struct RecordingBackoff {
    attempts: Arc<Mutex<Vec<u32>>>,
}

impl RecordingBackoff {
    pub fn waits(&self) -> Vec<u32> {
        self.attempts.lock().unwrap().clone()
    }
}

impl Backoff for RecordingBackoff {
    fn next_delay(&self, attempt: u32) -> Duration {
        self.attempts.lock().unwrap().push(attempt);
        Duration::ZERO
    }
}

pub fn scripted_client(transport: &Arc<ScriptedTransport>) -> PaperApiClient {
    PaperApiClient::builder()
        .api_key(API_KEY)
        .transport(transport.clone())
        .build()
        .expect("client with scripted transport")
}
