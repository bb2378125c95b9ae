//! Response validation for successful (2xx) responses.
//!
//! Non-2xx responses never reach this module; they are handled by
//! [`crate::client::error_classification`].

mod schema;

pub use schema::{FieldKind, FieldSpec, ResponseSchema, Schema, SchemaViolation};

use crate::transport::TransportResponse;
use crate::{Error, Result};
use bytes::Bytes;
use serde_json::Value;

/// Decode a JSON body into `T`, classifying empty, unparsable and mis-shaped bodies.
pub fn parse_json<T: ResponseSchema>(resp: &TransportResponse, path: &str) -> Result<T> {
    let status = resp.status.as_u16();
    let raw = String::from_utf8_lossy(&resp.body).into_owned();

    if raw.trim().is_empty() {
        return Err(Error::EmptyResponse {
            path: path.to_string(),
            status,
            request_id: resp.request_id(),
            body: raw,
        });
    }

    let value: Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(source) => {
            return Err(Error::MalformedJson {
                path: path.to_string(),
                status,
                request_id: resp.request_id(),
                body: raw,
                source,
            })
        }
    };

    let violations = T::SCHEMA.check(&value);
    if !violations.is_empty() {
        return Err(Error::SchemaMismatch {
            path: path.to_string(),
            status,
            request_id: resp.request_id(),
            body: raw,
            violations,
        });
    }

    // The schema check should make this infallible; a serde failure still counts as a shape error.
    serde_json::from_value(value).map_err(|e| Error::SchemaMismatch {
        path: path.to_string(),
        status,
        request_id: resp.request_id(),
        body: raw,
        violations: vec![SchemaViolation {
            path: "$".to_string(),
            expected: T::SCHEMA.name,
            found: e.to_string(),
        }],
    })
}

/// Binary bodies are returned unchanged; an empty body is not an error here.
pub fn read_binary(resp: TransportResponse) -> Bytes {
    resp.body
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Ping {
        ok: bool,
    }

    impl ResponseSchema for Ping {
        const SCHEMA: Schema = Schema {
            name: "Ping",
            fields: &[FieldSpec::required("ok", FieldKind::Boolean)],
        };
    }

    fn resp(body: &'static str) -> TransportResponse {
        TransportResponse::new(StatusCode::OK, body)
    }

    #[test]
    fn decodes_conforming_body() {
        let ping: Ping = parse_json(&resp(r#"{"ok":true}"#), "health").unwrap();
        assert!(ping.ok);
    }

    #[test]
    fn blank_body_is_empty_response() {
        let err = parse_json::<Ping>(&resp("  \n"), "health").unwrap_err();
        match err {
            Error::EmptyResponse { path, status, body, .. } => {
                assert_eq!(path, "health");
                assert_eq!(status, 200);
                assert_eq!(body, "  \n");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unparsable_body_is_malformed_json() {
        let err = parse_json::<Ping>(&resp("<html>oops</html>"), "health").unwrap_err();
        assert!(matches!(err, Error::MalformedJson { .. }));
        assert_eq!(err.raw_body(), Some("<html>oops</html>"));
    }

    #[test]
    fn wrong_shape_is_schema_mismatch() {
        let err = parse_json::<Ping>(&resp(r#"{"ok":"yes"}"#), "health").unwrap_err();
        match err {
            Error::SchemaMismatch { violations, body, .. } => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].path, "ok");
                assert_eq!(body, r#"{"ok":"yes"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_binary_body_is_passed_through() {
        assert!(read_binary(resp("")).is_empty());
    }
}
