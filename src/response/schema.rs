//! Explicit response schemas.
//!
//! Each response type declares the shape it expects as a static list of [`FieldSpec`]s. The
//! validator checks a parsed JSON value against it before handing the value to serde, so a
//! shape mismatch is reported field by field instead of as a single serde message.

use serde_json::Value;
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Expected JSON type of a field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String,
    /// Any JSON number.
    Number,
    /// A number without a fractional part.
    Integer,
    Boolean,
    /// An RFC 3339 timestamp string.
    Timestamp,
    Object(&'static [FieldSpec]),
}

impl FieldKind {
    fn expected(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Timestamp => "RFC 3339 timestamp",
            FieldKind::Object(_) => "object",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Whether an explicit `null` is accepted.
    pub nullable: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            nullable: false,
        }
    }

    /// Optional and nullable.
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            nullable: true,
        }
    }
}

/// Named top-level shape of a response body.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

/// Types that can be decoded from a validated JSON response.
pub trait ResponseSchema: serde::de::DeserializeOwned {
    const SCHEMA: Schema;
}

/// One reason a value does not satisfy a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Dotted path of the offending field (`links.self`), or `$` for the root.
    pub path: String,
    pub expected: &'static str,
    /// `missing` when a required field is absent, otherwise the JSON type found.
    pub found: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: expected {}, found {}", self.path, self.expected, self.found)
    }
}

impl Schema {
    /// Collect every violation; an empty list means the value conforms.
    pub fn check(&self, value: &Value) -> Vec<SchemaViolation> {
        let mut violations = Vec::new();
        match value {
            Value::Object(_) => check_fields(self.fields, value, "", &mut violations),
            other => violations.push(SchemaViolation {
                path: "$".to_string(),
                expected: "object",
                found: json_type(other).to_string(),
            }),
        }
        violations
    }
}

fn check_fields(fields: &[FieldSpec], value: &Value, prefix: &str, out: &mut Vec<SchemaViolation>) {
    for field in fields {
        let path = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{}.{}", prefix, field.name)
        };

        match value.get(field.name) {
            None => {
                if field.required {
                    out.push(SchemaViolation {
                        path,
                        expected: field.kind.expected(),
                        found: "missing".to_string(),
                    });
                }
            }
            Some(Value::Null) if field.nullable => {}
            Some(v) => check_kind(&field.kind, v, &path, out),
        }
    }
}

fn check_kind(kind: &FieldKind, value: &Value, path: &str, out: &mut Vec<SchemaViolation>) {
    let ok = match (kind, value) {
        (FieldKind::String, Value::String(_)) => true,
        (FieldKind::Number, Value::Number(_)) => true,
        (FieldKind::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
        (FieldKind::Boolean, Value::Bool(_)) => true,
        (FieldKind::Timestamp, Value::String(s)) => OffsetDateTime::parse(s, &Rfc3339).is_ok(),
        (FieldKind::Object(fields), Value::Object(_)) => {
            check_fields(fields, value, path, out);
            true
        }
        _ => false,
    };

    if !ok {
        let found = match (kind, value) {
            (FieldKind::Timestamp, Value::String(s)) => format!("\"{}\"", s),
            (FieldKind::Integer, Value::Number(n)) => format!("{}", n),
            _ => json_type(value).to_string(),
        };
        out.push(SchemaViolation {
            path: path.to_string(),
            expected: kind.expected(),
            found,
        });
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const INNER: &[FieldSpec] = &[FieldSpec::required("self", FieldKind::String)];
    const SAMPLE: Schema = Schema {
        name: "Sample",
        fields: &[
            FieldSpec::required("id", FieldKind::String),
            FieldSpec::required("count", FieldKind::Integer),
            FieldSpec::required("at", FieldKind::Timestamp),
            FieldSpec::optional("note", FieldKind::String),
            FieldSpec::required("links", FieldKind::Object(INNER)),
        ],
    };

    #[test]
    fn conforming_value_has_no_violations() {
        let v = json!({
            "id": "a",
            "count": 3,
            "at": "2025-01-01T10:00:00Z",
            "note": null,
            "links": { "self": "/v1/jobs/a" },
            "extra": true
        });
        assert!(SAMPLE.check(&v).is_empty());
    }

    #[test]
    fn reports_every_violation_with_paths() {
        let v = json!({
            "count": 1.5,
            "at": "yesterday",
            "note": 7,
            "links": {}
        });
        let paths: Vec<String> = SAMPLE.check(&v).into_iter().map(|v| v.path).collect();
        assert_eq!(paths, vec!["id", "count", "at", "note", "links.self"]);
    }

    #[test]
    fn non_object_root_is_rejected() {
        let violations = SAMPLE.check(&json!([1, 2]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].to_string(), "$: expected object, found array");
    }
}
