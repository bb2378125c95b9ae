//! Account introspection payloads.

use crate::response::{FieldKind, FieldSpec, ResponseSchema, Schema};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Per-plan usage counters from `v1/usage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    pub used: i64,
    pub monthly_limit: i64,
    pub remaining: i64,
    pub overage: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub next_recharge_at: OffsetDateTime,
}

impl ResponseSchema for UsageSummary {
    const SCHEMA: Schema = Schema {
        name: "UsageSummary",
        fields: &[
            FieldSpec::required("used", FieldKind::Integer),
            FieldSpec::required("monthlyLimit", FieldKind::Integer),
            FieldSpec::required("remaining", FieldKind::Integer),
            FieldSpec::required("overage", FieldKind::Integer),
            FieldSpec::required("nextRechargeAt", FieldKind::Timestamp),
        ],
    };
}

/// Identity behind the API key, from `v1/whoami`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub plan: PlanDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDescriptor {
    pub name: String,
    pub code: String,
    pub interval: String,
    pub monthly_limit: i64,
    pub price_cents: i64,
}

const PLAN_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::String),
    FieldSpec::required("code", FieldKind::String),
    FieldSpec::required("interval", FieldKind::String),
    FieldSpec::required("monthlyLimit", FieldKind::Integer),
    FieldSpec::required("priceCents", FieldKind::Integer),
];

impl ResponseSchema for AccountProfile {
    const SCHEMA: Schema = Schema {
        name: "AccountProfile",
        fields: &[
            FieldSpec::required("id", FieldKind::String),
            FieldSpec::required("name", FieldKind::String),
            FieldSpec::required("email", FieldKind::String),
            FieldSpec::required("plan", FieldKind::Object(PLAN_FIELDS)),
        ],
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn whoami_schema_flags_nested_plan_fields() {
        let v = json!({
            "id": "u-1",
            "name": "Ada",
            "email": "ada@example.com",
            "plan": { "name": "Starter", "code": "starter", "interval": "monthly" }
        });
        let paths: Vec<String> = AccountProfile::SCHEMA
            .check(&v)
            .into_iter()
            .map(|v| v.path)
            .collect();
        assert_eq!(paths, vec!["plan.monthlyLimit", "plan.priceCents"]);
    }

    #[test]
    fn usage_round_trips_wire_names() {
        let usage: UsageSummary = serde_json::from_value(json!({
            "used": 12,
            "monthlyLimit": 500,
            "remaining": 488,
            "overage": 0,
            "nextRechargeAt": "2025-04-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(usage.remaining, 488);
        assert!(UsageSummary::SCHEMA
            .check(&serde_json::to_value(&usage).unwrap())
            .is_empty());
    }
}
