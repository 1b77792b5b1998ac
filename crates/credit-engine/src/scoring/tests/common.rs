use axum::response::Response;
use serde_json::{json, Value};

use crate::scoring::{ApplicationPayload, ScoringConfig, ScoringEngine};

/// Salary-only application used for the pinned regression score.
pub(super) fn baseline_request() -> Value {
    json!({
        "salary": 20000,
        "additional_income": 0,
        "loan_amount": 100000,
        "loan_term_months": 36,
    })
}

/// Well-qualified applicant asking for a small loan.
pub(super) fn strong_request() -> Value {
    json!({
        "age": 35,
        "salary": 50000,
        "loan_amount": 20000,
        "loan_term_months": 12,
        "defaulted_loans": false,
    })
}

pub(super) fn full_profile_request() -> Value {
    json!({
        "age": 42,
        "salary": 85000,
        "additionalIncome": 5000,
        "loan_amount": 150000,
        "loan_term_months": 48,
        "employment_type": "Kamu",
        "sector": "kamu",
        "profession": "Doktor",
        "home_ownership": "owner",
        "job_stability": "stable",
        "has_insurance": true,
        "defaulted_loans": false,
        "legal_issues": false,
        "customer_segment": "private",
        "experience": 15,
    })
}

pub(super) fn payload(value: Value) -> ApplicationPayload {
    ApplicationPayload::from_value(&value)
}

pub(super) fn with_field(mut value: Value, key: &str, field: Value) -> Value {
    if let Value::Object(fields) = &mut value {
        fields.insert(key.to_string(), field);
    }
    value
}

pub(super) fn config() -> ScoringConfig {
    ScoringConfig::default()
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(config())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
