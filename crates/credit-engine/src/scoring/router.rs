use std::panic::{catch_unwind, AssertUnwindSafe};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use super::payload::ApplicationPayload;
use super::{ScoringEngine, ScoringResult};

pub const DECISION_PATH: &str = "/api/v1/credit-decision";

const ALLOW_ANY_ORIGIN: [(header::HeaderName, &str); 1] =
    [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")];

/// Body returned for a scored application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub score: u8,
    pub details: ScoringResult,
}

/// Router exposing the credit decision endpoint and its CORS preflight.
pub fn decision_router(engine: ScoringEngine) -> Router {
    Router::new()
        .route(
            DECISION_PATH,
            post(decision_handler).options(preflight_handler),
        )
        .with_state(engine)
}

pub(crate) async fn decision_handler(State(engine): State<ScoringEngine>, body: Bytes) -> Response {
    match decide(&engine, &body) {
        Ok(response) => {
            info!(
                score = response.score,
                decision = response.details.decision.label(),
                vetoed = response.details.vetoed,
                "credit decision issued"
            );
            (StatusCode::OK, ALLOW_ANY_ORIGIN, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn preflight_handler() -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
        .into_response()
}

/// Parse, validate and score a raw request body.
pub fn decide(
    engine: &ScoringEngine,
    body: &[u8],
) -> Result<DecisionResponse, DecisionRequestError> {
    let payload = parse_body(body)?;

    let details = catch_unwind(AssertUnwindSafe(|| engine.score(&payload)))
        .map_err(|panic| DecisionRequestError::Internal(panic_message(panic.as_ref())))?;

    Ok(DecisionResponse {
        score: details.score,
        details,
    })
}

fn parse_body(body: &[u8]) -> Result<ApplicationPayload, DecisionRequestError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(DecisionRequestError::EmptyPayload);
    }

    let value: Value = serde_json::from_slice(body).map_err(DecisionRequestError::Malformed)?;
    match &value {
        Value::Null => Err(DecisionRequestError::EmptyPayload),
        Value::Object(fields) if fields.is_empty() => Err(DecisionRequestError::EmptyPayload),
        Value::Object(fields) => Ok(ApplicationPayload::from_fields(fields)),
        _ => Err(DecisionRequestError::NotAnObject),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "scoring engine failed".to_string()
    }
}

/// Failures surfaced by the decision endpoint.
#[derive(Debug, thiserror::Error)]
pub enum DecisionRequestError {
    #[error("No JSON payload provided")]
    EmptyPayload,
    #[error("malformed JSON payload: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("JSON payload must be an object")]
    NotAnObject,
    #[error("{0}")]
    Internal(String),
}

impl DecisionRequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            DecisionRequestError::EmptyPayload
            | DecisionRequestError::Malformed(_)
            | DecisionRequestError::NotAnObject => StatusCode::BAD_REQUEST,
            DecisionRequestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DecisionRequestError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "credit decision failed");
        } else {
            warn!(error = %self, "credit decision request rejected");
        }

        let payload = json!({ "error": self.to_string() });
        (status, ALLOW_ANY_ORIGIN, Json(payload)).into_response()
    }
}
