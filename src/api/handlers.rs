use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::check::{
    action_description, ActionDescription, AlertCheck, CheckError, CheckViolation, CheckWindow,
    Metric, PrepareRequest, ACTION_ID,
};
use crate::discovery::{
    attribute_descriptions, target_description, AttributeDescription, DiscoveryCache,
    DiscoveryDescription, Target, TargetDescription, TARGET_TYPE,
};

/// Application state shared across handlers
pub struct AppState {
    pub discovery: Arc<DiscoveryCache>,
    pub check: AlertCheck,
}

// ============================================================================
// Health Check / Index
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
pub struct Endpoint {
    pub id: &'static str,
    pub path: &'static str,
}

#[derive(Serialize)]
pub struct IndexResponse {
    pub discoveries: Vec<Endpoint>,
    pub actions: Vec<Endpoint>,
}

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        discoveries: vec![Endpoint {
            id: TARGET_TYPE,
            path: "/discovery",
        }],
        actions: vec![Endpoint {
            id: ACTION_ID,
            path: "/actions/check",
        }],
    })
}

// ============================================================================
// Discovery
// ============================================================================

pub async fn describe_discovery() -> Json<DiscoveryDescription> {
    Json(DiscoveryDescription {
        id: TARGET_TYPE.to_string(),
        call_interval: "1m".to_string(),
    })
}

pub async fn describe_target() -> Json<TargetDescription> {
    Json(target_description())
}

pub async fn describe_attributes() -> Json<Vec<AttributeDescription>> {
    Json(attribute_descriptions())
}

#[derive(Serialize)]
pub struct TargetsResponse {
    pub targets: Vec<Target>,
}

pub async fn discovered_targets(State(state): State<Arc<AppState>>) -> Json<TargetsResponse> {
    Json(TargetsResponse {
        targets: state.discovery.targets(),
    })
}

// ============================================================================
// Alert Check
// ============================================================================

pub async fn describe_check() -> Json<ActionDescription> {
    Json(action_description())
}

#[derive(Serialize, Deserialize)]
pub struct StateEnvelope {
    pub state: CheckWindow,
}

pub async fn prepare_check(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PrepareRequest>,
) -> Result<Json<StateEnvelope>, ApiError> {
    let window = state.check.prepare(&request)?;
    Ok(Json(StateEnvelope { state: window }))
}

pub async fn start_check(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StateEnvelope>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.check.start(&request.state)?;
    Ok(Json(serde_json::json!({})))
}

#[derive(Serialize, Deserialize)]
pub struct StatusResponse {
    pub state: CheckWindow,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CheckViolation>,
    pub metrics: Vec<Metric>,
}

pub async fn check_status(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StateEnvelope>,
) -> Result<Json<StatusResponse>, ApiError> {
    let mut window = request.state;
    let result = state.check.status(&mut window).await?;

    Ok(Json(StatusResponse {
        state: window,
        completed: result.completed,
        error: result.error,
        metrics: result.metrics,
    }))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    BadGateway(String),
}

impl From<CheckError> for ApiError {
    fn from(err: CheckError) -> Self {
        match err {
            CheckError::Config(msg) => ApiError::BadRequest(msg),
            CheckError::Transport(e) => {
                tracing::warn!(error = %e, "Failed to retrieve fired alerts");
                ApiError::BadGateway(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
