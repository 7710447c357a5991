use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};

use crate::api::AppState;

pub const SERVICE_NAME: &str = "cozy-gym-bot";

#[derive(Debug, Serialize, Deserialize)]
pub struct RootStatusResponse {
    pub status: String,
    pub service: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn root() -> Json<RootStatusResponse> {
    Json(RootStatusResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// Liveness: answers as long as the process serves requests.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness: requires a configured and reachable database.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<&'static str>, StatusCode> {
    let Some(db) = &state.db else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    match db.ping().await {
        Ok(()) => Ok(Json("ready")),
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
