use axum::{extract::State, response::IntoResponse, Json};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemInfo {
    pub environment: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub system_info: SystemInfo,
}

pub async fn healthcheck(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.config();
    let status = HealthStatus {
        status: "available".to_string(),
        system_info: SystemInfo {
            environment: config.environment.to_string(),
            version: config.version.clone(),
        },
    };
    (StatusCode::OK, Json(status))
}
