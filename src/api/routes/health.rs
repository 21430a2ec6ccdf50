//! Liveness endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ai_backend: String,
    pub ai_available: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let ai_available = state.tips.backend_available().await;

    Json(HealthResponse {
        status: "ok",
        ai_backend: state.tips.backend_name().to_string(),
        ai_available,
    })
}
