//! AI sleep-tip generation.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::auth::Session;
use crate::tips::TipRequest;

#[derive(Debug, Serialize)]
pub struct TipsResponse {
    pub tips: String,
}

/// Generate tips from one record's metrics. Backend failure degrades to
/// the fixed fallback text rather than an error status.
pub async fn generate_tips(
    _session: Session,
    State(state): State<AppState>,
    Json(payload): Json<TipRequest>,
) -> Result<Json<TipsResponse>, ApiError> {
    if payload.duration.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "duration is required to generate tips".to_string(),
        ));
    }
    if !(1..=5).contains(&payload.quality) {
        return Err(ApiError::BadRequest(format!(
            "quality must be between 1 and 5, got {}",
            payload.quality
        )));
    }

    let tips = state.tips.generate_or_fallback(&payload).await;
    Ok(Json(TipsResponse { tips }))
}
