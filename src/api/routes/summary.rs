//! Range summary statistics and chart series.

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validate_range;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::auth::Session;
use crate::calculate;
use crate::models::{RegularityPoint, SleepSummary};

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: SleepSummary,
    pub regularity: Vec<RegularityPoint>,
}

pub async fn range_summary(
    session: Session,
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let (from, to) = validate_range(params.start_date, params.end_date)?;

    let records = state
        .store
        .records_for_owner(session.user_id, from, to)
        .await;

    Ok(Json(SummaryResponse {
        summary: calculate::summarize(&records),
        regularity: calculate::regularity_series(&records),
    }))
}
