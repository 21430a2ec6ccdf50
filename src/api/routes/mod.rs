//! Route handlers and router assembly.

pub mod auth;
pub mod health;
pub mod records;
pub mod summary;
pub mod tips;

use axum::routing::{delete, get, post};
use axum::Router;
use chrono::NaiveDate;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::state::AppState;
use super::ApiError;

/// Assemble the full API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/account", delete(auth::delete_account))
        .route(
            "/api/sleep",
            post(records::create_record).get(records::list_records),
        )
        .route("/api/sleep/summary", get(summary::range_summary))
        .route("/api/sleep/tips", post(tips::generate_tips))
        .route(
            "/api/sleep/:id",
            get(records::get_record)
                .put(records::update_record)
                .delete(records::delete_record),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Check that a date range is either absent or fully specified, with
/// start not after end.
pub(crate) fn validate_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ApiError> {
    match (start, end) {
        (Some(s), Some(e)) if s > e => Err(ApiError::BadRequest(
            "start_date must not be after end_date".to_string(),
        )),
        (Some(_), None) | (None, Some(_)) => Err(ApiError::BadRequest(
            "start_date and end_date must be provided together".to_string(),
        )),
        range => Ok(range),
    }
}


#[cfg(test)]
mod tests {
    use super::validate_range;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(None, None).is_ok());
        assert!(validate_range(Some(d("2025-07-01")), Some(d("2025-07-14"))).is_ok());
        assert!(validate_range(Some(d("2025-07-14")), Some(d("2025-07-01"))).is_err());
        assert!(validate_range(Some(d("2025-07-01")), None).is_err());
        assert!(validate_range(None, Some(d("2025-07-01"))).is_err());
    }
}
