//! Sleep record CRUD.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use super::validate_range;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::auth::Session;
use crate::clock;
use crate::models::{RecentWindow, RecordId, SleepRecord};

/// One night as submitted by the client. The duration is always derived
/// server-side; there is no field for it.
#[derive(Debug, Deserialize)]
pub struct RecordPayload {
    pub sleep_date: NaiveDate,
    pub bedtime: String,
    pub wake_time: String,
    pub quality: u8,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<usize>,
}

pub async fn create_record(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<RecordPayload>,
) -> Result<(StatusCode, Json<SleepRecord>), ApiError> {
    let bedtime = clock::parse_time_of_day(&payload.bedtime)?;
    let wake_time = clock::parse_time_of_day(&payload.wake_time)?;

    let record = SleepRecord::new(
        session.user_id,
        payload.sleep_date,
        bedtime,
        wake_time,
        payload.quality,
        payload.notes,
    )?;

    let record = state.store.insert_record(record).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_records(
    session: Session,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<SleepRecord>>, ApiError> {
    let (from, to) = validate_range(params.start_date, params.end_date)?;

    let records = state
        .store
        .records_for_owner(session.user_id, from, to)
        .await;

    // `limit` asks for only the newest N: run the full set (oldest
    // first) through a bounded window so the oldest fall off the back.
    let records = match params.limit {
        Some(limit) => {
            let mut window = RecentWindow::new(limit);
            for record in records.into_iter().rev() {
                window.push_front(record);
            }
            window.into_vec()
        }
        None => records,
    };

    Ok(Json(records))
}

pub async fn get_record(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<SleepRecord>, ApiError> {
    state
        .store
        .record_for_owner(session.user_id, id)
        .await
        .map(Json)
        .ok_or_else(|| not_found(id))
}

pub async fn update_record(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(payload): Json<RecordPayload>,
) -> Result<Json<SleepRecord>, ApiError> {
    let bedtime = clock::parse_time_of_day(&payload.bedtime)?;
    let wake_time = clock::parse_time_of_day(&payload.wake_time)?;

    let mut record = state
        .store
        .record_for_owner(session.user_id, id)
        .await
        .ok_or_else(|| not_found(id))?;

    record.apply_edit(
        payload.sleep_date,
        bedtime,
        wake_time,
        payload.quality,
        payload.notes,
    )?;

    state
        .store
        .replace_record(session.user_id, record)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

pub async fn delete_record(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_record(session.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

fn not_found(id: RecordId) -> ApiError {
    ApiError::NotFound(format!("sleep record {}", id))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{create_record, register, send_json, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_derives_duration() {
        let app = test_app();
        let token = register(&app.router, "a@example.com").await;

        let body = create_record(&app.router, &token, "2025-07-01", "23:00", "07:00", 4).await;

        assert_eq!(body["duration"], "8h 0m");
        assert_eq!(body["bedtime"], "23:00");
        assert_eq!(body["quality"], 4);
    }

    #[tokio::test]
    async fn test_create_ignores_client_supplied_duration() {
        let app = test_app();
        let token = register(&app.router, "a@example.com").await;

        let (status, body) = send_json(
            &app.router,
            "POST",
            "/api/sleep",
            Some(&token),
            Some(json!({
                "sleep_date": "2025-07-01",
                "bedtime": "23:00",
                "wake_time": "07:00",
                "quality": 4,
                "duration": "99h 0m",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["duration"], "8h 0m");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_time() {
        let app = test_app();
        let token = register(&app.router, "a@example.com").await;

        let (status, body) = send_json(
            &app.router,
            "POST",
            "/api/sleep",
            Some(&token),
            Some(json!({
                "sleep_date": "2025-07-01",
                "bedtime": "25:00",
                "wake_time": "07:00",
                "quality": 4,
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_quality() {
        let app = test_app();
        let token = register(&app.router, "a@example.com").await;

        let (status, _) = send_json(
            &app.router,
            "POST",
            "/api/sleep",
            Some(&token),
            Some(json!({
                "sleep_date": "2025-07-01",
                "bedtime": "23:00",
                "wake_time": "07:00",
                "quality": 6,
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_requires_auth() {
        let app = test_app();

        let (status, _) = send_json(&app.router, "GET", "/api/sleep", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send_json(
            &app.router,
            "GET",
            "/api/sleep",
            Some("bogus-token"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_filters_by_range() {
        let app = test_app();
        let token = register(&app.router, "a@example.com").await;

        for day in ["2025-07-01", "2025-07-05", "2025-07-10"] {
            create_record(&app.router, &token, day, "23:00", "07:00", 3).await;
        }

        let (status, body) = send_json(
            &app.router,
            "GET",
            "/api/sleep?start_date=2025-07-02&end_date=2025-07-10",
            Some(&token),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 2);
        // Newest first.
        assert_eq!(records[0]["sleep_date"], "2025-07-10");
    }

    #[tokio::test]
    async fn test_list_rejects_half_open_range() {
        let app = test_app();
        let token = register(&app.router, "a@example.com").await;

        let (status, _) = send_json(
            &app.router,
            "GET",
            "/api/sleep?start_date=2025-07-02",
            Some(&token),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_limit_keeps_newest() {
        let app = test_app();
        let token = register(&app.router, "a@example.com").await;

        for day in 1..=7 {
            let date = format!("2025-07-{:02}", day);
            create_record(&app.router, &token, &date, "23:00", "07:00", 3).await;
        }

        let (status, body) =
            send_json(&app.router, "GET", "/api/sleep?limit=5", Some(&token), None).await;

        assert_eq!(status, StatusCode::OK);
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0]["sleep_date"], "2025-07-07");
        assert_eq!(records[4]["sleep_date"], "2025-07-03");
    }

    #[tokio::test]
    async fn test_get_is_owner_scoped() {
        let app = test_app();
        let alice = register(&app.router, "alice@example.com").await;
        let bob = register(&app.router, "bob@example.com").await;

        let record = create_record(&app.router, &alice, "2025-07-01", "23:00", "07:00", 4).await;
        let id = record["id"].as_str().unwrap();
        let uri = format!("/api/sleep/{}", id);

        let (status, _) = send_json(&app.router, "GET", &uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK);

        // Another account sees 404, not 403: record existence is not
        // revealed across owners.
        let (status, _) = send_json(&app.router, "GET", &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_recomputes_duration() {
        let app = test_app();
        let token = register(&app.router, "a@example.com").await;

        let record = create_record(&app.router, &token, "2025-07-01", "23:00", "07:00", 4).await;
        let uri = format!("/api/sleep/{}", record["id"].as_str().unwrap());

        let (status, body) = send_json(
            &app.router,
            "PUT",
            &uri,
            Some(&token),
            Some(json!({
                "sleep_date": "2025-07-01",
                "bedtime": "22:15",
                "wake_time": "06:00",
                "quality": 2,
                "notes": "restless",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["duration"], "7h 45m");
        assert_eq!(body["quality"], 2);
        assert_eq!(body["created_at"], record["created_at"]);
    }

    #[tokio::test]
    async fn test_delete_record() {
        let app = test_app();
        let token = register(&app.router, "a@example.com").await;

        let record = create_record(&app.router, &token, "2025-07-01", "23:00", "07:00", 4).await;
        let uri = format!("/api/sleep/{}", record["id"].as_str().unwrap());

        let (status, _) = send_json(&app.router, "DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send_json(&app.router, "DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
