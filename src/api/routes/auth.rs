//! Account registration, login, and deletion.

use std::sync::OnceLock;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::auth::{self, Session};
use crate::models::{User, UserProfile};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles"))
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let username = payload.username.trim();
    let email = payload.email.trim();

    if username.is_empty() || email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest(
            "username, email and password are all required".to_string(),
        ));
    }
    if payload.password.len() < 6 {
        return Err(ApiError::BadRequest(
            "password must be at least 6 characters".to_string(),
        ));
    }
    if !email_regex().is_match(email) {
        return Err(ApiError::BadRequest(format!(
            "not a valid email address: {}",
            email
        )));
    }

    let salt = auth::generate_salt();
    let hash = auth::hash_password(&payload.password, &salt);
    let user = state
        .store
        .create_user(User::new(
            username.to_string(),
            email.to_string(),
            hash,
            salt,
        ))
        .await?;

    tracing::info!("Registered account {} ({})", user.id, user.email);

    let token = state.signer.issue(user.id);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserProfile::from(&user),
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let invalid = || ApiError::Unauthorized("invalid credentials".to_string());

    let user = state
        .store
        .user_by_email(payload.email.trim())
        .await
        .ok_or_else(invalid)?;

    if !auth::verify_password(&payload.password, &user.password_salt, &user.password_hash) {
        return Err(invalid());
    }

    let token = state.signer.issue(user.id);
    Ok(Json(AuthResponse {
        user: UserProfile::from(&user),
        token,
    }))
}

/// Delete the authenticated account and all of its sleep records.
pub async fn delete_account(
    session: Session,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_user(session.user_id).await? {
        tracing::info!("Deleted account {} (cascade)", session.user_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("account not found".to_string()))
    }
}
