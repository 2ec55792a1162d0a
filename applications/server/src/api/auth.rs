/// Authentication API routes
use crate::{
    error::{Result, ServerError},
    extract::ApiJson,
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use harmony_core::types::{CreateUser, User};
use harmony_storage::users;
use serde::{Deserialize, Serialize};

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
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /api/auth/register
pub async fn register(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<LoginResponse>)> {
    if req.password.is_empty() {
        return Err(ServerError::BadRequest("Password is required".to_string()));
    }

    let password_hash = app_state.auth_service.hash_password(&req.password)?;
    let user = users::create(
        &app_state.pool,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(issue_tokens(&app_state, user)?)))
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ServerError::BadRequest(
            "Missing email or password".to_string(),
        ));
    }

    let credentials = users::find_by_email(&app_state.pool, &req.email)
        .await?
        .ok_or_else(|| ServerError::Auth("Invalid email or password".to_string()))?;

    if !app_state
        .auth_service
        .verify_password(&req.password, &credentials.password_hash)?
    {
        return Err(ServerError::Auth("Invalid email or password".to_string()));
    }

    tracing::info!(user_id = %credentials.user.id, "User logged in");

    Ok(Json(issue_tokens(&app_state, credentials.user)?))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    let user_id = app_state
        .auth_service
        .verify_refresh_token(&req.refresh_token)?;

    // Only accounts that still exist get a new access token
    users::get_by_id(&app_state.pool, user_id)
        .await?
        .ok_or_else(|| ServerError::Auth("Unknown user".to_string()))?;

    let access_token = app_state.auth_service.create_access_token(user_id)?;

    Ok(Json(RefreshResponse {
        access_token,
        token_type: "Bearer".to_string(),
    }))
}

fn issue_tokens(app_state: &AppState, user: User) -> Result<LoginResponse> {
    Ok(LoginResponse {
        access_token: app_state.auth_service.create_access_token(user.id)?,
        refresh_token: app_state.auth_service.create_refresh_token(user.id)?,
        token_type: "Bearer".to_string(),
        user,
    })
}
