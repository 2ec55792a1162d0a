/// Account API routes for the authenticated user
use crate::{
    error::{Result, ServerError},
    extract::ApiJson,
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use harmony_core::{
    storage::StorageContext,
    types::{UpdateUser, User},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// GET /api/users/me
pub async fn get_me(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<User>> {
    let user = app_state.storage(auth.user_id()).current_user().await?;
    Ok(Json(user))
}

/// PATCH /api/users/me
pub async fn update_me(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<User>> {
    let password_hash = match req.password.as_deref() {
        Some("") => {
            return Err(ServerError::BadRequest(
                "Password must not be empty".to_string(),
            ))
        }
        Some(password) => Some(app_state.auth_service.hash_password(password)?),
        None => None,
    };

    let update = UpdateUser {
        username: req.username,
        email: req.email,
        password_hash,
    };
    if update.is_empty() {
        return Err(ServerError::BadRequest("No fields to update".to_string()));
    }

    let user = app_state
        .storage(auth.user_id())
        .update_current_user(update)
        .await?;
    tracing::info!(user_id = %user.id, "User updated");
    Ok(Json(user))
}

/// DELETE /api/users/me
/// Deletes the account together with its playlists and favorites
pub async fn delete_me(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    app_state
        .storage(auth.user_id())
        .delete_current_user()
        .await?;
    app_state.players.write().await.remove(&auth.user_id());
    tracing::info!(user_id = %auth.user_id(), "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
