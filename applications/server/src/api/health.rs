/// Health check API routes
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// GET /api/health - Liveness plus a database round trip
pub async fn health(State(app_state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = sqlx::query("SELECT 1")
        .execute(&app_state.pool)
        .await
        .map_err(|e| tracing::warn!("Health check query failed: {}", e))
        .is_ok();

    let (status, label) = if database_ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthResponse {
            status: label,
            version: env!("CARGO_PKG_VERSION"),
            database: if database_ok { "ok" } else { "unavailable" },
        }),
    )
}
