//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use harmony_server::{
    create_router,
    services::{AuthService, FileStorage},
    state::AppState,
};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Test user credentials
pub mod fixtures {
    pub const TEST_PASSWORD: &str = "TestPassword123!";
    pub const JWT_SECRET: &str = "test-secret-key";
}

/// The full application over a real SQLite file and a temporary media directory
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub media_dir: TempDir,
    _db_dir: TempDir,
}

/// A registered account and its access token
pub struct TestUser {
    pub id: i64,
    pub token: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_dir = TempDir::new().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", db_dir.path().join("test.db").display());
        let pool = harmony_storage::connect(&db_url)
            .await
            .expect("Failed to open test database");

        let media_dir = TempDir::new().expect("Failed to create media dir");
        let file_storage = FileStorage::new(media_dir.path().to_path_buf());
        file_storage.initialize().await.expect("Failed to init media dir");

        let auth_service = Arc::new(
            AuthService::new(fixtures::JWT_SECRET.to_string(), 1, 1).with_bcrypt_cost(4),
        );

        let app_state = AppState::new(pool.clone(), Arc::clone(&auth_service), Arc::new(file_storage));

        Self {
            router: create_router(app_state),
            pool,
            auth_service,
            media_dir,
            _db_dir: db_dir,
        }
    }

    /// Send a request and return status plus parsed JSON body (`Null` when empty)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    /// Register through the API and return the new account
    pub async fn register(&self, username: &str) -> TestUser {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": fixtures::TEST_PASSWORD,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

        TestUser {
            id: body["user"]["id"].as_i64().unwrap(),
            token: body["access_token"].as_str().unwrap().to_string(),
        }
    }

    /// Create a song through the API and return its id
    pub async fn create_song(&self, token: &str, title: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/songs",
                token,
                serde_json::json!({
                    "title": title,
                    "artist": "Test Artist",
                    "album": "Test Album",
                    "duration": 200,
                    "file_path": format!("{}.mp3", title.to_lowercase().replace(' ', "-")),
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create song failed: {body}");
        body["id"].as_i64().unwrap()
    }

    /// Create a playlist through the API and return its id
    pub async fn create_playlist(&self, token: &str, name: &str) -> i64 {
        let (status, body) = self
            .post("/api/playlists", token, serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create playlist failed: {body}");
        body["id"].as_i64().unwrap()
    }

    /// Song ids of a playlist in order, as served by the API
    pub async fn playlist_order(&self, token: &str, playlist_id: i64) -> Vec<i64> {
        let (status, body) = self
            .get(&format!("/api/playlists/{playlist_id}/songs"), token)
            .await;
        assert_eq!(status, StatusCode::OK, "list songs failed: {body}");
        body.as_array()
            .unwrap()
            .iter()
            .map(|song| song["id"].as_i64().unwrap())
            .collect()
    }
}
