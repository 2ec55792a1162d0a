//! Harmony Server Library
//!
//! Multi-user HTTP API for the song catalog, playlists with ordered
//! membership, favorites, uploads and streaming.
//!
//! This library exposes the router and its components so tests can drive
//! the exact application the binary serves.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{auth::AuthService, file_storage::FileStorage};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Largest accepted upload body
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Build the full application router
pub fn create_router(app_state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/refresh", post(api::auth::refresh));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Songs
        .route(
            "/songs",
            get(api::songs::list_songs).post(api::songs::create_song),
        )
        .route(
            "/songs/:id",
            get(api::songs::get_song)
                .patch(api::songs::update_song)
                .delete(api::songs::delete_song),
        )
        .route("/search", get(api::songs::search_songs))
        .route("/albums/featured", get(api::songs::featured_albums))
        .route(
            "/upload",
            post(api::upload::upload_song).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // Streaming
        .route("/stream/:song_id", get(api::stream::stream_song))
        // Playlists
        .route(
            "/playlists",
            get(api::playlists::list_playlists).post(api::playlists::create_playlist),
        )
        .route("/playlists/mixes", get(api::playlists::get_mixes))
        .route(
            "/playlists/:id",
            get(api::playlists::get_playlist)
                .patch(api::playlists::update_playlist)
                .delete(api::playlists::delete_playlist),
        )
        .route(
            "/playlists/:id/songs",
            get(api::playlists::list_songs).post(api::playlists::add_song),
        )
        .route(
            "/playlists/:id/songs/stream",
            get(api::playlists::stream_songs),
        )
        .route(
            "/playlists/:id/songs/:song_id",
            axum::routing::delete(api::playlists::remove_song).patch(api::playlists::move_song),
        )
        .route(
            "/playlists/:id/entries/:entry_id",
            axum::routing::delete(api::playlists::remove_entry)
                .patch(api::playlists::move_entry),
        )
        .route("/playlists/:id/order", put(api::playlists::reorder))
        // Favorites
        .route("/favorites", get(api::favorites::list_favorites))
        .route(
            "/favorites/:song_id",
            put(api::favorites::add_favorite).delete(api::favorites::remove_favorite),
        )
        // Account
        .route(
            "/users/me",
            get(api::users::get_me)
                .patch(api::users::update_me)
                .delete(api::users::delete_me),
        )
        // Player
        .route(
            "/player",
            get(api::player::get_player)
                .put(api::player::play)
                .delete(api::player::stop),
        )
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.auth_service),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
