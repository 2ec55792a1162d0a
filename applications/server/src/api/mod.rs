/// API route modules
pub mod auth;
pub mod favorites;
pub mod health;
pub mod player;
pub mod playlists;
pub mod songs;
pub mod stream;
pub mod upload;
pub mod users;
