//! Harmony Core
//!
//! Platform-agnostic domain types, traits, and error handling for Harmony.
//!
//! This crate provides the foundational building blocks shared by the storage
//! layer and the HTTP server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Song`, `Playlist`, `PlaylistEntry`, `User`, etc.
//! - **Storage Trait**: `StorageContext`, a storage view bound to one acting user
//! - **Player State**: `PlayerState`, the "currently playing" container
//! - **Error Handling**: Unified `HarmonyError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use harmony_core::types::{CreateSong, SongId, UpdateSong};
//!
//! let song = CreateSong {
//!     title: "Blue in Green".to_string(),
//!     artist: "Miles Davis".to_string(),
//!     album: Some("Kind of Blue".to_string()),
//!     duration: 337,
//!     file_path: "/music/blue-in-green.mp3".to_string(),
//! };
//! assert!(song.validate().is_ok());
//!
//! let update = UpdateSong::default();
//! assert!(update.is_empty());
//! assert_eq!(SongId::new(7).get(), 7);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod player;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{HarmonyError, Result};
pub use player::{NowPlaying, PlayerState};
pub use storage::StorageContext;

pub use types::{
    Album, CreatePlaylist, CreateSong, CreateUser, EntryId, OrderedSong, Playlist, PlaylistEntry,
    PlaylistId, PlaylistMixes, Song, SongId, SongPage, UpdatePlaylist, UpdateSong, UpdateUser,
    User, UserCredentials, UserId,
};
