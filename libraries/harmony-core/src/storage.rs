//! Storage trait bound to one acting user

use crate::error::Result;
use crate::types::{
    Album, CreateSong, EntryId, OrderedSong, Playlist, PlaylistEntry, PlaylistId, PlaylistMixes,
    Song, SongId, SongPage, UpdatePlaylist, UpdateSong, UpdateUser, User, UserId,
};
use async_trait::async_trait;

/// Storage context providing access to database operations
///
/// Every method acts on behalf of [`StorageContext::user_id`]. Playlist
/// operations treat a playlist owned by somebody else exactly like a missing
/// one, so implementations must never reveal whether a foreign playlist exists.
#[async_trait]
pub trait StorageContext: Send + Sync {
    /// Get the current user ID
    fn user_id(&self) -> UserId;

    // ========================================================================
    // Users
    // ========================================================================

    /// Get the acting user's account
    async fn current_user(&self) -> Result<User>;

    /// Apply a partial update to the acting user's account
    async fn update_current_user(&self, update: UpdateUser) -> Result<User>;

    /// Delete the acting user (cascades playlists and favorites)
    async fn delete_current_user(&self) -> Result<()>;

    // ========================================================================
    // Songs
    // ========================================================================

    /// Get one page of the catalog
    async fn list_songs(&self, limit: u32, offset: u32) -> Result<SongPage>;

    /// Get song by ID
    async fn get_song(&self, id: SongId) -> Result<Option<Song>>;

    /// Create a new song
    async fn create_song(&self, song: CreateSong) -> Result<Song>;

    /// Update a song
    async fn update_song(&self, id: SongId, update: UpdateSong) -> Result<Song>;

    /// Delete a song, removing it from every playlist
    async fn delete_song(&self, id: SongId) -> Result<()>;

    /// Search songs by title, artist or album
    async fn search_songs(&self, query: &str) -> Result<Vec<Song>>;

    // ========================================================================
    // Albums
    // ========================================================================

    /// Random sample of albums for the home screen
    async fn featured_albums(&self) -> Result<Vec<Album>>;

    // ========================================================================
    // Playlists
    // ========================================================================

    /// Fail with `PlaylistNotFound` unless the acting user owns the playlist
    async fn assert_owns_playlist(&self, id: PlaylistId) -> Result<Playlist>;

    /// Get the acting user's playlists, most recently updated first
    async fn get_user_playlists(&self) -> Result<Vec<Playlist>>;

    /// Get playlist with its songs in order
    async fn get_playlist_with_songs(&self, id: PlaylistId) -> Result<Playlist>;

    /// Create a new playlist owned by the acting user
    async fn create_playlist(&self, name: &str) -> Result<Playlist>;

    /// Rename a playlist
    async fn update_playlist(&self, id: PlaylistId, update: UpdatePlaylist) -> Result<Playlist>;

    /// Delete playlist
    async fn delete_playlist(&self, id: PlaylistId) -> Result<()>;

    /// The acting user's non-empty playlists, split into daily mixes and the rest
    async fn get_mixes(&self) -> Result<PlaylistMixes>;

    // ========================================================================
    // Playlist membership and ordering
    // ========================================================================

    /// Append a song to the end of a playlist
    async fn add_song_to_playlist(
        &self,
        playlist_id: PlaylistId,
        song_id: SongId,
    ) -> Result<PlaylistEntry>;

    /// Remove the first occurrence of a song and close the gap
    async fn remove_song_from_playlist(
        &self,
        playlist_id: PlaylistId,
        song_id: SongId,
    ) -> Result<PlaylistEntry>;

    /// Remove one specific membership row and close the gap
    async fn remove_playlist_entry(
        &self,
        playlist_id: PlaylistId,
        entry_id: EntryId,
    ) -> Result<PlaylistEntry>;

    /// Replace the whole order; index `i` becomes position `i + 1`
    async fn reorder_playlist(&self, playlist_id: PlaylistId, song_ids: Vec<SongId>)
        -> Result<()>;

    /// Replace the whole order by membership row
    async fn reorder_playlist_entries(
        &self,
        playlist_id: PlaylistId,
        entry_ids: Vec<EntryId>,
    ) -> Result<()>;

    /// Move the first occurrence of a song to `new_position`
    async fn move_song(
        &self,
        playlist_id: PlaylistId,
        song_id: SongId,
        new_position: u32,
    ) -> Result<PlaylistEntry>;

    /// Move one membership row to `new_position`
    async fn move_entry(
        &self,
        playlist_id: PlaylistId,
        entry_id: EntryId,
        new_position: u32,
    ) -> Result<PlaylistEntry>;

    /// Songs of a playlist in playlist order
    async fn get_ordered_songs(&self, playlist_id: PlaylistId) -> Result<Vec<OrderedSong>>;

    // ========================================================================
    // Favorites
    // ========================================================================

    /// Get the acting user's favorite songs, newest first
    async fn get_favorites(&self) -> Result<Vec<Song>>;

    /// Mark a song as favorite (no-op when it already is)
    async fn add_favorite(&self, song_id: SongId) -> Result<()>;

    /// Unmark a favorite song
    async fn remove_favorite(&self, song_id: SongId) -> Result<()>;
}
