use crate::{albums, favorites, playlists, songs, users};
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use harmony_core::{error::Result, storage::StorageContext, types::*, HarmonyError};
use sqlx::SqlitePool;

/// Local storage context using `SQLite`
#[derive(Clone)]
pub struct LocalStorageContext {
    pool: SqlitePool,
    user_id: UserId,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool, user_id: UserId) -> Self {
        Self { pool, user_id }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Lazily stream the songs of an owned playlist in order
    pub async fn stream_ordered_songs(
        &self,
        playlist_id: PlaylistId,
    ) -> Result<BoxStream<'_, Result<OrderedSong>>> {
        playlists::stream_ordered_songs(&self.pool, playlist_id, self.user_id).await
    }
}

#[async_trait]
impl StorageContext for LocalStorageContext {
    fn user_id(&self) -> UserId {
        self.user_id
    }

    // Users
    async fn current_user(&self) -> Result<User> {
        users::get_by_id(&self.pool, self.user_id)
            .await?
            .ok_or_else(|| HarmonyError::not_found("User", self.user_id))
    }

    async fn update_current_user(&self, update: UpdateUser) -> Result<User> {
        users::update(&self.pool, self.user_id, update).await
    }

    async fn delete_current_user(&self) -> Result<()> {
        users::delete(&self.pool, self.user_id).await
    }

    // Songs
    async fn list_songs(&self, limit: u32, offset: u32) -> Result<SongPage> {
        songs::list(&self.pool, limit, offset).await
    }

    async fn get_song(&self, id: SongId) -> Result<Option<Song>> {
        songs::get_by_id(&self.pool, id).await
    }

    async fn create_song(&self, song: CreateSong) -> Result<Song> {
        songs::create(&self.pool, song).await
    }

    async fn update_song(&self, id: SongId, update: UpdateSong) -> Result<Song> {
        songs::update(&self.pool, id, update).await
    }

    async fn delete_song(&self, id: SongId) -> Result<()> {
        songs::delete(&self.pool, id).await
    }

    async fn search_songs(&self, query: &str) -> Result<Vec<Song>> {
        songs::search(&self.pool, query).await
    }

    // Albums
    async fn featured_albums(&self) -> Result<Vec<Album>> {
        albums::get_featured(&self.pool).await
    }

    // Playlists
    async fn assert_owns_playlist(&self, id: PlaylistId) -> Result<Playlist> {
        playlists::assert_owns_playlist(&self.pool, id, self.user_id).await
    }

    async fn get_user_playlists(&self) -> Result<Vec<Playlist>> {
        playlists::get_user_playlists(&self.pool, self.user_id).await
    }

    async fn get_playlist_with_songs(&self, id: PlaylistId) -> Result<Playlist> {
        playlists::get_with_songs(&self.pool, id, self.user_id).await
    }

    async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        let playlist = CreatePlaylist {
            owner_id: self.user_id,
            name: name.to_string(),
        };
        playlists::create(&self.pool, playlist).await
    }

    async fn update_playlist(&self, id: PlaylistId, update: UpdatePlaylist) -> Result<Playlist> {
        playlists::update(&self.pool, id, update, self.user_id).await
    }

    async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        playlists::delete(&self.pool, id, self.user_id).await
    }

    async fn get_mixes(&self) -> Result<PlaylistMixes> {
        playlists::get_mixes(&self.pool, self.user_id).await
    }

    // Membership and ordering
    async fn add_song_to_playlist(
        &self,
        playlist_id: PlaylistId,
        song_id: SongId,
    ) -> Result<PlaylistEntry> {
        playlists::add_song(&self.pool, playlist_id, song_id, self.user_id).await
    }

    async fn remove_song_from_playlist(
        &self,
        playlist_id: PlaylistId,
        song_id: SongId,
    ) -> Result<PlaylistEntry> {
        playlists::remove_song(&self.pool, playlist_id, song_id, self.user_id).await
    }

    async fn remove_playlist_entry(
        &self,
        playlist_id: PlaylistId,
        entry_id: EntryId,
    ) -> Result<PlaylistEntry> {
        playlists::remove_entry(&self.pool, playlist_id, entry_id, self.user_id).await
    }

    async fn reorder_playlist(&self, playlist_id: PlaylistId, song_ids: Vec<SongId>) -> Result<()> {
        playlists::reorder_songs(&self.pool, playlist_id, &song_ids, self.user_id).await
    }

    async fn reorder_playlist_entries(
        &self,
        playlist_id: PlaylistId,
        entry_ids: Vec<EntryId>,
    ) -> Result<()> {
        playlists::reorder_entries(&self.pool, playlist_id, &entry_ids, self.user_id).await
    }

    async fn move_song(
        &self,
        playlist_id: PlaylistId,
        song_id: SongId,
        new_position: u32,
    ) -> Result<PlaylistEntry> {
        playlists::move_song(&self.pool, playlist_id, song_id, new_position, self.user_id).await
    }

    async fn move_entry(
        &self,
        playlist_id: PlaylistId,
        entry_id: EntryId,
        new_position: u32,
    ) -> Result<PlaylistEntry> {
        playlists::move_entry(&self.pool, playlist_id, entry_id, new_position, self.user_id).await
    }

    async fn get_ordered_songs(&self, playlist_id: PlaylistId) -> Result<Vec<OrderedSong>> {
        playlists::get_ordered_songs(&self.pool, playlist_id, self.user_id).await
    }

    // Favorites
    async fn get_favorites(&self) -> Result<Vec<Song>> {
        favorites::get_for_user(&self.pool, self.user_id).await
    }

    async fn add_favorite(&self, song_id: SongId) -> Result<()> {
        favorites::add(&self.pool, self.user_id, song_id).await
    }

    async fn remove_favorite(&self, song_id: SongId) -> Result<()> {
        favorites::remove(&self.pool, self.user_id, song_id).await
    }
}
