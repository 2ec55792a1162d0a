//! Song catalog types

use super::ids::SongId;
use crate::error::{HarmonyError, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// A song in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    /// Duration in whole seconds
    pub duration: u32,
    /// Location of the audio file; unique, fixed once the song exists
    pub file_path: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new song
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSong {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    pub duration: u32,
    pub file_path: String,
}

impl CreateSong {
    /// Check the required fields are present
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(HarmonyError::invalid_input("title is required"));
        }
        if self.artist.trim().is_empty() {
            return Err(HarmonyError::invalid_input("artist is required"));
        }
        if self.file_path.trim().is_empty() {
            return Err(HarmonyError::invalid_input("file_path is required"));
        }
        Ok(())
    }
}

/// Partial update for a song (all fields optional).
///
/// `album` distinguishes "leave as is" (`None`) from "clear it"
/// (`Some(None)`, sent as an explicit JSON `null`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSong {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub album: Option<Option<String>>,
    #[serde(default)]
    pub duration: Option<u32>,
}

impl UpdateSong {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.album.is_none()
            && self.duration.is_none()
    }

    /// Reject updates that would blank out required fields
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(HarmonyError::invalid_input("no fields to update"));
        }
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(HarmonyError::invalid_input("title cannot be empty"));
        }
        if self.artist.as_deref().is_some_and(|a| a.trim().is_empty()) {
            return Err(HarmonyError::invalid_input("artist cannot be empty"));
        }
        Ok(())
    }

    /// Merge the supplied fields onto a stored song
    pub fn apply_to(&self, song: &mut Song) {
        if let Some(title) = &self.title {
            song.title.clone_from(title);
        }
        if let Some(artist) = &self.artist {
            song.artist.clone_from(artist);
        }
        if let Some(album) = &self.album {
            song.album.clone_from(album);
        }
        if let Some(duration) = self.duration {
            song.duration = duration;
        }
    }
}

/// One page of the song catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongPage {
    pub songs: Vec<Song>,
    pub total: i64,
    pub limit: u32,
    pub offset: u32,
}

/// Maps a present field (even `null`) to `Some`, so absence stays `None`.
fn deserialize_present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_song() -> Song {
        Song {
            id: SongId::new(1),
            title: "So What".to_string(),
            artist: "Miles Davis".to_string(),
            album: Some("Kind of Blue".to_string()),
            duration: 562,
            file_path: "/music/so-what.mp3".to_string(),
            created_at: "2024-01-01 00:00:00".to_string(),
            updated_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn create_song_requires_title_artist_and_path() {
        let mut song = CreateSong {
            title: "Freddie Freeloader".to_string(),
            artist: "Miles Davis".to_string(),
            album: None,
            duration: 589,
            file_path: "/music/freddie.mp3".to_string(),
        };
        assert!(song.validate().is_ok());

        song.artist = "  ".to_string();
        assert!(matches!(song.validate(), Err(HarmonyError::InvalidInput(_))));
    }

    #[test]
    fn update_merges_only_supplied_fields() {
        let mut song = stored_song();
        let update = UpdateSong {
            title: Some("So What (Live)".to_string()),
            duration: Some(600),
            ..Default::default()
        };

        update.apply_to(&mut song);

        assert_eq!(song.title, "So What (Live)");
        assert_eq!(song.duration, 600);
        assert_eq!(song.artist, "Miles Davis");
        assert_eq!(song.album.as_deref(), Some("Kind of Blue"));
        assert_eq!(song.file_path, "/music/so-what.mp3");
    }

    #[test]
    fn explicit_null_album_clears_it() {
        let update: UpdateSong = serde_json::from_str(r#"{"album": null}"#).unwrap();
        assert_eq!(update.album, Some(None));

        let mut song = stored_song();
        update.apply_to(&mut song);
        assert_eq!(song.album, None);
    }

    #[test]
    fn absent_album_is_left_alone() {
        let update: UpdateSong = serde_json::from_str(r#"{"title": "Other"}"#).unwrap();
        assert_eq!(update.album, None);
        assert!(!update.is_empty());
    }

    #[test]
    fn empty_update_is_rejected() {
        let update = UpdateSong::default();
        assert!(matches!(update.validate(), Err(HarmonyError::InvalidInput(_))));
    }
}
