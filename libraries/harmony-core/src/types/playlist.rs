//! Playlist and playlist membership types

use super::ids::{EntryId, PlaylistId, SongId, UserId};
use super::song::Song;
use crate::error::{HarmonyError, Result};
use serde::{Deserialize, Serialize};

/// Playlist owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub owner_id: UserId,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,

    /// Songs in playlist order (optional, populated when requested)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub songs: Option<Vec<OrderedSong>>,
}

/// Data for creating a new playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylist {
    pub owner_id: UserId,
    pub name: String,
}

impl CreatePlaylist {
    /// Check the playlist has a usable name
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

/// Partial update for a playlist
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlaylist {
    #[serde(default)]
    pub name: Option<String>,
}

impl UpdatePlaylist {
    /// Reject empty updates and blank names
    pub fn validate(&self) -> Result<()> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Err(HarmonyError::invalid_input("no fields to update")),
        }
    }

    /// Merge the supplied fields onto a stored playlist
    pub fn apply_to(&self, playlist: &mut Playlist) {
        if let Some(name) = &self.name {
            playlist.name.clone_from(name);
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(HarmonyError::invalid_input("playlist name is required"));
    }
    Ok(())
}

/// One membership row: song `song_id` sits at `position` in `playlist_id`.
///
/// Positions are 1-based and, for any playlist, always form `1..=N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub id: EntryId,
    pub playlist_id: PlaylistId,
    pub song_id: SongId,
    pub position: u32,
    pub created_at: String,
}

/// A song as it appears in a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedSong {
    pub entry_id: EntryId,
    pub position: u32,
    #[serde(flatten)]
    pub song: Song,
}

/// The user's playlists grouped the way the home screen shows them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistMixes {
    pub daily_mix: Vec<Playlist>,
    pub playlists: Vec<Playlist>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(name: &str) -> Playlist {
        Playlist {
            id: PlaylistId::new(1),
            owner_id: UserId::new(1),
            name: name.to_string(),
            created_at: String::new(),
            updated_at: String::new(),
            songs: None,
        }
    }

    #[test]
    fn blank_names_are_rejected() {
        let create = CreatePlaylist {
            owner_id: UserId::new(1),
            name: "   ".to_string(),
        };
        assert!(matches!(create.validate(), Err(HarmonyError::InvalidInput(_))));
    }

    #[test]
    fn rename_applies_new_name() {
        let mut stored = playlist("Road trip");
        let update = UpdatePlaylist {
            name: Some("Road trip 2024".to_string()),
        };
        assert!(update.validate().is_ok());

        update.apply_to(&mut stored);
        assert_eq!(stored.name, "Road trip 2024");
    }

    #[test]
    fn playlist_without_songs_omits_the_field() {
        let json = serde_json::to_value(playlist("Focus")).unwrap();
        assert!(json.get("songs").is_none());
    }

    #[test]
    fn ordered_song_flattens_song_fields() {
        let ordered = OrderedSong {
            entry_id: EntryId::new(5),
            position: 2,
            song: Song {
                id: SongId::new(9),
                title: "Naima".to_string(),
                artist: "John Coltrane".to_string(),
                album: None,
                duration: 261,
                file_path: "/music/naima.mp3".to_string(),
                created_at: String::new(),
                updated_at: String::new(),
            },
        };

        let json = serde_json::to_value(&ordered).unwrap();
        assert_eq!(json["entry_id"], 5);
        assert_eq!(json["position"], 2);
        assert_eq!(json["title"], "Naima");
        assert_eq!(json["id"], 9);
    }
}
