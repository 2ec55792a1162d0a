//! "Now playing" state
//!
//! An explicit container for the track a listener is currently playing.
//! Only the owner of a `PlayerState` can change it; shared access goes
//! through whatever lock the owner wraps it in.

use crate::types::SongId;
use serde::{Deserialize, Serialize};

/// The track shown in the player bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    /// Song being played
    pub song_id: SongId,
    /// Song title
    pub title: String,
    /// Song artist
    pub artist: String,
    /// Artwork URL, if the client has one
    #[serde(default)]
    pub cover_image: Option<String>,
}

/// Owner of the "currently playing" value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerState {
    current: Option<NowPlaying>,
}

impl PlayerState {
    /// Create an empty player (nothing playing)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn currently_playing(&self) -> Option<&NowPlaying> {
        self.current.as_ref()
    }

    /// Replace the current track, returning the one it displaced
    pub fn set_currently_playing(&mut self, track: NowPlaying) -> Option<NowPlaying> {
        self.current.replace(track)
    }

    /// Stop showing a track; returns what was playing
    pub fn clear(&mut self) -> Option<NowPlaying> {
        self.current.take()
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }
}
