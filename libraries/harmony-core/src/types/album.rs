//! Album types

use serde::{Deserialize, Serialize};

/// An album, derived from the songs that name it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub title: String,
    pub artist: String,
    pub song_count: i64,
}
