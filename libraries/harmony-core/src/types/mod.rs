mod album;
mod ids;
mod playlist;
mod song;
mod user;

pub use album::Album;
pub use ids::{EntryId, PlaylistId, SongId, UserId};
pub use playlist::{CreatePlaylist, OrderedSong, Playlist, PlaylistEntry, PlaylistMixes, UpdatePlaylist};
pub use song::{CreateSong, Song, SongPage, UpdateSong};
pub use user::{CreateUser, UpdateUser, User, UserCredentials};
