use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

pub type TrackId = i64;
pub type ArtistId = i64;
pub type PlaylistId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub artist_id: Option<ArtistId>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub id: ArtistId,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub track_count: Option<u32>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
}

/// Persisted login record, stored exactly as the login endpoint returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub id: PlaylistId,
    pub name: String,
    pub visibility: String,
    pub owner: String,
    pub created: String,
}

#[derive(Tabled)]
pub struct AlbumTableRow {
    pub name: String,
    pub tracks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistDetail {
    pub playlist: Playlist,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRequest {
    #[serde(rename = "trackId")]
    pub track_id: TrackId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPlaylistTrackRequest {
    #[serde(rename = "trackId")]
    pub track_id: TrackId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

/// Error body the server sends alongside non-2xx statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}

/// Which list a track view (and therefore a queue) was produced from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewSource {
    ArtistTracks(ArtistId),
    Album { artist_id: ArtistId, name: String },
    Favorites,
    Playlist(PlaylistId),
}

impl std::fmt::Display for ViewSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewSource::ArtistTracks(id) => write!(f, "artist {}", id),
            ViewSource::Album { artist_id, name } => write!(f, "album '{}' of artist {}", name, artist_id),
            ViewSource::Favorites => write!(f, "favorites"),
            ViewSource::Playlist(id) => write!(f, "playlist {}", id),
        }
    }
}
