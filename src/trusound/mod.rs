//! # TruSoundCloud Integration Module
//!
//! This module is the API Gateway of the client: the only place that performs
//! HTTP requests against the TruSoundCloud server. Everything above it talks to
//! the [`ApiGateway`] trait, so the session store, the catalog and the player
//! can be exercised against an in-memory double.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, Management, Playback)
//!          ↓
//! ApiGateway trait
//!     ├── HttpGateway (reqwest, JSON, bearer token)
//!     └── StreamUrlBuilder (token in the query string)
//!          ↓
//! TruSoundCloud REST API
//! ```
//!
//! ## Authentication
//!
//! Every call except `login` carries `Authorization: Bearer <token>` taken
//! from the current session. Stream URLs cannot carry headers because they are
//! handed to an audio player as-is, so the token travels as a `token` query
//! parameter instead.
//!
//! ## API Coverage
//!
//! - `POST /trusound/login`
//! - `GET /TruSoundCloud/artists`, `GET /TruSoundCloud/artists/{id}`
//! - `GET /TruSoundCloud/artists/{id}/tracks`, `GET /TruSoundCloud/artists/{id}/albums`
//! - `GET /TruSoundCloud/tracks/{id}`, `GET /TruSoundCloud/tracks/{id}/stream`
//! - `GET|POST /TruSoundCloud/favorites`, `DELETE /TruSoundCloud/favorites/{trackId}`
//! - `GET /TruSoundCloud/playlists/mine`, `GET /TruSoundCloud/playlists/public`
//! - `POST /TruSoundCloud/playlists`, `GET|DELETE /TruSoundCloud/playlists/{id}`
//! - `POST /TruSoundCloud/playlists/{id}/tracks`, `DELETE /TruSoundCloud/playlists/{id}/tracks/{trackId}`
//!
//! ## Error Handling
//!
//! Failures are never retried. A rejected login becomes
//! [`TruSoundError::Auth`](crate::error::TruSoundError::Auth) with the server's
//! message; everything else becomes
//! [`TruSoundError::Fetch`](crate::error::TruSoundError::Fetch). A 401 is not
//! treated specially.

mod client;
mod stream;

use async_trait::async_trait;

pub use client::HttpGateway;
pub use stream::StreamUrlBuilder;

use crate::{
    error::Result,
    types::{
        Album, Artist, ArtistId, CreatePlaylistRequest, Playlist, PlaylistDetail, PlaylistId,
        Session, Track, TrackId,
    },
};

/// Authenticated access to the TruSoundCloud REST API.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Replaces the bearer token attached to subsequent requests.
    fn set_token(&self, token: Option<String>);

    /// Stream URL builder bound to the current token, `None` without one.
    fn stream_urls(&self) -> Option<StreamUrlBuilder>;

    async fn login(&self, email: &str, password: &str) -> Result<Session>;

    async fn artists(&self) -> Result<Vec<Artist>>;
    async fn artist(&self, artist_id: ArtistId) -> Result<Artist>;
    async fn artist_tracks(&self, artist_id: ArtistId) -> Result<Vec<Track>>;
    async fn artist_albums(&self, artist_id: ArtistId) -> Result<Vec<Album>>;
    async fn track(&self, track_id: TrackId) -> Result<Track>;

    async fn favorites(&self) -> Result<Vec<Track>>;
    async fn add_favorite(&self, track_id: TrackId) -> Result<()>;
    async fn remove_favorite(&self, track_id: TrackId) -> Result<()>;

    async fn my_playlists(&self) -> Result<Vec<Playlist>>;
    async fn public_playlists(&self) -> Result<Vec<Playlist>>;
    async fn create_playlist(&self, request: &CreatePlaylistRequest) -> Result<Playlist>;
    async fn playlist(&self, playlist_id: PlaylistId) -> Result<PlaylistDetail>;
    async fn add_playlist_track(
        &self,
        playlist_id: PlaylistId,
        track_id: TrackId,
        position: Option<u32>,
    ) -> Result<()>;
    async fn remove_playlist_track(&self, playlist_id: PlaylistId, track_id: TrackId)
    -> Result<()>;
    async fn delete_playlist(&self, playlist_id: PlaylistId) -> Result<()>;
}
