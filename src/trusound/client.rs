use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{
    config,
    error::{Result, TruSoundError},
    trusound::{ApiGateway, StreamUrlBuilder},
    types::{
        AddPlaylistTrackRequest, Album, ApiMessage, Artist, ArtistId, CreatePlaylistRequest,
        FavoriteRequest, LoginRequest, Playlist, PlaylistDetail, PlaylistId, Session, Track,
        TrackId,
    },
};

const LOGIN_FALLBACK_MESSAGE: &str = "Invalid credentials";

/// reqwest-backed [`ApiGateway`].
///
/// The bearer token lives behind a lock so the gateway can be shared as
/// `Arc<HttpGateway>` between the player loop and spawned fetch tasks.
pub struct HttpGateway {
    base_url: String,
    client: Client,
    token: RwLock<Option<String>>,
}

impl HttpGateway {
    /// Creates a gateway for `base_url`, which must already include the `/api` suffix.
    ///
    /// # Errors
    ///
    /// Returns [`TruSoundError::Validation`] for a URL that is not http(s) and
    /// [`TruSoundError::Fetch`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(TruSoundError::Validation(format!(
                "API URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(config::request_timeout())
            .user_agent(format!("trusound/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url,
            client,
            token: RwLock::new(None),
        })
    }

    /// Creates a gateway for the configured `TRUSOUND_API_URL`.
    pub fn from_env() -> Result<Self> {
        Self::new(config::api_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/TruSoundCloud{}", self.base_url, path)
    }

    fn current_token(&self) -> Option<String> {
        match self.token.read() {
            Ok(token) => token.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.current_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .authorized(self.client.get(self.url(path)))
            .send()
            .await?;
        Self::parse_json(response).await
    }

    async fn send_without_body(&self, request: RequestBuilder) -> Result<()> {
        let response = self.authorized(request).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| TruSoundError::Fetch(format!("Failed to parse response: {}", e)))
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = Self::server_message(response).await;
        Err(TruSoundError::Fetch(match message {
            Some(message) => format!("{} ({})", message, status),
            None => format!("server returned {}", status),
        }))
    }

    async fn server_message(response: Response) -> Option<String> {
        response
            .json::<ApiMessage>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty())
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut current) => *current = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    fn stream_urls(&self) -> Option<StreamUrlBuilder> {
        self.current_token()
            .map(|token| StreamUrlBuilder::new(&self.base_url, token))
    }

    /// Exchanges credentials for a session.
    ///
    /// The login endpoint lives outside the `/TruSoundCloud` prefix and is
    /// called without a bearer token.
    ///
    /// # Errors
    ///
    /// - Non-2xx status: [`TruSoundError::Auth`] with the server's `message`,
    ///   or `Invalid credentials` when the body carries none
    /// - Network or parse failure: [`TruSoundError::Fetch`]
    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .client
            .post(format!("{}/trusound/login", self.base_url))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let message = Self::server_message(response)
                .await
                .unwrap_or_else(|| LOGIN_FALLBACK_MESSAGE.to_string());
            return Err(TruSoundError::Auth(message));
        }

        response
            .json::<Session>()
            .await
            .map_err(|e| TruSoundError::Fetch(format!("Failed to parse login response: {}", e)))
    }

    async fn artists(&self) -> Result<Vec<Artist>> {
        self.get_json("/artists").await
    }

    async fn artist(&self, artist_id: ArtistId) -> Result<Artist> {
        self.get_json(&format!("/artists/{}", artist_id)).await
    }

    async fn artist_tracks(&self, artist_id: ArtistId) -> Result<Vec<Track>> {
        self.get_json(&format!("/artists/{}/tracks", artist_id))
            .await
    }

    async fn artist_albums(&self, artist_id: ArtistId) -> Result<Vec<Album>> {
        self.get_json(&format!("/artists/{}/albums", artist_id))
            .await
    }

    async fn track(&self, track_id: TrackId) -> Result<Track> {
        self.get_json(&format!("/tracks/{}", track_id)).await
    }

    async fn favorites(&self) -> Result<Vec<Track>> {
        self.get_json("/favorites").await
    }

    async fn add_favorite(&self, track_id: TrackId) -> Result<()> {
        let request = self
            .client
            .post(self.url("/favorites"))
            .json(&FavoriteRequest { track_id });
        self.send_without_body(request).await
    }

    async fn remove_favorite(&self, track_id: TrackId) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&format!("/favorites/{}", track_id)));
        self.send_without_body(request).await
    }

    async fn my_playlists(&self) -> Result<Vec<Playlist>> {
        self.get_json("/playlists/mine").await
    }

    async fn public_playlists(&self) -> Result<Vec<Playlist>> {
        self.get_json("/playlists/public").await
    }

    async fn create_playlist(&self, request: &CreatePlaylistRequest) -> Result<Playlist> {
        let response = self
            .authorized(self.client.post(self.url("/playlists")).json(request))
            .send()
            .await?;
        Self::parse_json(response).await
    }

    async fn playlist(&self, playlist_id: PlaylistId) -> Result<PlaylistDetail> {
        self.get_json(&format!("/playlists/{}", playlist_id)).await
    }

    async fn add_playlist_track(
        &self,
        playlist_id: PlaylistId,
        track_id: TrackId,
        position: Option<u32>,
    ) -> Result<()> {
        let request = self
            .client
            .post(self.url(&format!("/playlists/{}/tracks", playlist_id)))
            .json(&AddPlaylistTrackRequest { track_id, position });
        self.send_without_body(request).await
    }

    async fn remove_playlist_track(
        &self,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> Result<()> {
        let request = self.client.delete(self.url(&format!(
            "/playlists/{}/tracks/{}",
            playlist_id, track_id
        )));
        self.send_without_body(request).await
    }

    async fn delete_playlist(&self, playlist_id: PlaylistId) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&format!("/playlists/{}", playlist_id)));
        self.send_without_body(request).await
    }
}
