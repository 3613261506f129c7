use std::sync::Arc;

use crate::{
    error::{Result, TruSoundError},
    management::{
        catalog::{self, Catalog, FetchOutcome, SharedCatalog},
        session::SessionStore,
        storage::SessionStorage,
    },
    playback::{AudioOutput, Player},
    trusound::ApiGateway,
    types::{ArtistId, CreatePlaylistRequest, Playlist, PlaylistId, Session, Track, TrackId, ViewSource},
};

/// Application state: the gateway, the session, the catalog and the player.
///
/// Every mutation of shared state goes through one of the methods here, so
/// login and logout can keep the pieces consistent with each other.
pub struct App<G: ApiGateway, S: SessionStorage, O: AudioOutput> {
    gateway: Arc<G>,
    session: SessionStore<S>,
    catalog: SharedCatalog,
    player: Player<O>,
}

impl<G: ApiGateway, S: SessionStorage, O: AudioOutput> App<G, S, O> {
    /// Restores a persisted session, if any, and arms the gateway with it.
    pub async fn open(gateway: Arc<G>, storage: S, player: Player<O>) -> Result<Self> {
        let session = SessionStore::open(storage).await?;
        let mut app = Self {
            gateway,
            session,
            catalog: Catalog::shared(),
            player,
        };
        if let Some(token) = app.session.token().map(str::to_string) {
            app.gateway.set_token(Some(token));
            app.player.set_stream(app.gateway.stream_urls());
        }
        Ok(app)
    }

    pub fn gateway(&self) -> Arc<G> {
        Arc::clone(&self.gateway)
    }

    pub fn catalog(&self) -> SharedCatalog {
        Arc::clone(&self.catalog)
    }

    pub fn player(&self) -> &Player<O> {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player<O> {
        &mut self.player
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.session.current()
    }

    pub fn session_store(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn require_session(&self) -> Result<&Session> {
        self.session
            .current()
            .ok_or_else(|| TruSoundError::Auth("Not logged in. Run trusound login first".to_string()))
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<Session> {
        let session = self
            .session
            .login(self.gateway.as_ref(), email, password)
            .await?;
        self.player.set_stream(self.gateway.stream_urls());
        Ok(session)
    }

    /// Clears the session, every cached list, the queue and the current track.
    ///
    /// The catalog stays locked for the whole call, so no fetch can land in
    /// between; fetches still in flight are discarded when they complete.
    pub async fn logout(&mut self) -> Result<()> {
        let mut catalog = self.catalog.lock().await;
        catalog.clear();
        self.player.clear();
        self.session.logout(self.gateway.as_ref()).await
    }

    /// Loads the artist list and selects the first artist.
    ///
    /// An empty artist list clears the selection and the view.
    pub async fn load_home(&self) -> Result<FetchOutcome> {
        let outcome = catalog::fetch_artists(&self.catalog, self.gateway.as_ref()).await?;
        if outcome == FetchOutcome::Stale {
            return Ok(outcome);
        }

        let first = self.catalog.lock().await.artists().first().cloned();
        match first {
            Some(artist) => {
                catalog::select_artist(&self.catalog, self.gateway.as_ref(), artist).await
            }
            None => {
                self.catalog.lock().await.clear_selection();
                Ok(FetchOutcome::Applied)
            }
        }
    }

    /// Selects an artist and loads its tracks into the view.
    pub async fn select_artist(&self, artist_id: ArtistId) -> Result<FetchOutcome> {
        catalog::select_artist_by_id(&self.catalog, self.gateway.as_ref(), artist_id).await
    }

    /// Re-issues the fetch of the currently selected artist's tracks.
    pub async fn refresh_selected(&self) -> Result<FetchOutcome> {
        let selected = self.catalog.lock().await.selected_artist().cloned();
        match selected {
            Some(artist) => catalog::select_artist(&self.catalog, self.gateway.as_ref(), artist).await,
            None => Err(TruSoundError::Validation("no artist selected".to_string())),
        }
    }

    pub async fn show(&self, source: ViewSource) -> Result<FetchOutcome> {
        catalog::fetch_view(&self.catalog, self.gateway.as_ref(), source).await
    }

    /// Starts playback of the view at `index`; the queue becomes a snapshot of the view.
    pub async fn play_view(&mut self, index: usize) -> Result<Track> {
        let tracks = self.catalog.lock().await.view_tracks().to_vec();
        if tracks.is_empty() {
            return Err(TruSoundError::Validation("nothing to play in this view".to_string()));
        }
        self.player.play_list(tracks, index)
    }

    /// Loads `source` into the view and plays it from `index`.
    ///
    /// Fails without touching the queue when a newer request replaced the
    /// view before `source` arrived.
    pub async fn play_source(&mut self, source: ViewSource, index: usize) -> Result<Track> {
        if self.show(source.clone()).await? == FetchOutcome::Stale {
            return Err(TruSoundError::Fetch(format!(
                "{} was replaced by a newer request before it loaded",
                source
            )));
        }
        self.play_view(index).await
    }

    pub async fn refresh_favorites(&self) -> Result<FetchOutcome> {
        catalog::fetch_favorites(&self.catalog, self.gateway.as_ref()).await
    }

    /// Adds or removes a favorite, then re-fetches favorites from the server.
    ///
    /// Returns whether the track is a favorite afterwards.
    pub async fn toggle_favorite(&self, track_id: TrackId) -> Result<bool> {
        let is_favorite = self.catalog.lock().await.is_favorite(track_id);
        if is_favorite {
            self.gateway.remove_favorite(track_id).await?;
        } else {
            self.gateway.add_favorite(track_id).await?;
        }

        self.refresh_favorites().await?;
        let showing_favorites = self
            .catalog
            .lock()
            .await
            .view()
            .is_some_and(|v| v.source == ViewSource::Favorites);
        if showing_favorites {
            self.show(ViewSource::Favorites).await?;
        }
        Ok(self.catalog.lock().await.is_favorite(track_id))
    }

    pub async fn refresh_playlists(&self) -> Result<()> {
        catalog::fetch_my_playlists(&self.catalog, self.gateway.as_ref()).await?;
        catalog::fetch_public_playlists(&self.catalog, self.gateway.as_ref()).await?;
        Ok(())
    }

    pub async fn open_playlist(&self, playlist_id: PlaylistId) -> Result<FetchOutcome> {
        catalog::fetch_playlist_detail(&self.catalog, self.gateway.as_ref(), playlist_id).await
    }

    /// Creates a playlist. An empty name is rejected before any request.
    pub async fn create_playlist(
        &self,
        name: &str,
        description: Option<&str>,
        is_public: bool,
    ) -> Result<Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TruSoundError::Validation(
                "playlist name must not be empty".to_string(),
            ));
        }
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let playlist = self
            .gateway
            .create_playlist(&CreatePlaylistRequest {
                name: name.to_string(),
                description,
                is_public,
            })
            .await?;
        catalog::fetch_my_playlists(&self.catalog, self.gateway.as_ref()).await?;
        Ok(playlist)
    }

    pub async fn add_to_playlist(
        &self,
        playlist_id: PlaylistId,
        track_id: TrackId,
        position: Option<u32>,
    ) -> Result<()> {
        self.gateway
            .add_playlist_track(playlist_id, track_id, position)
            .await?;
        self.refresh_playlist_views(playlist_id).await
    }

    pub async fn remove_from_playlist(
        &self,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> Result<()> {
        self.gateway
            .remove_playlist_track(playlist_id, track_id)
            .await?;
        self.refresh_playlist_views(playlist_id).await
    }

    pub async fn delete_playlist(&self, playlist_id: PlaylistId) -> Result<()> {
        self.gateway.delete_playlist(playlist_id).await?;
        self.catalog.lock().await.clear_playlist_detail(playlist_id);
        catalog::fetch_my_playlists(&self.catalog, self.gateway.as_ref()).await?;
        Ok(())
    }

    // Membership is server-authoritative: re-fetch whatever shows this playlist.
    async fn refresh_playlist_views(&self, playlist_id: PlaylistId) -> Result<()> {
        let (detail_open, view_open) = {
            let catalog = self.catalog.lock().await;
            (
                catalog
                    .playlist_detail()
                    .is_some_and(|d| d.playlist.id == playlist_id),
                catalog
                    .view()
                    .is_some_and(|v| v.source == ViewSource::Playlist(playlist_id)),
            )
        };
        if detail_open {
            self.open_playlist(playlist_id).await?;
        }
        if view_open {
            self.show(ViewSource::Playlist(playlist_id)).await?;
        }
        Ok(())
    }
}
