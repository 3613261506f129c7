//! Catalog cache.
//!
//! In-memory lists of what the server last returned: artists, the albums of
//! the selected artist, the track list currently on screen (the "view"),
//! favorites and playlists. Nothing here is persisted.
//!
//! Every fetch is split in three steps so that responses arriving out of order
//! cannot overwrite newer data:
//!
//! 1. `begin` a ticket for the fetch kind while holding the lock
//! 2. await the gateway without the lock
//! 3. `apply_*` the result with the ticket; a superseded ticket is discarded
//!
//! A failed fetch leaves the existing lists untouched.

use std::{collections::HashSet, sync::Arc};

use tokio::sync::Mutex;

use crate::{
    error::{Result, TruSoundError},
    management::guard::{FetchKind, RequestGuard, Ticket},
    trusound::ApiGateway,
    types::{
        Album, Artist, ArtistId, Playlist, PlaylistDetail, PlaylistId, Track, TrackId, ViewSource,
    },
};

pub type SharedCatalog = Arc<Mutex<Catalog>>;

/// Result of handing a response to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer request of the same kind was issued; the response was dropped.
    Stale,
}

/// A track list together with the source it was fetched from.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackView {
    pub source: ViewSource,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Default)]
pub struct Catalog {
    artists: Vec<Artist>,
    selected_artist: Option<Artist>,
    albums: Vec<Album>,
    view: Option<TrackView>,
    favorites: Vec<Track>,
    my_playlists: Vec<Playlist>,
    public_playlists: Vec<Playlist>,
    playlist_detail: Option<PlaylistDetail>,
    guard: RequestGuard,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedCatalog {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn begin(&mut self, kind: FetchKind) -> Ticket {
        self.guard.begin(kind)
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.guard.is_current(ticket)
    }

    fn accept(&self, ticket: &Ticket, kind: FetchKind) -> bool {
        ticket.kind() == kind && self.guard.is_current(ticket)
    }

    pub fn apply_artists(&mut self, ticket: &Ticket, artists: Vec<Artist>) -> FetchOutcome {
        if !self.accept(ticket, FetchKind::Artists) {
            return FetchOutcome::Stale;
        }
        self.artists = artists;
        FetchOutcome::Applied
    }

    pub fn apply_view(
        &mut self,
        ticket: &Ticket,
        source: ViewSource,
        tracks: Vec<Track>,
    ) -> FetchOutcome {
        if !self.accept(ticket, FetchKind::View) {
            return FetchOutcome::Stale;
        }
        self.view = Some(TrackView { source, tracks });
        FetchOutcome::Applied
    }

    /// Applies an artist's tracks and makes the artist the selection.
    ///
    /// The selection only changes together with the view it belongs to.
    pub fn apply_artist_view(
        &mut self,
        ticket: &Ticket,
        artist: Artist,
        tracks: Vec<Track>,
    ) -> FetchOutcome {
        if !self.accept(ticket, FetchKind::View) {
            return FetchOutcome::Stale;
        }
        self.view = Some(TrackView {
            source: ViewSource::ArtistTracks(artist.id),
            tracks,
        });
        self.selected_artist = Some(artist);
        FetchOutcome::Applied
    }

    pub fn apply_albums(&mut self, ticket: &Ticket, albums: Vec<Album>) -> FetchOutcome {
        if !self.accept(ticket, FetchKind::Albums) {
            return FetchOutcome::Stale;
        }
        self.albums = albums;
        FetchOutcome::Applied
    }

    pub fn apply_favorites(&mut self, ticket: &Ticket, favorites: Vec<Track>) -> FetchOutcome {
        if !self.accept(ticket, FetchKind::Favorites) {
            return FetchOutcome::Stale;
        }
        self.favorites = favorites;
        FetchOutcome::Applied
    }

    pub fn apply_my_playlists(&mut self, ticket: &Ticket, playlists: Vec<Playlist>) -> FetchOutcome {
        if !self.accept(ticket, FetchKind::MyPlaylists) {
            return FetchOutcome::Stale;
        }
        self.my_playlists = playlists;
        FetchOutcome::Applied
    }

    pub fn apply_public_playlists(
        &mut self,
        ticket: &Ticket,
        playlists: Vec<Playlist>,
    ) -> FetchOutcome {
        if !self.accept(ticket, FetchKind::PublicPlaylists) {
            return FetchOutcome::Stale;
        }
        self.public_playlists = playlists;
        FetchOutcome::Applied
    }

    pub fn apply_playlist_detail(
        &mut self,
        ticket: &Ticket,
        detail: PlaylistDetail,
    ) -> FetchOutcome {
        if !self.accept(ticket, FetchKind::PlaylistDetail) {
            return FetchOutcome::Stale;
        }
        self.playlist_detail = Some(detail);
        FetchOutcome::Applied
    }

    /// Drops the selection and ignores any view fetch still in flight.
    pub fn clear_selection(&mut self) {
        self.guard.cancel(FetchKind::View);
        self.selected_artist = None;
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn find_artist(&self, artist_id: ArtistId) -> Option<&Artist> {
        self.artists.iter().find(|a| a.id == artist_id)
    }

    pub fn selected_artist(&self) -> Option<&Artist> {
        self.selected_artist.as_ref()
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn view(&self) -> Option<&TrackView> {
        self.view.as_ref()
    }

    pub fn view_tracks(&self) -> &[Track] {
        self.view.as_ref().map_or(&[], |v| v.tracks.as_slice())
    }

    pub fn favorites(&self) -> &[Track] {
        &self.favorites
    }

    /// Ids of the last fetched favorites. Derived, never patched locally.
    pub fn favorite_ids(&self) -> HashSet<TrackId> {
        self.favorites.iter().map(|t| t.id).collect()
    }

    pub fn is_favorite(&self, track_id: TrackId) -> bool {
        self.favorites.iter().any(|t| t.id == track_id)
    }

    pub fn my_playlists(&self) -> &[Playlist] {
        &self.my_playlists
    }

    pub fn public_playlists(&self) -> &[Playlist] {
        &self.public_playlists
    }

    pub fn playlist_detail(&self) -> Option<&PlaylistDetail> {
        self.playlist_detail.as_ref()
    }

    pub fn clear_playlist_detail(&mut self, playlist_id: PlaylistId) {
        if self
            .playlist_detail
            .as_ref()
            .is_some_and(|d| d.playlist.id == playlist_id)
        {
            self.guard.cancel(FetchKind::PlaylistDetail);
            self.playlist_detail = None;
        }
    }

    /// Header line for the track view.
    pub fn subtitle(&self) -> String {
        match (&self.view, &self.selected_artist) {
            (Some(view), Some(artist)) if view.source == ViewSource::ArtistTracks(artist.id) => {
                format!("{} · {} tracks available", artist.name, view.tracks.len())
            }
            (Some(view), _) => format!("{} · {} tracks", view.source, view.tracks.len()),
            (None, Some(artist)) => format!("{} · loading tracks", artist.name),
            (None, None) => "Select an artist to get started.".to_string(),
        }
    }

    /// Drops everything and invalidates every fetch in flight.
    pub fn clear(&mut self) {
        self.guard.cancel_all();
        self.artists.clear();
        self.selected_artist = None;
        self.albums.clear();
        self.view = None;
        self.favorites.clear();
        self.my_playlists.clear();
        self.public_playlists.clear();
        self.playlist_detail = None;
    }
}

/// Fetches the track list behind `source`.
pub async fn load_source<G: ApiGateway + ?Sized>(
    gateway: &G,
    source: &ViewSource,
) -> Result<Vec<Track>> {
    match source {
        ViewSource::ArtistTracks(artist_id) => gateway.artist_tracks(*artist_id).await,
        ViewSource::Album { artist_id, name } => {
            let albums = gateway.artist_albums(*artist_id).await?;
            albums
                .into_iter()
                .find(|album| &album.name == name)
                .map(|album| album.tracks)
                .ok_or_else(|| {
                    TruSoundError::Fetch(format!(
                        "artist {} has no album named '{}'",
                        artist_id, name
                    ))
                })
        }
        ViewSource::Favorites => gateway.favorites().await,
        ViewSource::Playlist(playlist_id) => Ok(gateway.playlist(*playlist_id).await?.tracks),
    }
}

// A failure of a superseded request is not worth reporting.
fn stale_or_error(catalog: &Catalog, ticket: &Ticket, err: TruSoundError) -> Result<FetchOutcome> {
    if catalog.is_current(ticket) {
        Err(err)
    } else {
        Ok(FetchOutcome::Stale)
    }
}

pub async fn fetch_view<G: ApiGateway + ?Sized>(
    catalog: &Mutex<Catalog>,
    gateway: &G,
    source: ViewSource,
) -> Result<FetchOutcome> {
    let ticket = catalog.lock().await.begin(FetchKind::View);
    let result = load_source(gateway, &source).await;

    let mut guard = catalog.lock().await;
    match result {
        Ok(tracks) => Ok(guard.apply_view(&ticket, source, tracks)),
        Err(err) => stale_or_error(&guard, &ticket, err),
    }
}

pub async fn fetch_artists<G: ApiGateway + ?Sized>(
    catalog: &Mutex<Catalog>,
    gateway: &G,
) -> Result<FetchOutcome> {
    let ticket = catalog.lock().await.begin(FetchKind::Artists);
    let result = gateway.artists().await;

    let mut guard = catalog.lock().await;
    match result {
        Ok(artists) => Ok(guard.apply_artists(&ticket, artists)),
        Err(err) => stale_or_error(&guard, &ticket, err),
    }
}

/// Selects `artist` and loads its tracks into the view.
///
/// The selection is applied with the tracks under one ticket: a failed or
/// superseded fetch leaves the previous selection in place.
pub async fn select_artist<G: ApiGateway + ?Sized>(
    catalog: &Mutex<Catalog>,
    gateway: &G,
    artist: Artist,
) -> Result<FetchOutcome> {
    let ticket = catalog.lock().await.begin(FetchKind::View);
    load_artist_view(catalog, gateway, ticket, artist).await
}

/// Like [`select_artist`], resolving the id against the cached list first
/// and the server second. The ticket is taken before the lookup, so a view
/// requested while the artist is being resolved still wins.
pub async fn select_artist_by_id<G: ApiGateway + ?Sized>(
    catalog: &Mutex<Catalog>,
    gateway: &G,
    artist_id: ArtistId,
) -> Result<FetchOutcome> {
    let (ticket, cached) = {
        let mut guard = catalog.lock().await;
        (
            guard.begin(FetchKind::View),
            guard.find_artist(artist_id).cloned(),
        )
    };

    let artist = match cached {
        Some(artist) => artist,
        None => match gateway.artist(artist_id).await {
            Ok(artist) => artist,
            Err(err) => return stale_or_error(&*catalog.lock().await, &ticket, err),
        },
    };
    load_artist_view(catalog, gateway, ticket, artist).await
}

async fn load_artist_view<G: ApiGateway + ?Sized>(
    catalog: &Mutex<Catalog>,
    gateway: &G,
    ticket: Ticket,
    artist: Artist,
) -> Result<FetchOutcome> {
    let result = gateway.artist_tracks(artist.id).await;

    let mut guard = catalog.lock().await;
    match result {
        Ok(tracks) => Ok(guard.apply_artist_view(&ticket, artist, tracks)),
        Err(err) => stale_or_error(&guard, &ticket, err),
    }
}

pub async fn fetch_albums<G: ApiGateway + ?Sized>(
    catalog: &Mutex<Catalog>,
    gateway: &G,
    artist_id: ArtistId,
) -> Result<FetchOutcome> {
    let ticket = catalog.lock().await.begin(FetchKind::Albums);
    let result = gateway.artist_albums(artist_id).await;

    let mut guard = catalog.lock().await;
    match result {
        Ok(albums) => Ok(guard.apply_albums(&ticket, albums)),
        Err(err) => stale_or_error(&guard, &ticket, err),
    }
}

pub async fn fetch_favorites<G: ApiGateway + ?Sized>(
    catalog: &Mutex<Catalog>,
    gateway: &G,
) -> Result<FetchOutcome> {
    let ticket = catalog.lock().await.begin(FetchKind::Favorites);
    let result = gateway.favorites().await;

    let mut guard = catalog.lock().await;
    match result {
        Ok(favorites) => Ok(guard.apply_favorites(&ticket, favorites)),
        Err(err) => stale_or_error(&guard, &ticket, err),
    }
}

pub async fn fetch_my_playlists<G: ApiGateway + ?Sized>(
    catalog: &Mutex<Catalog>,
    gateway: &G,
) -> Result<FetchOutcome> {
    let ticket = catalog.lock().await.begin(FetchKind::MyPlaylists);
    let result = gateway.my_playlists().await;

    let mut guard = catalog.lock().await;
    match result {
        Ok(playlists) => Ok(guard.apply_my_playlists(&ticket, playlists)),
        Err(err) => stale_or_error(&guard, &ticket, err),
    }
}

pub async fn fetch_public_playlists<G: ApiGateway + ?Sized>(
    catalog: &Mutex<Catalog>,
    gateway: &G,
) -> Result<FetchOutcome> {
    let ticket = catalog.lock().await.begin(FetchKind::PublicPlaylists);
    let result = gateway.public_playlists().await;

    let mut guard = catalog.lock().await;
    match result {
        Ok(playlists) => Ok(guard.apply_public_playlists(&ticket, playlists)),
        Err(err) => stale_or_error(&guard, &ticket, err),
    }
}

pub async fn fetch_playlist_detail<G: ApiGateway + ?Sized>(
    catalog: &Mutex<Catalog>,
    gateway: &G,
    playlist_id: PlaylistId,
) -> Result<FetchOutcome> {
    let ticket = catalog.lock().await.begin(FetchKind::PlaylistDetail);
    let result = gateway.playlist(playlist_id).await;

    let mut guard = catalog.lock().await;
    match result {
        Ok(detail) => Ok(guard.apply_playlist_detail(&ticket, detail)),
        Err(err) => stale_or_error(&guard, &ticket, err),
    }
}
