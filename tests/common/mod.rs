#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::Notify;
use trusound::{
    error::{Result, TruSoundError},
    playback::{AudioOutput, OutputEvent, OutputEventKind},
    trusound::{ApiGateway, StreamUrlBuilder},
    types::{
        Album, Artist, ArtistId, CreatePlaylistRequest, Playlist, PlaylistDetail, PlaylistId,
        Session, Track, TrackId, User,
    },
};

pub const EMAIL: &str = "a@b.com";
pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "t1";

pub fn track(id: TrackId) -> Track {
    Track {
        id,
        title: format!("Track {}", id),
        year: Some(2020),
        size: 4 * 1024 * 1024,
        duration_seconds: Some(180),
        artist_id: Some(1),
        artist_name: Some("Artist".to_string()),
        album: None,
    }
}

pub fn tracks(ids: &[TrackId]) -> Vec<Track> {
    ids.iter().map(|id| track(*id)).collect()
}

pub fn artist(id: ArtistId, name: &str) -> Artist {
    Artist {
        id,
        name: name.to_string(),
        description: None,
    }
}

pub fn session() -> Session {
    Session {
        token: TOKEN.to_string(),
        user: User {
            id: 1,
            email: EMAIL.to_string(),
        },
    }
}

pub fn playlist(id: PlaylistId, name: &str, user_id: i64) -> Playlist {
    Playlist {
        id,
        name: name.to_string(),
        description: None,
        is_public: false,
        owner_email: Some(EMAIL.to_string()),
        user_id: Some(user_id),
        created_at: None,
    }
}

/// Audio output that records what the transport asks of it.
#[derive(Debug, Default)]
pub struct FakeOutput {
    pub loads: Vec<String>,
    pub generation: Option<u64>,
    pub paused: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub events: VecDeque<OutputEvent>,
    pub fail_play: bool,
}

impl FakeOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `kind` for the currently loaded source.
    pub fn emit(&mut self, kind: OutputEventKind) {
        let generation = self.generation.unwrap_or_default();
        self.emit_for(generation, kind);
    }

    pub fn emit_for(&mut self, generation: u64, kind: OutputEventKind) {
        self.events.push_back(OutputEvent { generation, kind });
    }
}

impl AudioOutput for FakeOutput {
    fn load(&mut self, url: &str, generation: u64, duration: Option<Duration>) -> Result<()> {
        self.loads.push(url.to_string());
        self.generation = Some(generation);
        self.paused = true;
        self.position = Duration::ZERO;
        self.duration = duration;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.fail_play {
            return Err(TruSoundError::Playback("cannot start".to_string()));
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.paused = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.generation = None;
        self.paused = true;
        self.position = Duration::ZERO;
        self.duration = None;
    }

    fn is_loaded(&self) -> bool {
        self.generation.is_some()
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn set_position(&mut self, position: Duration) -> Result<()> {
        self.position = position;
        Ok(())
    }

    fn poll_event(&mut self) -> Option<OutputEvent> {
        self.events.pop_front()
    }
}

#[derive(Default)]
struct FakeState {
    token: Option<String>,
    artists: Vec<Artist>,
    artist_tracks: HashMap<ArtistId, Vec<Track>>,
    albums: HashMap<ArtistId, Vec<Album>>,
    favorites: Vec<Track>,
    my_playlists: Vec<Playlist>,
    public_playlists: Vec<Playlist>,
    playlist_tracks: HashMap<PlaylistId, Vec<Track>>,
    next_playlist_id: PlaylistId,
    gates: HashMap<ArtistId, Arc<Notify>>,
    lookup_gates: HashMap<ArtistId, Arc<Notify>>,
    calls: Vec<String>,
    failing: bool,
}

/// In-memory TruSoundCloud server.
///
/// Requests for a gated artist wait until the test releases them, which makes
/// out-of-order completion reproducible.
#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<FakeState>,
}

impl FakeGateway {
    pub fn new() -> Self {
        let gateway = Self::default();
        {
            let mut state = gateway.state.lock().unwrap();
            state.next_playlist_id = 100;
            state.artists = vec![artist(1, "First"), artist(2, "Second")];
            state.artist_tracks.insert(1, tracks(&[11, 12, 13]));
            state.artist_tracks.insert(2, tracks(&[21, 22]));
            state.albums.insert(
                1,
                vec![Album {
                    id: Some(1),
                    name: "Debut".to_string(),
                    track_count: Some(2),
                    tracks: tracks(&[11, 12]),
                }],
            );
        }
        gateway
    }

    pub fn with_artists(self, artists: Vec<Artist>) -> Self {
        self.state.lock().unwrap().artists = artists;
        self
    }

    pub fn with_favorites(self, favorites: Vec<Track>) -> Self {
        self.state.lock().unwrap().favorites = favorites;
        self
    }

    pub fn with_playlist(self, playlist: Playlist, tracks: Vec<Track>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.playlist_tracks.insert(playlist.id, tracks);
            state.my_playlists.push(playlist);
        }
        self
    }

    /// Holds back `artist_tracks(artist_id)` until the returned handle is notified.
    pub fn gate_artist(&self, artist_id: ArtistId) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state
            .lock()
            .unwrap()
            .gates
            .insert(artist_id, Arc::clone(&gate));
        gate
    }

    /// Holds back `artist(artist_id)` until the returned handle is notified.
    pub fn gate_artist_lookup(&self, artist_id: ArtistId) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state
            .lock()
            .unwrap()
            .lookup_gates
            .insert(artist_id, Arc::clone(&gate));
        gate
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    pub fn token(&self) -> Option<String> {
        self.state.lock().unwrap().token.clone()
    }

    pub fn calls(&self, name: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.as_str() == name)
            .count()
    }

    pub fn favorite_ids(&self) -> HashSet<TrackId> {
        self.state
            .lock()
            .unwrap()
            .favorites
            .iter()
            .map(|t| t.id)
            .collect()
    }

    pub fn playlist_track_ids(&self, playlist_id: PlaylistId) -> Vec<TrackId> {
        self.state
            .lock()
            .unwrap()
            .playlist_tracks
            .get(&playlist_id)
            .map(|t| t.iter().map(|t| t.id).collect())
            .unwrap_or_default()
    }

    fn record(&self, call: String) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.failing {
            return Err(TruSoundError::Fetch("server returned 500".to_string()));
        }
        Ok(())
    }

    fn find_track(&self, track_id: TrackId) -> Track {
        let state = self.state.lock().unwrap();
        state
            .artist_tracks
            .values()
            .flatten()
            .find(|t| t.id == track_id)
            .cloned()
            .unwrap_or_else(|| track(track_id))
    }
}

#[async_trait]
impl ApiGateway for FakeGateway {
    fn set_token(&self, token: Option<String>) {
        self.state.lock().unwrap().token = token;
    }

    fn stream_urls(&self) -> Option<StreamUrlBuilder> {
        self.token()
            .map(|token| StreamUrlBuilder::new("http://fake/api", token))
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        self.record("login".to_string())?;
        if email == EMAIL && password == PASSWORD {
            Ok(session())
        } else {
            Err(TruSoundError::Auth("Invalid credentials".to_string()))
        }
    }

    async fn artists(&self) -> Result<Vec<Artist>> {
        self.record("artists".to_string())?;
        Ok(self.state.lock().unwrap().artists.clone())
    }

    async fn artist(&self, artist_id: ArtistId) -> Result<Artist> {
        let gate = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("artist:{}", artist_id));
            state.lookup_gates.get(&artist_id).cloned()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.state.lock().unwrap().failing {
            return Err(TruSoundError::Fetch("server returned 500".to_string()));
        }
        self.state
            .lock()
            .unwrap()
            .artists
            .iter()
            .find(|a| a.id == artist_id)
            .cloned()
            .ok_or_else(|| TruSoundError::Fetch("Artist not found (404 Not Found)".to_string()))
    }

    // Failure is decided after the gate opens, so a held request can fail late.
    async fn artist_tracks(&self, artist_id: ArtistId) -> Result<Vec<Track>> {
        let gate = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("artist_tracks:{}", artist_id));
            state.gates.get(&artist_id).cloned()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.state.lock().unwrap().failing {
            return Err(TruSoundError::Fetch("server returned 500".to_string()));
        }
        Ok(self
            .state
            .lock()
            .unwrap()
            .artist_tracks
            .get(&artist_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn artist_albums(&self, artist_id: ArtistId) -> Result<Vec<Album>> {
        self.record(format!("artist_albums:{}", artist_id))?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .albums
            .get(&artist_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn track(&self, track_id: TrackId) -> Result<Track> {
        self.record(format!("track:{}", track_id))?;
        Ok(self.find_track(track_id))
    }

    async fn favorites(&self) -> Result<Vec<Track>> {
        self.record("favorites".to_string())?;
        Ok(self.state.lock().unwrap().favorites.clone())
    }

    async fn add_favorite(&self, track_id: TrackId) -> Result<()> {
        self.record(format!("add_favorite:{}", track_id))?;
        let track = self.find_track(track_id);
        let mut state = self.state.lock().unwrap();
        if !state.favorites.iter().any(|t| t.id == track_id) {
            state.favorites.push(track);
        }
        Ok(())
    }

    async fn remove_favorite(&self, track_id: TrackId) -> Result<()> {
        self.record(format!("remove_favorite:{}", track_id))?;
        self.state
            .lock()
            .unwrap()
            .favorites
            .retain(|t| t.id != track_id);
        Ok(())
    }

    async fn my_playlists(&self) -> Result<Vec<Playlist>> {
        self.record("my_playlists".to_string())?;
        Ok(self.state.lock().unwrap().my_playlists.clone())
    }

    async fn public_playlists(&self) -> Result<Vec<Playlist>> {
        self.record("public_playlists".to_string())?;
        Ok(self.state.lock().unwrap().public_playlists.clone())
    }

    async fn create_playlist(&self, request: &CreatePlaylistRequest) -> Result<Playlist> {
        self.record("create_playlist".to_string())?;
        let mut state = self.state.lock().unwrap();
        let id = state.next_playlist_id;
        state.next_playlist_id += 1;
        let playlist = Playlist {
            id,
            name: request.name.clone(),
            description: request.description.clone(),
            is_public: request.is_public,
            owner_email: Some(EMAIL.to_string()),
            user_id: Some(1),
            created_at: None,
        };
        state.my_playlists.push(playlist.clone());
        state.playlist_tracks.insert(id, Vec::new());
        Ok(playlist)
    }

    async fn playlist(&self, playlist_id: PlaylistId) -> Result<PlaylistDetail> {
        self.record(format!("playlist:{}", playlist_id))?;
        let state = self.state.lock().unwrap();
        let playlist = state
            .my_playlists
            .iter()
            .chain(state.public_playlists.iter())
            .find(|p| p.id == playlist_id)
            .cloned()
            .ok_or_else(|| TruSoundError::Fetch("Playlist not found (404 Not Found)".to_string()))?;
        Ok(PlaylistDetail {
            playlist,
            tracks: state
                .playlist_tracks
                .get(&playlist_id)
                .cloned()
                .unwrap_or_default(),
        })
    }

    async fn add_playlist_track(
        &self,
        playlist_id: PlaylistId,
        track_id: TrackId,
        position: Option<u32>,
    ) -> Result<()> {
        self.record(format!("add_playlist_track:{}:{}", playlist_id, track_id))?;
        let track = self.find_track(track_id);
        let mut state = self.state.lock().unwrap();
        let list = state.playlist_tracks.entry(playlist_id).or_default();
        let at = position.map_or(list.len(), |p| (p as usize).min(list.len()));
        list.insert(at, track);
        Ok(())
    }

    async fn remove_playlist_track(
        &self,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> Result<()> {
        self.record(format!("remove_playlist_track:{}:{}", playlist_id, track_id))?;
        if let Some(list) = self
            .state
            .lock()
            .unwrap()
            .playlist_tracks
            .get_mut(&playlist_id)
        {
            list.retain(|t| t.id != track_id);
        }
        Ok(())
    }

    async fn delete_playlist(&self, playlist_id: PlaylistId) -> Result<()> {
        self.record(format!("delete_playlist:{}", playlist_id))?;
        let mut state = self.state.lock().unwrap();
        state.my_playlists.retain(|p| p.id != playlist_id);
        state.playlist_tracks.remove(&playlist_id);
        Ok(())
    }
}
