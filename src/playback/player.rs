use crate::{
    error::{Result, TruSoundError},
    playback::{
        media::{MediaCommand, MediaSession},
        output::AudioOutput,
        queue::PlaybackQueue,
        transport::{Transport, TransportEvent},
    },
    trusound::StreamUrlBuilder,
    types::Track,
};

/// Something the player wants the surface to show.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    NowPlaying(Track),
    Transport(TransportEvent),
    /// The last queued track ended; playback stopped.
    QueueFinished,
}

/// Queue engine and transport wired together.
///
/// Every change of the current track loads its stream URL into the transport;
/// a natural end of track advances the queue.
pub struct Player<O: AudioOutput> {
    queue: PlaybackQueue,
    transport: Transport<O>,
    stream: Option<StreamUrlBuilder>,
}

impl<O: AudioOutput> Player<O> {
    pub fn new(output: O) -> Self {
        Self {
            queue: PlaybackQueue::new(),
            transport: Transport::new(output),
            stream: None,
        }
    }

    pub fn with_media_session(mut self, media: Box<dyn MediaSession>) -> Self {
        self.transport = self.transport.with_media_session(media);
        self
    }

    /// Binds stream URLs to a session token. `None` after logout.
    pub fn set_stream(&mut self, stream: Option<StreamUrlBuilder>) {
        self.stream = stream;
    }

    /// Replaces the queue with `list`, starting at `index`.
    ///
    /// The queue is updated even if the stream then fails to load; the error
    /// is returned for display and the queue stays consistent.
    pub fn play_list(&mut self, list: Vec<Track>, index: usize) -> Result<Track> {
        if self.stream.is_none() {
            return Err(TruSoundError::Auth("Not logged in".to_string()));
        }
        let track = self.queue.set_and_play(list, index)?.clone();
        self.load(&track)?;
        Ok(track)
    }

    /// Plays the next queued track. `Ok(None)` at the end of the queue.
    pub fn next(&mut self) -> Result<Option<Track>> {
        let Some(track) = self.queue.advance().cloned() else {
            return Ok(None);
        };
        self.load(&track)?;
        Ok(Some(track))
    }

    /// Plays the previous queued track. `Ok(None)` at the start of the queue.
    pub fn previous(&mut self) -> Result<Option<Track>> {
        let Some(track) = self.queue.retreat().cloned() else {
            return Ok(None);
        };
        self.load(&track)?;
        Ok(Some(track))
    }

    pub fn jump(&mut self, index: usize) -> Result<Track> {
        let track = self.queue.jump(index)?.clone();
        self.load(&track)?;
        Ok(track)
    }

    /// Reorders the queue. Playback is not interrupted.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        self.queue.reorder(from, to)
    }

    pub fn toggle(&mut self) -> Result<()> {
        self.transport.toggle()
    }

    pub fn seek(&mut self, target_secs: f64) -> Result<()> {
        self.transport.seek(target_secs)
    }

    pub fn seek_by(&mut self, delta_secs: f64) -> Result<()> {
        self.transport.seek_by(delta_secs)
    }

    /// Stops playback and unloads the source. The queue stays, so next,
    /// previous or jump start playing again.
    pub fn stop(&mut self) {
        self.transport.stop();
    }

    /// Stops playback and forgets the queue and the stream binding.
    pub fn clear(&mut self) {
        self.transport.stop();
        self.queue.clear();
        self.stream = None;
    }

    /// Polls the transport; an ended track advances the queue.
    pub fn tick(&mut self) -> Vec<PlayerEvent> {
        let mut events = Vec::new();
        for event in self.transport.tick() {
            let ended = event == TransportEvent::Ended;
            events.push(PlayerEvent::Transport(event));
            if ended {
                events.push(self.on_ended());
            }
        }
        events
    }

    pub fn handle_media_command(&mut self, command: MediaCommand) -> Result<Option<PlayerEvent>> {
        match command {
            MediaCommand::Play => self.transport.resume()?,
            MediaCommand::Pause => self.transport.pause()?,
            MediaCommand::Toggle => self.transport.toggle()?,
            MediaCommand::Stop => self.stop(),
            MediaCommand::Next => return Ok(self.next()?.map(PlayerEvent::NowPlaying)),
            MediaCommand::Previous => return Ok(self.previous()?.map(PlayerEvent::NowPlaying)),
            MediaCommand::SeekTo(position) => self.transport.seek(position.as_secs_f64())?,
            MediaCommand::SeekBy(delta) => self.transport.seek_by(delta)?,
        }
        Ok(None)
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.queue.current_track()
    }

    pub fn transport(&self) -> &Transport<O> {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut Transport<O> {
        &mut self.transport
    }

    fn on_ended(&mut self) -> PlayerEvent {
        match self.next() {
            Ok(Some(track)) => PlayerEvent::NowPlaying(track),
            Ok(None) => {
                self.transport.stop();
                PlayerEvent::QueueFinished
            }
            Err(err) => PlayerEvent::Transport(TransportEvent::Error(err.to_string())),
        }
    }

    fn load(&mut self, track: &Track) -> Result<()> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| TruSoundError::Auth("Not logged in".to_string()))?;
        let url = stream.build(track.id)?;
        self.transport.load(&url, track)
    }
}
