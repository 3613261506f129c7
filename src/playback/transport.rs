//! Transport adapter.
//!
//! Binds playback intent to exactly one [`AudioOutput`] and, when present, to
//! the OS media session. Every `load` opens a new source generation; output
//! events from older generations are discarded so a superseded track can never
//! advance the queue.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use crate::{
    error::Result,
    playback::{
        media::{MediaSession, MediaState},
        output::{AudioOutput, OutputEventKind},
    },
    types::Track,
};

const MEDIA_PUBLISH_INTERVAL: Duration = Duration::from_secs(1);

/// Events the transport publishes upward.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    TimeUpdate {
        position: Duration,
        duration: Option<Duration>,
    },
    PlayStateChanged(bool),
    Ended,
    Error(String),
}

pub struct Transport<O: AudioOutput> {
    output: O,
    generation: u64,
    playing: bool,
    pending: VecDeque<TransportEvent>,
    media: Option<Box<dyn MediaSession>>,
    last_media_publish: Option<Instant>,
}

impl<O: AudioOutput> Transport<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            generation: 0,
            playing: false,
            pending: VecDeque::new(),
            media: None,
            last_media_publish: None,
        }
    }

    pub fn with_media_session(mut self, media: Box<dyn MediaSession>) -> Self {
        self.media = Some(media);
        self
    }

    /// Loads `url` as the new source and immediately attempts playback.
    ///
    /// A failure is returned to the caller and leaves the transport stopped.
    /// Failures detected later (stream not found, undecodable data) arrive
    /// through [`Transport::tick`] as [`TransportEvent::Error`].
    pub fn load(&mut self, url: &str, track: &Track) -> Result<()> {
        self.generation += 1;
        let duration = track.duration_seconds.map(Duration::from_secs);

        if let Some(media) = self.media.as_mut() {
            media.set_metadata(track);
        }

        let started = self
            .output
            .load(url, self.generation, duration)
            .and_then(|_| self.output.play());

        match started {
            Ok(()) => {
                self.set_playing(true);
                self.publish_media(true);
                Ok(())
            }
            Err(err) => {
                self.set_playing(false);
                self.publish_media(true);
                Err(err)
            }
        }
    }

    /// Pauses a playing source, resumes a paused one. No effect when nothing is loaded.
    pub fn toggle(&mut self) -> Result<()> {
        if !self.output.is_loaded() {
            return Ok(());
        }
        if self.output.is_paused() {
            self.resume()
        } else {
            self.pause()
        }
    }

    pub fn resume(&mut self) -> Result<()> {
        if !self.output.is_loaded() {
            return Ok(());
        }
        self.output.play()?;
        self.set_playing(true);
        self.publish_media(true);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        if !self.output.is_loaded() {
            return Ok(());
        }
        self.output.pause()?;
        self.set_playing(false);
        self.publish_media(true);
        Ok(())
    }

    /// Moves to `target_secs`, clamped to `[0, duration]`.
    pub fn seek(&mut self, target_secs: f64) -> Result<()> {
        if !self.output.is_loaded() {
            return Ok(());
        }

        let mut target = if target_secs.is_finite() {
            target_secs.max(0.0)
        } else {
            0.0
        };
        if let Some(duration) = self.output.duration() {
            target = target.min(duration.as_secs_f64());
        }

        self.output.set_position(Duration::from_secs_f64(target))?;
        self.pending.push_back(TransportEvent::TimeUpdate {
            position: self.output.position(),
            duration: self.output.duration(),
        });
        self.publish_media(true);
        Ok(())
    }

    pub fn seek_by(&mut self, delta_secs: f64) -> Result<()> {
        let target = self.output.position().as_secs_f64() + delta_secs;
        self.seek(target)
    }

    /// Drops the current source; its late output events are ignored.
    pub fn stop(&mut self) {
        self.generation += 1;
        self.output.stop();
        self.set_playing(false);
        if let Some(media) = self.media.as_mut() {
            media.set_playback(MediaState::Stopped);
        }
    }

    /// Polls the output and returns everything that happened since the last tick.
    pub fn tick(&mut self) -> Vec<TransportEvent> {
        while let Some(event) = self.output.poll_event() {
            if event.generation != self.generation {
                continue;
            }
            match event.kind {
                OutputEventKind::Ended => {
                    self.set_playing(false);
                    self.pending.push_back(TransportEvent::Ended);
                }
                OutputEventKind::Failed(message) => {
                    self.set_playing(false);
                    self.pending.push_back(TransportEvent::Error(message));
                }
            }
        }

        if self.playing {
            self.pending.push_back(TransportEvent::TimeUpdate {
                position: self.output.position(),
                duration: self.output.duration(),
            });
        }
        self.publish_media(false);

        self.pending.drain(..).collect()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_loaded(&self) -> bool {
        self.output.is_loaded()
    }

    pub fn position(&self) -> Duration {
        self.output.position()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.output.duration()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    fn set_playing(&mut self, playing: bool) {
        if self.playing != playing {
            self.playing = playing;
            self.pending
                .push_back(TransportEvent::PlayStateChanged(playing));
        }
    }

    fn publish_media(&mut self, force: bool) {
        let Some(media) = self.media.as_mut() else {
            return;
        };

        let due = self
            .last_media_publish
            .is_none_or(|last| last.elapsed() >= MEDIA_PUBLISH_INTERVAL);
        if !force && !due {
            return;
        }

        let position = self.output.position();
        let state = if !self.output.is_loaded() {
            MediaState::Stopped
        } else if self.playing {
            MediaState::Playing(position)
        } else {
            MediaState::Paused(position)
        };
        media.set_playback(state);
        self.last_media_publish = Some(Instant::now());
    }
}
