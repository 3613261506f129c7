//! OS media controls bridge (MPRIS/SMTC/Now Playing).
//!
//! Optional: when no platform backend is available the player simply runs
//! without one.

use std::time::Duration;

use souvlaki::{
    MediaControlEvent, MediaControls, MediaMetadata, MediaPlayback, MediaPosition,
    PlatformConfig, SeekDirection,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{types::Track, warning};

const MEDIA_CONTROLS_DISPLAY_NAME: &str = "TruSound";
const MEDIA_CONTROLS_DBUS_NAME: &str = "trusound";
const SEEK_STEP_SECS: f64 = 10.0;

/// Requests coming from the OS media surface.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCommand {
    Play,
    Pause,
    Toggle,
    Next,
    Previous,
    Stop,
    SeekTo(Duration),
    /// Relative seek in seconds, negative for backwards.
    SeekBy(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaState {
    Playing(Duration),
    Paused(Duration),
    Stopped,
}

/// A system-level "now playing" surface.
pub trait MediaSession {
    fn set_metadata(&mut self, track: &Track);
    fn set_playback(&mut self, state: MediaState);
}

/// [`MediaSession`] backed by `souvlaki`.
pub struct OsMediaSession {
    controls: MediaControls,
}

impl OsMediaSession {
    /// Registers with the platform media controls, forwarding their events
    /// to `commands`. Returns `None` when the platform has no usable backend.
    #[cfg(not(target_os = "windows"))]
    pub fn new(commands: UnboundedSender<MediaCommand>) -> Option<Self> {
        let mut controls = match MediaControls::new(PlatformConfig {
            display_name: MEDIA_CONTROLS_DISPLAY_NAME,
            dbus_name: MEDIA_CONTROLS_DBUS_NAME,
            hwnd: None,
        }) {
            Ok(controls) => controls,
            Err(err) => {
                warning!("Media controls unavailable: {:?}", err);
                return None;
            }
        };

        if let Err(err) = controls.attach(move |event| {
            if let Some(command) = map_control_event(event) {
                let _ = commands.send(command);
            }
        }) {
            warning!("Failed to attach media controls handler: {:?}", err);
            return None;
        }

        Some(Self { controls })
    }

    // Souvlaki needs a window handle on Windows and a terminal has none.
    #[cfg(target_os = "windows")]
    pub fn new(_commands: UnboundedSender<MediaCommand>) -> Option<Self> {
        None
    }
}

impl MediaSession for OsMediaSession {
    fn set_metadata(&mut self, track: &Track) {
        let result = self.controls.set_metadata(MediaMetadata {
            title: Some(track.title.as_str()),
            album: track.album.as_deref(),
            artist: track.artist_name.as_deref(),
            cover_url: None,
            duration: track.duration_seconds.map(Duration::from_secs),
        });
        if let Err(err) = result {
            warning!("Failed to publish track metadata: {:?}", err);
        }
    }

    fn set_playback(&mut self, state: MediaState) {
        let playback = match state {
            MediaState::Playing(position) => MediaPlayback::Playing {
                progress: Some(MediaPosition(position)),
            },
            MediaState::Paused(position) => MediaPlayback::Paused {
                progress: Some(MediaPosition(position)),
            },
            MediaState::Stopped => MediaPlayback::Stopped,
        };
        // Publishing runs on every tick, so failures stay silent here.
        let _ = self.controls.set_playback(playback);
    }
}

pub fn map_control_event(event: MediaControlEvent) -> Option<MediaCommand> {
    match event {
        MediaControlEvent::Play => Some(MediaCommand::Play),
        MediaControlEvent::Pause => Some(MediaCommand::Pause),
        MediaControlEvent::Toggle => Some(MediaCommand::Toggle),
        MediaControlEvent::Next => Some(MediaCommand::Next),
        MediaControlEvent::Previous => Some(MediaCommand::Previous),
        MediaControlEvent::Stop => Some(MediaCommand::Stop),
        MediaControlEvent::SetPosition(position) => Some(MediaCommand::SeekTo(position.0)),
        MediaControlEvent::Seek(direction) => Some(MediaCommand::SeekBy(signed(
            direction,
            SEEK_STEP_SECS,
        ))),
        MediaControlEvent::SeekBy(direction, delta) => {
            Some(MediaCommand::SeekBy(signed(direction, delta.as_secs_f64())))
        }
        _ => None,
    }
}

fn signed(direction: SeekDirection, secs: f64) -> f64 {
    match direction {
        SeekDirection::Forward => secs,
        SeekDirection::Backward => -secs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_events_become_signed_offsets() {
        assert_eq!(
            map_control_event(MediaControlEvent::Seek(SeekDirection::Backward)),
            Some(MediaCommand::SeekBy(-10.0))
        );
        assert_eq!(
            map_control_event(MediaControlEvent::SeekBy(
                SeekDirection::Forward,
                Duration::from_secs(5)
            )),
            Some(MediaCommand::SeekBy(5.0))
        );
        assert_eq!(
            map_control_event(MediaControlEvent::SetPosition(MediaPosition(
                Duration::from_secs(42)
            ))),
            Some(MediaCommand::SeekTo(Duration::from_secs(42)))
        );
    }

    #[test]
    fn unrelated_events_are_ignored() {
        assert_eq!(map_control_event(MediaControlEvent::Raise), None);
        assert_eq!(map_control_event(MediaControlEvent::Quit), None);
    }
}
