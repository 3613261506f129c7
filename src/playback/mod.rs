//! # Playback Module
//!
//! The playback side of the client, leaf first:
//!
//! - [`queue`] - the queue engine: which list is playing and where in it
//! - [`output`] - the audio output port the transport drives
//! - [`process`] - an output that plays through an external player program
//! - [`media`] - OS media controls (MPRIS/SMTC/Now Playing) via `souvlaki`
//! - [`transport`] - the adapter between playback intent and the output
//! - [`player`] - queue and transport wired together
//!
//! Everything here is single-threaded and driven by the caller: the player
//! loop calls [`Player::tick`] periodically and reacts to what it returns.

pub mod media;
pub mod output;
pub mod player;
pub mod process;
pub mod queue;
pub mod transport;

pub use media::{MediaCommand, MediaSession, MediaState, OsMediaSession};
pub use output::{AudioOutput, OutputEvent, OutputEventKind};
pub use player::{Player, PlayerEvent};
pub use process::ProcessOutput;
pub use queue::PlaybackQueue;
pub use transport::{Transport, TransportEvent};
