use std::time::Duration;

use crate::error::Result;

/// What an output reports about a source on its own initiative.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEventKind {
    /// The source played to its natural end.
    Ended,
    /// The source could not be fetched or decoded.
    Failed(String),
}

/// An output event tagged with the generation of the source it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputEvent {
    pub generation: u64,
    pub kind: OutputEventKind,
}

/// The single audio playback primitive the transport drives.
///
/// Implementations tag every event with the `generation` given to the `load`
/// that produced the source, so events of a superseded source can be told
/// apart from events of the current one.
pub trait AudioOutput {
    /// Replaces the source. The new source starts paused at position zero.
    fn load(&mut self, url: &str, generation: u64, duration: Option<Duration>) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    /// Drops the source entirely.
    fn stop(&mut self);
    fn is_loaded(&self) -> bool;
    fn is_paused(&self) -> bool;
    fn position(&self) -> Duration;
    fn duration(&self) -> Option<Duration>;
    fn set_position(&mut self, position: Duration) -> Result<()>;
    fn poll_event(&mut self) -> Option<OutputEvent>;
}
