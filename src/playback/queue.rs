//! Playback queue engine.
//!
//! Holds the list that is currently eligible for sequential playback and the
//! position in it. A queue is always a snapshot of one source list: starting
//! playback from another list replaces it wholesale.

use crate::{
    error::{Result, TruSoundError},
    types::Track,
};

/// Ordered tracks plus the current position.
///
/// `current` is `None` until something is played and is always a valid index
/// into `tracks` otherwise.
#[derive(Debug, Clone, Default)]
pub struct PlaybackQueue {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the queue with `list` and makes `index` the current track.
    ///
    /// Returns the new now-playing track. On an out-of-range index the queue
    /// is left untouched.
    pub fn set_and_play(&mut self, list: Vec<Track>, index: usize) -> Result<&Track> {
        if index >= list.len() {
            return Err(TruSoundError::Validation(format!(
                "index {} out of range for a list of {} tracks",
                index,
                list.len()
            )));
        }

        self.tracks = list;
        self.current = Some(index);
        Ok(&self.tracks[index])
    }

    /// Moves to the next track. `None` at the end of the queue (no wraparound).
    pub fn advance(&mut self) -> Option<&Track> {
        let current = self.current?;
        if current + 1 >= self.tracks.len() {
            return None;
        }
        self.current = Some(current + 1);
        self.tracks.get(current + 1)
    }

    /// Moves to the previous track. `None` at the start of the queue.
    pub fn retreat(&mut self) -> Option<&Track> {
        let current = self.current?;
        if current == 0 {
            return None;
        }
        self.current = Some(current - 1);
        self.tracks.get(current - 1)
    }

    /// Jumps to `index` inside the existing queue.
    pub fn jump(&mut self, index: usize) -> Result<&Track> {
        if index >= self.tracks.len() {
            return Err(TruSoundError::Validation(format!(
                "queue position {} does not exist ({} queued)",
                index,
                self.tracks.len()
            )));
        }
        self.current = Some(index);
        Ok(&self.tracks[index])
    }

    /// Moves the track at `from` to `to` (remove-then-insert) and keeps the
    /// current position on the same track.
    ///
    /// - the moved track is the current one: current becomes `to`
    /// - `from` before current, `to` at or after it: current shifts down by one
    /// - `from` after current, `to` at or before it: current shifts up by one
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.tracks.len();
        if from >= len || to >= len {
            return Err(TruSoundError::Validation(format!(
                "cannot move {} to {} in a queue of {}",
                from, to, len
            )));
        }
        if from == to {
            return Ok(());
        }

        let track = self.tracks.remove(from);
        self.tracks.insert(to, track);

        if let Some(current) = self.current {
            self.current = Some(if from == current {
                to
            } else if from < current && to >= current {
                current - 1
            } else if from > current && to <= current {
                current + 1
            } else {
                current
            });
        }
        Ok(())
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|index| self.tracks.get(index))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn has_next(&self) -> bool {
        matches!(self.current, Some(current) if current + 1 < self.tracks.len())
    }

    pub fn has_previous(&self) -> bool {
        matches!(self.current, Some(current) if current > 0)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current = None;
    }
}
