use std::{
    process::{Child, Command, Stdio},
    time::{Duration, Instant},
};

use crate::{
    config,
    error::{Result, TruSoundError},
    playback::output::{AudioOutput, OutputEvent, OutputEventKind},
};

struct LoadedSource {
    url: String,
    generation: u64,
    duration: Option<Duration>,
}

/// [`AudioOutput`] that plays through an external command-line player.
///
/// The player is started on the stream URL and runs until the track ends.
/// Pausing stops the process and remembers the position; resuming and seeking
/// restart it with the configured start-offset argument. The position is
/// tracked with a wall clock from the last (re)start.
pub struct ProcessOutput {
    program: String,
    args: Vec<String>,
    start_arg: String,
    source: Option<LoadedSource>,
    child: Option<Child>,
    offset: Duration,
    started_at: Option<Instant>,
}

impl ProcessOutput {
    pub fn new(command: Vec<String>, start_arg: impl Into<String>) -> Result<Self> {
        let mut parts = command.into_iter();
        let program = parts.next().ok_or_else(|| {
            TruSoundError::Validation("player command must not be empty".to_string())
        })?;

        Ok(Self {
            program,
            args: parts.collect(),
            start_arg: start_arg.into(),
            source: None,
            child: None,
            offset: Duration::ZERO,
            started_at: None,
        })
    }

    /// Player configured through `TRUSOUND_PLAYER` and `TRUSOUND_PLAYER_START_ARG`.
    pub fn from_env() -> Result<Self> {
        Self::new(config::player_command(), config::player_start_arg())
    }

    fn spawn(&mut self) -> Result<()> {
        self.kill();
        let Some(source) = &self.source else {
            return Err(TruSoundError::Playback("nothing loaded".to_string()));
        };

        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if !self.offset.is_zero() {
            command.arg(format!("{}{:.3}", self.start_arg, self.offset.as_secs_f64()));
        }
        command
            .arg(&source.url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = command.spawn().map_err(|e| {
            TruSoundError::Playback(format!("could not start '{}': {}", self.program, e))
        })?;
        self.child = Some(child);
        self.started_at = Some(Instant::now());
        Ok(())
    }

    fn kill(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.started_at = None;
    }

    fn clamp(&self, position: Duration) -> Duration {
        match self.duration() {
            Some(total) => position.min(total),
            None => position,
        }
    }
}

impl AudioOutput for ProcessOutput {
    fn load(&mut self, url: &str, generation: u64, duration: Option<Duration>) -> Result<()> {
        self.kill();
        self.source = Some(LoadedSource {
            url: url.to_string(),
            generation,
            duration,
        });
        self.offset = Duration::ZERO;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.started_at.is_some() {
            return Ok(());
        }
        self.spawn()
    }

    fn pause(&mut self) -> Result<()> {
        if self.started_at.is_some() {
            self.offset = self.position();
            self.kill();
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.kill();
        self.source = None;
        self.offset = Duration::ZERO;
    }

    fn is_loaded(&self) -> bool {
        self.source.is_some()
    }

    fn is_paused(&self) -> bool {
        self.started_at.is_none()
    }

    fn position(&self) -> Duration {
        let elapsed = self
            .started_at
            .map(|started| started.elapsed())
            .unwrap_or_default();
        self.clamp(self.offset + elapsed)
    }

    fn duration(&self) -> Option<Duration> {
        self.source.as_ref().and_then(|s| s.duration)
    }

    fn set_position(&mut self, position: Duration) -> Result<()> {
        self.offset = self.clamp(position);
        if self.started_at.is_some() {
            self.spawn()?;
        }
        Ok(())
    }

    fn poll_event(&mut self) -> Option<OutputEvent> {
        let generation = self.source.as_ref()?.generation;
        let child = self.child.as_mut()?;

        let kind = match child.try_wait() {
            Ok(None) => return None,
            Ok(Some(status)) if status.success() => OutputEventKind::Ended,
            Ok(Some(status)) => OutputEventKind::Failed(format!("player exited with {}", status)),
            Err(e) => OutputEventKind::Failed(e.to_string()),
        };

        self.child = None;
        self.started_at = None;
        self.offset = match kind {
            OutputEventKind::Ended => self.duration().unwrap_or(self.offset),
            OutputEventKind::Failed(_) => self.offset,
        };
        Some(OutputEvent { generation, kind })
    }
}

impl Drop for ProcessOutput {
    fn drop(&mut self) {
        self.kill();
    }
}
