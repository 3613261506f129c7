//! Error kinds shared by the gateway, the session store, the catalog and the
//! playback layers.
//!
//! Every kind is recovered at the operation site: callers print the message
//! and keep whatever state they already had.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TruSoundError {
    /// Bad credentials or missing session. Carries the server message when one was sent.
    #[error("{0}")]
    Auth(String),

    /// Network, HTTP status or response parsing failure.
    #[error("Request failed: {0}")]
    Fetch(String),

    /// The audio output could not load or decode a source.
    #[error("Playback failed: {0}")]
    Playback(String),

    /// Input rejected before any network call.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Reading or writing the persisted session failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for TruSoundError {
    fn from(err: reqwest::Error) -> Self {
        TruSoundError::Fetch(err.to_string())
    }
}

impl From<std::io::Error> for TruSoundError {
    fn from(err: std::io::Error) -> Self {
        TruSoundError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TruSoundError {
    fn from(err: serde_json::Error) -> Self {
        TruSoundError::Storage(err.to_string())
    }
}

impl TruSoundError {
    pub fn is_auth(&self) -> bool {
        matches!(self, TruSoundError::Auth(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, TruSoundError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, TruSoundError>;
