//! # CLI Module
//!
//! The command-line surface of the TruSound client. Each command opens the
//! application state, does one thing against the server and prints the
//! result; `play` instead stays in an interactive loop until the user quits.
//!
//! ## Command Categories
//!
//! ### Session
//!
//! - [`login`] - Exchanges credentials for a session and persists it
//! - [`logout`] - Forgets the session and everything cached with it
//! - [`whoami`] - Shows who the stored session belongs to
//!
//! ### Browsing
//!
//! - [`artists`] - Lists artists, optionally filtered by name
//! - [`albums`] - Lists the albums of an artist
//! - [`tracks`] - Lists the tracks of an artist, album, playlist or the favorites
//! - [`stream_url`] - Prints the authenticated stream URL of a track
//!
//! ### Favorites and Playlists
//!
//! - [`favorites`], [`add_favorite`], [`remove_favorite`]
//! - [`playlists`], [`show_playlist`], [`create_playlist`], [`add_playlist_track`],
//!   [`remove_playlist_track`], [`delete_playlist`]
//!
//! ### Playback
//!
//! - [`play`] - Interactive player: queue navigation, seeking, reordering and
//!   browsing while music plays, with optional OS media controls
//!
//! ## Error Presentation
//!
//! One-shot commands end the process through [`crate::error!`] on failure.
//! The interactive player never exits on a failed command; it reports the
//! problem with [`crate::warning!`] and keeps the current state.

mod auth;
mod favorites;
mod library;
mod player;
mod playlists;

use std::sync::Arc;

pub use auth::{login, logout, whoami};
pub use favorites::{add_favorite, favorites, remove_favorite};
pub use library::{albums, artists, stream_url, tracks};
pub use player::{PlayerCommand, play};
pub use playlists::{
    add_playlist_track, create_playlist, delete_playlist, playlists, remove_playlist_track,
    show_playlist,
};

use crate::{
    error,
    management::{App, FileSessionStorage},
    playback::{Player, ProcessOutput},
    trusound::HttpGateway,
};

/// Application state as the command line wires it.
pub type CliApp = App<HttpGateway, FileSessionStorage, ProcessOutput>;

async fn open_app_with(player: Player<ProcessOutput>) -> CliApp {
    let gateway = match HttpGateway::from_env() {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => error!("Cannot create API client. Err: {}", e),
    };

    match App::open(gateway, FileSessionStorage::default(), player).await {
        Ok(app) => app,
        Err(e) => error!(
            "Failed to load session. Run trusound logout to reset it.\n Error: {}",
            e
        ),
    }
}

async fn open_app() -> CliApp {
    let output = match ProcessOutput::from_env() {
        Ok(output) => output,
        Err(e) => error!("Invalid player configuration. Err: {}", e),
    };
    open_app_with(Player::new(output)).await
}

/// Opens the application state and exits unless a session is stored.
async fn open_logged_in() -> CliApp {
    let app = open_app().await;
    if let Err(e) = app.require_session() {
        error!("{}", e);
    }
    app
}
