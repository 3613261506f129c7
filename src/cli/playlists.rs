use crate::{
    cli::open_logged_in,
    error, info, success,
    types::{PlaylistId, TrackId},
    utils::{self, TrackActions, spinner},
    warning,
};

/// Lists the user's own playlists and the public ones.
pub async fn playlists() {
    let app = open_logged_in().await;

    let pb = spinner("Fetching playlists...");
    let result = app.refresh_playlists().await;
    pb.finish_and_clear();
    if let Err(e) = result {
        error!("Failed to load playlists. Err: {}", e);
    }

    let catalog = app.catalog();
    let catalog = catalog.lock().await;

    info!("My playlists");
    if catalog.my_playlists().is_empty() {
        println!("  none yet, create one with trusound playlists create <name>");
    } else {
        println!("{}", utils::render_playlists(catalog.my_playlists()));
    }

    info!("Public playlists");
    if catalog.public_playlists().is_empty() {
        println!("  none");
    } else {
        println!("{}", utils::render_playlists(catalog.public_playlists()));
    }
}

pub async fn show_playlist(playlist_id: PlaylistId) {
    let app = open_logged_in().await;

    let pb = spinner(format!("Fetching playlist {}...", playlist_id));
    let detail = app.open_playlist(playlist_id).await;
    let favorites = app.refresh_favorites().await;
    pb.finish_and_clear();

    if let Err(e) = detail {
        error!("Failed to load playlist {}. Err: {}", playlist_id, e);
    }
    if let Err(e) = favorites {
        warning!("Could not load favorites: {}", e);
    }

    let user_id = app.current_session().map(|s| s.user.id);
    let catalog = app.catalog();
    let catalog = catalog.lock().await;
    let Some(detail) = catalog.playlist_detail() else {
        error!("Playlist {} not found.", playlist_id);
    };

    let playlist = &detail.playlist;
    info!(
        "{} ({}, {} tracks)",
        playlist.name,
        if playlist.is_public { "public" } else { "private" },
        detail.tracks.len()
    );
    if let Some(description) = playlist.description.as_deref().filter(|d| !d.is_empty()) {
        println!("  {}", description);
    }
    if detail.tracks.is_empty() {
        return;
    }

    let owned = user_id.is_some() && playlist.user_id == user_id;
    let actions = if owned {
        TrackActions::OWNED_PLAYLIST
    } else {
        TrackActions::BROWSE
    };
    println!(
        "{}",
        utils::render_tracks(&detail.tracks, actions, &catalog.favorite_ids(), None)
    );
}

pub async fn create_playlist(name: String, description: Option<String>, public: bool) {
    let app = open_logged_in().await;

    let pb = spinner("Creating playlist...");
    let result = app
        .create_playlist(&name, description.as_deref(), public)
        .await;
    pb.finish_and_clear();

    match result {
        Ok(playlist) => success!("Created playlist '{}' ({}).", playlist.name, playlist.id),
        Err(e) => error!("Failed to create playlist. Err: {}", e),
    }
}

pub async fn add_playlist_track(playlist_id: PlaylistId, track_id: TrackId, position: Option<u32>) {
    let app = open_logged_in().await;

    let pb = spinner("Adding track...");
    let result = app.add_to_playlist(playlist_id, track_id, position).await;
    pb.finish_and_clear();

    match result {
        Ok(()) => success!("Added track {} to playlist {}.", track_id, playlist_id),
        Err(e) => error!("Failed to add track. Err: {}", e),
    }
}

pub async fn remove_playlist_track(playlist_id: PlaylistId, track_id: TrackId) {
    let app = open_logged_in().await;

    let pb = spinner("Removing track...");
    let result = app.remove_from_playlist(playlist_id, track_id).await;
    pb.finish_and_clear();

    match result {
        Ok(()) => success!("Removed track {} from playlist {}.", track_id, playlist_id),
        Err(e) => error!("Failed to remove track. Err: {}", e),
    }
}

pub async fn delete_playlist(playlist_id: PlaylistId) {
    let app = open_logged_in().await;

    let pb = spinner("Deleting playlist...");
    let result = app.delete_playlist(playlist_id).await;
    pb.finish_and_clear();

    match result {
        Ok(()) => success!("Deleted playlist {}.", playlist_id),
        Err(e) => error!("Failed to delete playlist. Err: {}", e),
    }
}
