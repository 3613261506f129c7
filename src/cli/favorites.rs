use crate::{
    cli::{CliApp, open_logged_in},
    error, info, success,
    types::TrackId,
    utils::{self, TrackActions, spinner},
    warning,
};

pub async fn favorites() {
    let app = open_logged_in().await;
    load_favorites(&app).await;

    let catalog = app.catalog();
    let catalog = catalog.lock().await;
    if catalog.favorites().is_empty() {
        info!("No favorites yet.");
        return;
    }
    println!(
        "{}",
        utils::render_tracks(
            catalog.favorites(),
            TrackActions::BROWSE,
            &catalog.favorite_ids(),
            None,
        )
    );
}

pub async fn add_favorite(track_id: TrackId) {
    set_favorite(track_id, true).await;
}

pub async fn remove_favorite(track_id: TrackId) {
    set_favorite(track_id, false).await;
}

// Favorite state is read back from the server; toggling from a stale list
// would flip it the wrong way.
async fn set_favorite(track_id: TrackId, favorite: bool) {
    let app = open_logged_in().await;
    load_favorites(&app).await;

    if app.catalog().lock().await.is_favorite(track_id) == favorite {
        warning!(
            "Track {} is {} a favorite.",
            track_id,
            if favorite { "already" } else { "not" }
        );
        return;
    }

    let pb = spinner("Updating favorites...");
    let result = app.toggle_favorite(track_id).await;
    pb.finish_and_clear();

    match result {
        Ok(true) => success!("Added track {} to favorites.", track_id),
        Ok(false) => success!("Removed track {} from favorites.", track_id),
        Err(e) => error!("Failed to update favorites. Err: {}", e),
    }
}

async fn load_favorites(app: &CliApp) {
    let pb = spinner("Fetching favorites...");
    let result = app.refresh_favorites().await;
    pb.finish_and_clear();
    if let Err(e) = result {
        error!("Failed to load favorites. Err: {}", e);
    }
}
