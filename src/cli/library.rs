use crate::{
    cli::open_logged_in,
    error, info,
    management::catalog,
    trusound::ApiGateway,
    types::{ArtistId, TrackId, ViewSource},
    utils::{self, TrackActions, spinner},
    warning,
};

pub async fn artists(search: Option<String>) {
    let app = open_logged_in().await;

    let pb = spinner("Fetching artists...");
    let result = catalog::fetch_artists(&app.catalog(), app.gateway().as_ref()).await;
    pb.finish_and_clear();
    if let Err(e) = result {
        error!("Failed to load artists. Err: {}", e);
    }

    let mut artists = app.catalog().lock().await.artists().to_vec();
    if let Some(search) = search {
        let search_term = search.to_lowercase();
        artists.retain(|a| a.name.to_lowercase().contains(&search_term));
    }

    if artists.is_empty() {
        warning!("No artists found.");
        return;
    }
    println!("{}", utils::render_artists(&artists));
}

pub async fn albums(artist_id: ArtistId) {
    let app = open_logged_in().await;

    let pb = spinner("Fetching albums...");
    let result = catalog::fetch_albums(&app.catalog(), app.gateway().as_ref(), artist_id).await;
    pb.finish_and_clear();
    if let Err(e) = result {
        error!("Failed to load albums of artist {}. Err: {}", artist_id, e);
    }

    let catalog = app.catalog();
    let catalog = catalog.lock().await;
    if catalog.albums().is_empty() {
        warning!("Artist {} has no albums.", artist_id);
        return;
    }
    println!("{}", utils::render_albums(catalog.albums()));
}

/// Prints the track list behind `source`.
///
/// Favorites are fetched alongside so the table can mark them; a failure
/// there only costs the stars.
pub async fn tracks(source: ViewSource) {
    let app = open_logged_in().await;

    let pb = spinner(format!("Fetching tracks of {}...", source));
    let view = match &source {
        ViewSource::ArtistTracks(artist_id) => app.select_artist(*artist_id).await,
        _ => app.show(source.clone()).await,
    };
    let favorites = app.refresh_favorites().await;
    pb.finish_and_clear();

    if let Err(e) = view {
        error!("Failed to load {}. Err: {}", source, e);
    }
    if let Err(e) = favorites {
        warning!("Could not load favorites: {}", e);
    }

    let catalog = app.catalog();
    let catalog = catalog.lock().await;
    info!("{}", catalog.subtitle());
    if catalog.view_tracks().is_empty() {
        return;
    }
    println!(
        "{}",
        utils::render_tracks(
            catalog.view_tracks(),
            TrackActions::BROWSE,
            &catalog.favorite_ids(),
            None,
        )
    );
}

pub async fn stream_url(track_id: TrackId) {
    let app = open_logged_in().await;
    let Some(stream) = app.gateway().stream_urls() else {
        error!("Not logged in. Run trusound login first");
    };

    let pb = spinner("Looking up track...");
    let track = app.gateway().track(track_id).await;
    pb.finish_and_clear();
    let track = match track {
        Ok(track) => track,
        Err(e) => error!("Failed to load track {}. Err: {}", track_id, e),
    };

    match stream.build(track.id) {
        Ok(url) => {
            info!("{} · {}", track.title, utils::format_duration(track.duration_seconds));
            println!("{}", url);
        }
        Err(e) => error!("Cannot build stream URL. Err: {}", e),
    }
}
