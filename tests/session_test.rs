mod common;

use std::sync::Arc;

use common::{EMAIL, FakeGateway, FakeOutput, PASSWORD, TOKEN, session, tracks};
use tempfile::TempDir;
use trusound::{
    error::TruSoundError,
    management::{App, FileSessionStorage, MemorySessionStorage, SessionStorage, SessionStore},
    playback::Player,
    types::ViewSource,
};

type TestApp = App<FakeGateway, MemorySessionStorage, FakeOutput>;

async fn app_with(storage: MemorySessionStorage) -> (TestApp, Arc<FakeGateway>) {
    let gateway = Arc::new(FakeGateway::new());
    let app = App::open(
        Arc::clone(&gateway),
        storage,
        Player::new(FakeOutput::new()),
    )
    .await
    .unwrap();
    (app, gateway)
}

#[tokio::test]
async fn test_login_returns_and_persists_session() {
    let gateway = FakeGateway::new();
    let mut store = SessionStore::open(MemorySessionStorage::new()).await.unwrap();

    let logged_in = store.login(&gateway, EMAIL, PASSWORD).await.unwrap();

    assert_eq!(logged_in, session());
    assert_eq!(store.current(), Some(&session()));
    assert_eq!(store.storage().stored(), Some(session()));
    assert_eq!(gateway.token().as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn test_bad_credentials_leave_no_session() {
    let gateway = FakeGateway::new();
    let mut store = SessionStore::open(MemorySessionStorage::new()).await.unwrap();

    let err = store.login(&gateway, EMAIL, "wrong").await.unwrap_err();

    assert!(matches!(err, TruSoundError::Auth(ref m) if m == "Invalid credentials"));
    assert!(store.current().is_none());
    assert!(store.storage().stored().is_none());
    assert!(gateway.token().is_none());
}

#[tokio::test]
async fn test_empty_credentials_are_rejected_before_request() {
    let gateway = FakeGateway::new();
    let mut store = SessionStore::open(MemorySessionStorage::new()).await.unwrap();

    assert!(store.login(&gateway, "  ", PASSWORD).await.unwrap_err().is_validation());
    assert!(store.login(&gateway, EMAIL, "").await.unwrap_err().is_validation());
    assert_eq!(gateway.calls("login"), 0);
}

#[tokio::test]
async fn test_open_restores_stored_session() {
    let (mut app, gateway) = app_with(MemorySessionStorage::with_session(session())).await;

    assert_eq!(app.current_session(), Some(&session()));
    assert_eq!(gateway.token().as_deref(), Some(TOKEN));

    // The restored token is enough to play.
    app.show(ViewSource::ArtistTracks(1)).await.unwrap();
    let playing = app.play_view(0).await.unwrap();
    assert_eq!(playing.id, 11);
    assert_eq!(
        app.player().transport().output().loads,
        vec!["http://fake/api/TruSoundCloud/tracks/11/stream?token=t1".to_string()]
    );
}

#[tokio::test]
async fn test_logout_clears_session_caches_and_queue() {
    let (mut app, gateway) = app_with(MemorySessionStorage::new()).await;
    app.login(EMAIL, PASSWORD).await.unwrap();
    app.load_home().await.unwrap();
    app.refresh_favorites().await.unwrap();
    app.refresh_playlists().await.unwrap();
    app.play_view(1).await.unwrap();
    assert!(app.player().current_track().is_some());

    app.logout().await.unwrap();

    assert!(app.current_session().is_none());
    assert!(app.session_store().storage().stored().is_none());
    assert!(gateway.token().is_none());
    assert!(app.player().queue().is_empty());
    assert!(app.player().current_track().is_none());
    assert!(!app.player().transport().is_playing());

    let catalog = app.catalog();
    let catalog = catalog.lock().await;
    assert!(catalog.artists().is_empty());
    assert!(catalog.selected_artist().is_none());
    assert!(catalog.view().is_none());
    assert!(catalog.favorites().is_empty());
    assert!(catalog.my_playlists().is_empty());
}

#[tokio::test]
async fn test_play_after_logout_requires_login() {
    let (mut app, _gateway) = app_with(MemorySessionStorage::with_session(session())).await;
    app.logout().await.unwrap();

    let err = app.player_mut().play_list(tracks(&[1]), 0).unwrap_err();
    assert!(err.is_auth());
    assert!(app.require_session().unwrap_err().is_auth());
}

#[tokio::test]
async fn test_file_storage_round_trip() {
    let dir = TempDir::new().unwrap();
    let storage = FileSessionStorage::new(dir.path().join("nested").join("session.json"));

    assert!(storage.load().await.unwrap().is_none());

    storage.save(&session()).await.unwrap();
    assert_eq!(storage.load().await.unwrap(), Some(session()));
    assert!(!dir.path().join("nested").join("session.json.tmp").exists());

    storage.clear().await.unwrap();
    assert!(storage.load().await.unwrap().is_none());
    storage.clear().await.unwrap();
}

#[tokio::test]
async fn test_file_storage_writes_token_and_user() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let storage = FileSessionStorage::new(&path);

    storage.save(&session()).await.unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["token"], TOKEN);
    assert_eq!(raw["user"]["email"], EMAIL);
    assert_eq!(raw["user"]["id"], 1);
}

#[tokio::test]
async fn test_unreadable_session_record_fails_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = SessionStore::open(FileSessionStorage::new(&path))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, TruSoundError::Storage(_)));
}
