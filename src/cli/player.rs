use std::{str::FromStr, time::Duration};

use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc::{self, UnboundedSender},
    time::MissedTickBehavior,
};

use crate::{
    cli::{CliApp, open_app_with},
    config,
    error::Result,
    error, info,
    management::{FetchOutcome, catalog},
    playback::{OsMediaSession, Player, PlayerEvent, ProcessOutput, TransportEvent},
    success,
    types::{ArtistId, PlaylistId, Track, ViewSource},
    utils::{self, TrackActions, spinner},
    warning,
};

const TICK_INTERVAL: Duration = Duration::from_millis(250);
const SKIP_SECS: f64 = 10.0;

const HELP: &str = "\
  next | n              play the next track in the queue
  prev | p              play the previous track
  toggle | t            pause or resume
  seek <secs>           jump to a position in the current track
  ff | rew              skip 10 seconds forward or back
  jump <index>          play the queued track at <index>
  move <from> <to>      reorder the queue
  queue                 show the queue
  view                  show the track list last loaded
  artist <id>           load an artist's tracks
  album <name>          load an album of the selected artist
  favorites             load your favorites
  playlist <id>         load a playlist
  play <index>          play the loaded track list from <index>
  fav <index>           toggle favorite for a track of the loaded list
  now                   show what is playing
  help                  show this help
  quit | q              stop playback and exit";

/// A line typed into the interactive player.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    Next,
    Previous,
    Toggle,
    Seek(f64),
    SeekBy(f64),
    Jump(usize),
    Move { from: usize, to: usize },
    Queue,
    View,
    Artist(ArtistId),
    Album(String),
    Favorites,
    Playlist(PlaylistId),
    Play(usize),
    Favorite(usize),
    Now,
    Help,
    Quit,
}

impl FromStr for PlayerCommand {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "next" | "n" => PlayerCommand::Next,
            "prev" | "p" => PlayerCommand::Previous,
            "toggle" | "t" | "pause" => PlayerCommand::Toggle,
            "seek" => PlayerCommand::Seek(number(rest, "seek <secs>")?),
            "ff" => PlayerCommand::SeekBy(SKIP_SECS),
            "rew" => PlayerCommand::SeekBy(-SKIP_SECS),
            "jump" => PlayerCommand::Jump(number(rest, "jump <index>")?),
            "move" => {
                let mut args = rest.split_whitespace();
                let (Some(from), Some(to), None) = (args.next(), args.next(), args.next()) else {
                    return Err("usage: move <from> <to>".to_string());
                };
                PlayerCommand::Move {
                    from: number(from, "move <from> <to>")?,
                    to: number(to, "move <from> <to>")?,
                }
            }
            "queue" => PlayerCommand::Queue,
            "view" => PlayerCommand::View,
            "artist" => PlayerCommand::Artist(number(rest, "artist <id>")?),
            "album" if !rest.is_empty() => PlayerCommand::Album(rest.to_string()),
            "album" => return Err("usage: album <name>".to_string()),
            "favorites" | "favs" => PlayerCommand::Favorites,
            "playlist" => PlayerCommand::Playlist(number(rest, "playlist <id>")?),
            "play" => PlayerCommand::Play(number(rest, "play <index>")?),
            "fav" => PlayerCommand::Favorite(number(rest, "fav <index>")?),
            "now" => PlayerCommand::Now,
            "help" | "?" => PlayerCommand::Help,
            "quit" | "q" | "exit" => PlayerCommand::Quit,
            other => return Err(format!("Unknown command '{}'. Type help for a list.", other)),
        };
        Ok(command)
    }
}

fn number<T: FromStr>(value: &str, usage: &str) -> std::result::Result<T, String> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| format!("usage: {}", usage))
}

type FetchDone = (ViewSource, Result<FetchOutcome>);

/// Runs the interactive player.
///
/// Starts `source` (or the first artist when `None`) at `index`, then reads
/// commands from stdin until `quit`, end of input or Ctrl-C. Track lists
/// requested while playing are fetched in the background; when several are
/// requested in a row only the last one is shown.
pub async fn play(source: Option<ViewSource>, index: usize) {
    let (media_tx, mut media_rx) = mpsc::unbounded_channel();
    let output = match ProcessOutput::from_env() {
        Ok(output) => output,
        Err(e) => error!("Invalid player configuration. Err: {}", e),
    };
    let mut player = Player::new(output);
    if config::media_controls_enabled() {
        if let Some(session) = OsMediaSession::new(media_tx.clone()) {
            player = player.with_media_session(Box::new(session));
        }
    }

    let mut app = open_app_with(player).await;
    if let Err(e) = app.require_session() {
        error!("{}", e);
    }

    let pb = spinner("Loading...");
    let started = match source {
        Some(source) => app.play_source(source, index).await,
        None => match app.load_home().await {
            Ok(_) => app.play_view(index).await,
            Err(e) => Err(e),
        },
    };
    let favorites = app.refresh_favorites().await;
    pb.finish_and_clear();

    match started {
        Ok(track) => announce(&track),
        Err(e) => error!("Cannot start playback. Err: {}", e),
    }
    if let Err(e) = favorites {
        warning!("Could not load favorites: {}", e);
    }
    info!("Type help for commands.");

    let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel::<FetchDone>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match line.parse::<PlayerCommand>() {
                    Ok(PlayerCommand::Quit) => break,
                    Ok(command) => run_command(&mut app, command, &fetch_tx).await,
                    Err(e) => warning!("{}", e),
                },
                Ok(None) => break,
                Err(e) => {
                    warning!("Cannot read input: {}", e);
                    break;
                }
            },
            Some((source, outcome)) = fetch_rx.recv() => on_fetched(&app, source, outcome).await,
            Some(command) = media_rx.recv() => {
                match app.player_mut().handle_media_command(command) {
                    Ok(Some(event)) => report(&event),
                    Ok(None) => {}
                    Err(e) => warning!("{}", e),
                }
            }
            _ = ticker.tick() => {
                for event in app.player_mut().tick() {
                    report(&event);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    app.player_mut().clear();
    info!("Playback stopped.");
}

async fn run_command(app: &mut CliApp, command: PlayerCommand, fetches: &UnboundedSender<FetchDone>) {
    let result = match command {
        PlayerCommand::Next => app.player_mut().next().map(|track| match track {
            Some(track) => announce(&track),
            None => info!("Already at the last track."),
        }),
        PlayerCommand::Previous => app.player_mut().previous().map(|track| match track {
            Some(track) => announce(&track),
            None => info!("Already at the first track."),
        }),
        PlayerCommand::Toggle => app.player_mut().toggle(),
        PlayerCommand::Seek(secs) => app.player_mut().seek(secs),
        PlayerCommand::SeekBy(delta) => app.player_mut().seek_by(delta),
        PlayerCommand::Jump(index) => app.player_mut().jump(index).map(|t| announce(&t)),
        PlayerCommand::Move { from, to } => match app.player_mut().reorder(from, to) {
            Ok(()) => {
                print_queue(app).await;
                Ok(())
            }
            Err(e) => Err(e),
        },
        PlayerCommand::Queue => {
            print_queue(app).await;
            Ok(())
        }
        PlayerCommand::View => {
            print_view(app).await;
            Ok(())
        }
        PlayerCommand::Artist(artist_id) => {
            spawn_fetch(app, ViewSource::ArtistTracks(artist_id), fetches);
            Ok(())
        }
        PlayerCommand::Album(name) => {
            let selected = app.catalog().lock().await.selected_artist().map(|a| a.id);
            let artist_id = selected.or_else(|| app.player().current_track().and_then(|t| t.artist_id));
            match artist_id {
                Some(artist_id) => spawn_fetch(app, ViewSource::Album { artist_id, name }, fetches),
                None => warning!("Select an artist first."),
            }
            Ok(())
        }
        PlayerCommand::Favorites => {
            spawn_fetch(app, ViewSource::Favorites, fetches);
            Ok(())
        }
        PlayerCommand::Playlist(playlist_id) => {
            spawn_fetch(app, ViewSource::Playlist(playlist_id), fetches);
            Ok(())
        }
        PlayerCommand::Play(index) => app.play_view(index).await.map(|t| announce(&t)),
        PlayerCommand::Favorite(index) => toggle_favorite(app, index).await,
        PlayerCommand::Now => {
            print_now(app);
            Ok(())
        }
        PlayerCommand::Help => {
            println!("{}", HELP);
            Ok(())
        }
        PlayerCommand::Quit => Ok(()),
    };

    if let Err(e) = result {
        warning!("{}", e);
    }
}

fn spawn_fetch(app: &CliApp, source: ViewSource, fetches: &UnboundedSender<FetchDone>) {
    let catalog = app.catalog();
    let gateway = app.gateway();
    let fetches = fetches.clone();
    info!("Loading {}...", source);

    tokio::spawn(async move {
        let outcome = match &source {
            ViewSource::ArtistTracks(artist_id) => {
                catalog::select_artist_by_id(&catalog, gateway.as_ref(), *artist_id).await
            }
            _ => catalog::fetch_view(&catalog, gateway.as_ref(), source.clone()).await,
        };
        let _ = fetches.send((source, outcome));
    });
}

async fn on_fetched(app: &CliApp, source: ViewSource, outcome: Result<FetchOutcome>) {
    match outcome {
        Ok(FetchOutcome::Applied) => print_view(app).await,
        Ok(FetchOutcome::Stale) => {}
        Err(e) => warning!("Could not load {}: {}", source, e),
    }
}

async fn toggle_favorite(app: &CliApp, index: usize) -> Result<()> {
    let track = app.catalog().lock().await.view_tracks().get(index).cloned();
    let Some(track) = track else {
        warning!("No track at index {} in the loaded list.", index);
        return Ok(());
    };

    if app.toggle_favorite(track.id).await? {
        success!("Added '{}' to favorites.", track.title);
    } else {
        success!("Removed '{}' from favorites.", track.title);
    }
    Ok(())
}

fn announce(track: &Track) {
    success!(
        "Now playing: {} · {}",
        track.title,
        track.artist_name.as_deref().unwrap_or("Unknown artist")
    );
}

fn report(event: &PlayerEvent) {
    match event {
        PlayerEvent::NowPlaying(track) => announce(track),
        PlayerEvent::QueueFinished => info!("End of queue."),
        PlayerEvent::Transport(TransportEvent::PlayStateChanged(true)) => info!("Playing."),
        PlayerEvent::Transport(TransportEvent::PlayStateChanged(false)) => info!("Paused."),
        PlayerEvent::Transport(TransportEvent::Error(message)) => {
            warning!("Playback error: {}", message)
        }
        PlayerEvent::Transport(TransportEvent::TimeUpdate { .. } | TransportEvent::Ended) => {}
    }
}

fn print_now(app: &CliApp) {
    let player = app.player();
    let Some(track) = player.current_track() else {
        info!("Nothing is playing.");
        return;
    };

    let transport = player.transport();
    let position = utils::format_position(transport.position());
    let duration = transport
        .duration()
        .map(utils::format_position)
        .unwrap_or_else(|| utils::format_duration(None));
    let state = if transport.is_playing() { "playing" } else { "paused" };
    let queue = player.queue();
    info!(
        "{} · {} [{} / {}] {} ({}/{})",
        track.title,
        track.artist_name.as_deref().unwrap_or("Unknown artist"),
        position,
        duration,
        state,
        queue.current_index().map_or(0, |i| i + 1),
        queue.len()
    );
}

async fn print_queue(app: &CliApp) {
    let favorites = app.catalog().lock().await.favorite_ids();
    let queue = app.player().queue();
    if queue.is_empty() {
        info!("The queue is empty.");
        return;
    }
    println!(
        "{}",
        utils::render_tracks(
            queue.tracks(),
            TrackActions::NONE,
            &favorites,
            queue.current_index()
        )
    );
}

async fn print_view(app: &CliApp) {
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
