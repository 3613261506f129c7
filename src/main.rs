use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use trusound::{
    cli, config, error,
    types::{ArtistId, PlaylistId, TrackId, ViewSource},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in to the TruSoundCloud server
    Login(LoginOptions),

    /// Forget the stored session
    Logout,

    /// Show who is logged in
    Whoami,

    /// List artists
    Artists(ArtistsOptions),

    /// List the albums of an artist
    Albums(AlbumsOptions),

    /// List tracks of an artist, an album, a playlist or your favorites
    Tracks(SourceOptions),

    /// Handle favorites
    Favorites(FavoritesOptions),

    /// Handle playlists
    Playlists(PlaylistsOptions),

    /// Print the authenticated stream URL of a track
    StreamUrl(StreamUrlOptions),

    /// Play interactively
    Play(PlayOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct LoginOptions {
    /// Account email; prompted for when missing
    #[clap(long, env = "TRUSOUND_EMAIL")]
    pub email: Option<String>,

    /// Account password; prompted for when missing
    #[clap(long, env = "TRUSOUND_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistsOptions {
    /// Search for artists by name
    #[clap(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AlbumsOptions {
    /// Artist id
    #[clap(long)]
    pub artist: ArtistId,
}

/// Where a track list comes from. Without any flag the first artist is used.
#[derive(Args, Debug, Clone)]
pub struct SourceOptions {
    /// Tracks of an artist
    #[clap(long, conflicts_with_all = ["favorites", "playlist"])]
    pub artist: Option<ArtistId>,

    /// Narrow `--artist` down to one of its albums, by name
    #[clap(long, requires = "artist")]
    pub album: Option<String>,

    /// Your favorite tracks
    #[clap(long, conflicts_with = "playlist")]
    pub favorites: bool,

    /// Tracks of a playlist
    #[clap(long)]
    pub playlist: Option<PlaylistId>,
}

impl SourceOptions {
    fn source(&self) -> Option<ViewSource> {
        if let Some(artist_id) = self.artist {
            return Some(match &self.album {
                Some(name) => ViewSource::Album {
                    artist_id,
                    name: name.clone(),
                },
                None => ViewSource::ArtistTracks(artist_id),
            });
        }
        if self.favorites {
            return Some(ViewSource::Favorites);
        }
        self.playlist.map(ViewSource::Playlist)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Handle favorites",
    args_conflicts_with_subcommands = true
)]
pub struct FavoritesOptions {
    /// Subcommands under `favorites` (e.g., `add`)
    #[command(subcommand)]
    pub command: Option<FavoritesSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FavoritesSubcommand {
    /// Mark a track as favorite
    Add { track: TrackId },
    /// Remove a track from favorites
    Remove { track: TrackId },
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Handle playlists", args_conflicts_with_subcommands = true)]
pub struct PlaylistsOptions {
    /// Subcommands under `playlists` (e.g., `create`)
    #[command(subcommand)]
    pub command: Option<PlaylistsSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistsSubcommand {
    /// Show the tracks of a playlist
    Show { playlist: PlaylistId },

    /// Create a playlist
    Create {
        name: String,
        #[clap(long)]
        description: Option<String>,
        /// Make the playlist visible to everyone
        #[clap(long)]
        public: bool,
    },

    /// Add a track to a playlist
    Add {
        playlist: PlaylistId,
        track: TrackId,
        /// Position in the playlist; appended when missing
        #[clap(long)]
        position: Option<u32>,
    },

    /// Remove a track from a playlist
    Remove { playlist: PlaylistId, track: TrackId },

    /// Delete a playlist
    Delete { playlist: PlaylistId },
}

#[derive(Parser, Debug, Clone)]
pub struct StreamUrlOptions {
    /// Track id
    pub track: TrackId,
}

#[derive(Parser, Debug, Clone)]
pub struct PlayOptions {
    #[clap(flatten)]
    pub source: SourceOptions,

    /// Index of the first track to play
    #[clap(long, default_value_t = 0)]
    pub index: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Login(opt) => cli::login(opt.email, opt.password).await,
        Command::Logout => cli::logout().await,
        Command::Whoami => cli::whoami().await,
        Command::Artists(opt) => cli::artists(opt.search).await,
        Command::Albums(opt) => cli::albums(opt.artist).await,
        Command::Tracks(opt) => match opt.source() {
            Some(source) => cli::tracks(source).await,
            None => error!("Pick a source: --artist, --favorites or --playlist"),
        },

        Command::Favorites(opt) => match opt.command {
            Some(FavoritesSubcommand::Add { track }) => cli::add_favorite(track).await,
            Some(FavoritesSubcommand::Remove { track }) => cli::remove_favorite(track).await,
            None => cli::favorites().await,
        },

        Command::Playlists(opt) => match opt.command {
            Some(PlaylistsSubcommand::Show { playlist }) => cli::show_playlist(playlist).await,
            Some(PlaylistsSubcommand::Create {
                name,
                description,
                public,
            }) => cli::create_playlist(name, description, public).await,
            Some(PlaylistsSubcommand::Add {
                playlist,
                track,
                position,
            }) => cli::add_playlist_track(playlist, track, position).await,
            Some(PlaylistsSubcommand::Remove { playlist, track }) => {
                cli::remove_playlist_track(playlist, track).await
            }
            Some(PlaylistsSubcommand::Delete { playlist }) => {
                cli::delete_playlist(playlist).await
            }
            None => cli::playlists().await,
        },

        Command::StreamUrl(opt) => cli::stream_url(opt.track).await,
        Command::Play(opt) => cli::play(opt.source.source(), opt.index).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
