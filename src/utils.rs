use std::{collections::HashSet, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::{Table, builder::Builder};

use crate::types::{
    Album, AlbumTableRow, Artist, ArtistTableRow, Playlist, PlaylistTableRow, Track, TrackId,
};

/// What the user may do with the tracks of a table.
///
/// One render function serves every list; which columns show up depends on
/// these flags alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackActions {
    pub can_add: bool,
    pub can_remove: bool,
    pub can_favorite: bool,
}

impl TrackActions {
    pub const NONE: TrackActions = TrackActions {
        can_add: false,
        can_remove: false,
        can_favorite: false,
    };

    /// Browsing a catalog list: tracks can be favorited or added to a playlist.
    pub const BROWSE: TrackActions = TrackActions {
        can_add: true,
        can_remove: false,
        can_favorite: true,
    };

    /// Inside a playlist the user owns.
    pub const OWNED_PLAYLIST: TrackActions = TrackActions {
        can_add: false,
        can_remove: true,
        can_favorite: true,
    };
}

/// `m:ss`, or `–` when the duration is unknown.
pub fn format_duration(seconds: Option<u64>) -> String {
    match seconds {
        Some(seconds) => format!("{}:{:02}", seconds / 60, seconds % 60),
        None => "–".to_string(),
    }
}

/// Playback position as `m:ss`; fractions are dropped.
pub fn format_position(position: Duration) -> String {
    format_duration(Some(position.as_secs()))
}

/// File size in megabytes with one decimal, e.g. `4.2 MB`.
pub fn format_size(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}

pub fn format_year(year: Option<i32>) -> String {
    year.map_or_else(|| "n/a".to_string(), |y| y.to_string())
}

/// Renders a track list as a table.
///
/// `current` marks the row that is playing; favorites get a star when the
/// actions allow favoriting at all.
pub fn render_tracks(
    tracks: &[Track],
    actions: TrackActions,
    favorites: &HashSet<TrackId>,
    current: Option<usize>,
) -> String {
    let mut header = vec!["#", "", "Title", "Artist", "Year", "Duration", "Size"];
    if actions.can_favorite {
        header.push("Fav");
    }
    if actions.can_add || actions.can_remove {
        header.push("Actions");
    }

    let mut builder = Builder::default();
    builder.push_record(header.into_iter().map(String::from));

    for (index, track) in tracks.iter().enumerate() {
        let mut row = vec![
            index.to_string(),
            if current == Some(index) { "▶" } else { "" }.to_string(),
            track.title.clone(),
            track.artist_name.clone().unwrap_or_default(),
            format_year(track.year),
            format_duration(track.duration_seconds),
            format_size(track.size),
        ];
        if actions.can_favorite {
            row.push(if favorites.contains(&track.id) { "★" } else { "☆" }.to_string());
        }
        if actions.can_add || actions.can_remove {
            let mut hints = Vec::new();
            if actions.can_add {
                hints.push("add");
            }
            if actions.can_remove {
                hints.push("remove");
            }
            row.push(hints.join(", "));
        }
        builder.push_record(row);
    }

    builder.build().to_string()
}

pub fn render_artists(artists: &[Artist]) -> String {
    let rows: Vec<ArtistTableRow> = artists
        .iter()
        .map(|a| ArtistTableRow {
            id: a.id,
            name: a.name.clone(),
            description: a.description.clone().unwrap_or_default(),
        })
        .collect();
    Table::new(rows).to_string()
}

pub fn render_albums(albums: &[Album]) -> String {
    let rows: Vec<AlbumTableRow> = albums
        .iter()
        .map(|a| AlbumTableRow {
            name: a.name.clone(),
            tracks: a.track_count.map_or(a.tracks.len(), |c| c as usize),
        })
        .collect();
    Table::new(rows).to_string()
}

pub fn render_playlists(playlists: &[Playlist]) -> String {
    let rows: Vec<PlaylistTableRow> = playlists
        .iter()
        .map(|p| PlaylistTableRow {
            id: p.id,
            name: p.name.clone(),
            visibility: if p.is_public { "public" } else { "private" }.to_string(),
            owner: p.owner_email.clone().unwrap_or_default(),
            created: p
                .created_at
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        })
        .collect();
    Table::new(rows).to_string()
}

/// Spinner in the style every long-running command uses.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    pb.set_style(style);
    pb
}
