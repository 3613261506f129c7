use trusound::cli::PlayerCommand;

fn parse(line: &str) -> Result<PlayerCommand, String> {
    line.parse()
}

#[test]
fn test_parses_navigation_commands() {
    assert_eq!(parse("next"), Ok(PlayerCommand::Next));
    assert_eq!(parse("  N "), Ok(PlayerCommand::Next));
    assert_eq!(parse("prev"), Ok(PlayerCommand::Previous));
    assert_eq!(parse("pause"), Ok(PlayerCommand::Toggle));
    assert_eq!(parse("jump 3"), Ok(PlayerCommand::Jump(3)));
    assert_eq!(parse("q"), Ok(PlayerCommand::Quit));
    assert_eq!(parse("?"), Ok(PlayerCommand::Help));
}

#[test]
fn test_parses_seeking() {
    assert_eq!(parse("seek 42.5"), Ok(PlayerCommand::Seek(42.5)));
    assert_eq!(parse("ff"), Ok(PlayerCommand::SeekBy(10.0)));
    assert_eq!(parse("rew"), Ok(PlayerCommand::SeekBy(-10.0)));
    assert_eq!(parse("seek"), Err("usage: seek <secs>".to_string()));
}

#[test]
fn test_move_takes_exactly_two_indices() {
    assert_eq!(
        parse("move 0 2"),
        Ok(PlayerCommand::Move { from: 0, to: 2 })
    );
    assert!(parse("move 1").is_err());
    assert!(parse("move 1 2 3").is_err());
    assert!(parse("move a 2").is_err());
    assert!(parse("move -1 2").is_err());
}

#[test]
fn test_parses_browsing_commands() {
    assert_eq!(parse("artist 7"), Ok(PlayerCommand::Artist(7)));
    assert_eq!(parse("playlist 12"), Ok(PlayerCommand::Playlist(12)));
    assert_eq!(parse("favs"), Ok(PlayerCommand::Favorites));
    assert_eq!(parse("play 0"), Ok(PlayerCommand::Play(0)));
    assert_eq!(parse("fav 4"), Ok(PlayerCommand::Favorite(4)));
}

#[test]
fn test_album_keeps_the_full_name() {
    assert_eq!(
        parse("album  Live at the Roundhouse "),
        Ok(PlayerCommand::Album("Live at the Roundhouse".to_string()))
    );
    assert_eq!(parse("album"), Err("usage: album <name>".to_string()));
}

#[test]
fn test_unknown_command() {
    assert_eq!(
        parse("shuffle"),
        Err("Unknown command 'shuffle'. Type help for a list.".to_string())
    );
}
