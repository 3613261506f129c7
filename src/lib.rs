//! TruSound Terminal Client Library
//!
//! This library provides the client core for a self-hosted TruSoundCloud music
//! server: an authenticated API gateway, a persisted login session, a catalog
//! cache that discards stale responses, and a playback queue bound to a single
//! audio output with optional OS media controls.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations and the interactive player
//! - `config` - Configuration management and environment variables
//! - `error` - Error kinds shared by every layer
//! - `management` - Session store, catalog cache and application state
//! - `playback` - Playback queue engine, transport adapter and audio outputs
//! - `trusound` - TruSoundCloud REST API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Formatting helpers and track table rendering
//!
//! # Example
//!
//! ```
//! use trusound::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> trusound::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod playback;
pub mod trusound;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the binary boundary where errors from different layers meet.
/// Library code returns [`error::Result`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```ignore
/// info!("Loading artists...");
/// info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```ignore
/// success!("Logged in as {}", email);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used for fatal errors outside the interactive player, where recovery
/// is not possible. The player loop reports failures with [`warning!`] instead.
///
/// # Example
///
/// ```ignore
/// error!("Not logged in. Run trusound login first");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable failures: a fetch that did not complete, a track
/// that failed to decode, a rejected command.
///
/// # Example
///
/// ```ignore
/// warning!("Could not load favorites: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
