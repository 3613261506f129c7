//! Configuration management for the TruSound client.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Every value has a default, so a bare environment
//! is enough to talk to a server on the local network.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use dotenv;
use std::{env, path::PathBuf, time::Duration};

const DEFAULT_API_URL: &str = "http://10.0.0.10:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PLAYER: &str = "mpv --no-video --really-quiet";
const DEFAULT_PLAYER_START_ARG: &str = "--start=";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `trusound` directory if it doesn't exist. The `.env` file is
/// optional; when present its values fill in anything the environment does
/// not already define.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/trusound/.env`
/// - macOS: `~/Library/Application Support/trusound/.env`
/// - Windows: `%LOCALAPPDATA%/trusound/.env`
///
/// # Errors
///
/// Returns an error if the directory cannot be created or an existing `.env`
/// file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if async_fs::metadata(&path).await.is_ok() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Platform data directory of the client, e.g. `~/.local/share/trusound`.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("trusound");
    path
}

/// Location of the persisted session record.
pub fn session_path() -> PathBuf {
    data_dir().join("session.json")
}

/// Returns the API base URL, always ending in `/api` and never in `/`.
///
/// Reads `TRUSOUND_API_URL`; defaults to `http://10.0.0.10:3000`.
///
/// # Example
///
/// ```
/// let api = api_url(); // e.g., "http://10.0.0.10:3000/api"
/// ```
pub fn api_url() -> String {
    let base = env::var("TRUSOUND_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    normalize_api_url(&base)
}

pub fn normalize_api_url(base: &str) -> String {
    format!("{}/api", base.trim().trim_end_matches('/'))
}

/// Upper bound for a single HTTP request (`TRUSOUND_REQUEST_TIMEOUT_SECS`).
pub fn request_timeout() -> Duration {
    let secs = env::var("TRUSOUND_REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// External player program and its fixed arguments (`TRUSOUND_PLAYER`).
///
/// The stream URL is appended as the last argument.
pub fn player_command() -> Vec<String> {
    let raw = env::var("TRUSOUND_PLAYER").unwrap_or_else(|_| DEFAULT_PLAYER.to_string());
    let parts: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() {
        DEFAULT_PLAYER.split_whitespace().map(str::to_string).collect()
    } else {
        parts
    }
}

/// Argument prefix that makes the external player start at an offset in seconds.
pub fn player_start_arg() -> String {
    env::var("TRUSOUND_PLAYER_START_ARG").unwrap_or_else(|_| DEFAULT_PLAYER_START_ARG.to_string())
}

/// Whether to register with the OS media controls (`TRUSOUND_MEDIA_CONTROLS`).
pub fn media_controls_enabled() -> bool {
    match env::var("TRUSOUND_MEDIA_CONTROLS") {
        Ok(v) => !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "off" | "no"),
        Err(_) => true,
    }
}
