//! Configuration management for lineupcli.
//!
//! Values come from environment variables, optionally seeded from `.env` files.
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the working directory
//! 3. `.env` in the local data directory (`<data dir>/lineupcli/.env`)
//! 4. Built-in defaults
//!
//! [`Settings::from_env`] turns the raw variables into typed settings once at
//! startup; nothing else in the crate reads the environment.

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::{error::ConfigError, retry::RetryPolicy, types::Visibility};

pub const APP_DIR: &str = "lineupcli";

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_MARKET: &str = "US";
pub const DEFAULT_PLAYLIST_NAME: &str = "Escuchar";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_POOL_SIZE: usize = 5;

/// Loads `.env` files without overriding variables that are already set.
///
/// Creates `<data dir>/lineupcli/` if needed. Missing files are not an error.
pub async fn load_env() -> Result<(), ConfigError> {
    let mut path = data_dir();
    path.push(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::Environment(e.to_string()))?;
    }

    if dotenv::dotenv().is_ok() {
        log::debug!("Loaded .env from working directory");
    }

    match dotenv::from_path(&path) {
        Ok(_) => log::debug!("Loaded {}", path.display()),
        Err(dotenv::Error::Io(_)) => log::debug!("No .env at {}", path.display()),
        Err(e) => return Err(ConfigError::Environment(e.to_string())),
    }

    Ok(())
}

/// `<data_local_dir>/lineupcli`, falling back to the working directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifySettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub api_url: String,
    pub token_url: String,
    pub access_token: Option<String>,
}

/// Thresholds of the representative-track heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSettings {
    pub market: String,
    pub top_tracks: usize,
    pub recent_tracks: usize,
    pub recent_page_size: u32,
    pub album_page_size: u32,
    pub album_min_tracks: usize,
    pub album_max_tracks: usize,
    pub fallback_albums: usize,
    pub exclusion_keywords: Vec<String>,
    pub top_retry: RetryPolicy,
    pub recent_retry: RetryPolicy,
    pub album_retry: RetryPolicy,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            market: DEFAULT_MARKET.to_string(),
            top_tracks: 5,
            recent_tracks: 5,
            recent_page_size: 20,
            album_page_size: 10,
            album_min_tracks: 3,
            album_max_tracks: 10,
            fallback_albums: 3,
            exclusion_keywords: default_exclusion_keywords(),
            top_retry: RetryPolicy::new(3, Duration::from_millis(500)),
            recent_retry: RetryPolicy::new(2, Duration::from_millis(300)),
            album_retry: RetryPolicy::new(2, Duration::from_millis(300)),
        }
    }
}

pub fn default_exclusion_keywords() -> Vec<String> {
    [
        "remix",
        "edit",
        "rework",
        "version",
        "remastered",
        "compilation",
        "live",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub spotify: SpotifySettings,
    pub selection: SelectionSettings,
    pub artist_search_limit: u32,
    pub pool_size: usize,
    pub default_playlist_name: String,
    pub batch_visibility: Visibility,
    pub tracklist_visibility: Visibility,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub brightdata_api_key: Option<String>,
    pub brightdata_zone: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = SelectionSettings::default();

        let selection = SelectionSettings {
            market: get("SPOTIFY_MARKET").unwrap_or(defaults.market),
            album_min_tracks: parse_or(&get, "ALBUM_MIN_TRACKS", defaults.album_min_tracks)?,
            top_retry: retry_policy(&get, "TOP_TRACKS", defaults.top_retry)?,
            recent_retry: retry_policy(&get, "RELEASES", defaults.recent_retry)?,
            album_retry: retry_policy(&get, "ALBUM", defaults.album_retry)?,
            ..defaults
        };

        let pool_size = parse_or(&get, "WORKER_POOL_SIZE", DEFAULT_POOL_SIZE)?;
        if pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                var: "WORKER_POOL_SIZE".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(Settings {
            spotify: SpotifySettings {
                client_id: get("SPOTIFY_API_AUTH_CLIENT_ID"),
                client_secret: get("SPOTIFY_API_AUTH_CLIENT_SECRET"),
                redirect_uri: get("SPOTIFY_API_REDIRECT_URI")
                    .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
                api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                token_url: get("SPOTIFY_API_TOKEN_URL")
                    .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
                access_token: get("SPOTIFY_ACCESS_TOKEN"),
            },
            selection,
            artist_search_limit: parse_or(&get, "ARTIST_SEARCH_LIMIT", 10)?,
            pool_size,
            default_playlist_name: get("DEFAULT_PLAYLIST_NAME")
                .unwrap_or_else(|| DEFAULT_PLAYLIST_NAME.to_string()),
            batch_visibility: Visibility::from_public(parse_bool_or(
                &get,
                "PLAYLIST_PUBLIC",
                false,
            )?),
            tracklist_visibility: Visibility::from_public(parse_bool_or(
                &get,
                "TRACKLIST_PLAYLIST_PUBLIC",
                true,
            )?),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            brightdata_api_key: get("BRIGHT_DATA_API_KEY"),
            brightdata_zone: get("BRIGHTDATA_ZONE"),
        })
    }

    pub fn openai_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

fn parse_bool_or<G>(get: &G, key: &str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                var: key.to_string(),
                value: raw,
            }),
        },
        None => Ok(default),
    }
}

fn retry_policy<G>(get: &G, prefix: &str, default: RetryPolicy) -> Result<RetryPolicy, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let attempts = parse_or(get, &format!("{prefix}_ATTEMPTS"), default.max_attempts)?;
    let backoff_ms = parse_or(
        get,
        &format!("{prefix}_BACKOFF_MS"),
        default.backoff_base.as_millis() as u64,
    )?;
    Ok(RetryPolicy::new(attempts, Duration::from_millis(backoff_ms)))
}
