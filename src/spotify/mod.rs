//! # Spotify Integration Module
//!
//! The catalog layer between the playlist builder and the Spotify Web API.
//!
//! ```text
//! CLI (artists, lineup, tracklist, search)
//!          ↓
//! Builder (resolver, selector, merger, batch)
//!          ↓
//! CatalogClient trait  ←  SpotifyClient (reqwest) / test doubles
//!          ↓
//! Spotify Web API
//! ```
//!
//! Everything above this module talks to [`CatalogClient`] only, so the
//! builder can be exercised against an in-memory catalog. [`SpotifyClient`]
//! is the production implementation; its calls are split by API area:
//!
//! - [`artists`] - artist search and top tracks
//! - [`releases`] - artist albums/singles and album track listings
//! - [`tracks`] - track search
//! - [`playlist`] - current user, playlist listing, creation and additions
//!
//! ## Error Handling
//!
//! - **502 Bad Gateway**: waits 10 seconds and retries, up to 3 times
//! - **429 Too Many Requests**: honors `Retry-After` once per call when it is
//!   at most 120 seconds, otherwise returns [`CatalogError::RateLimited`]
//! - **401 Unauthorized**: returned as [`CatalogError::Unauthorized`]
//!
//! Empty search results are `Ok(vec![])`, never errors.
//!
//! ## Authentication
//!
//! Requests carry the bearer token from [`TokenManager`], which refreshes it
//! shortly before it expires. Obtaining the first token is the job of the
//! external OAuth helper.

pub mod artists;
pub mod playlist;
pub mod releases;
pub mod tracks;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tokio::{sync::Mutex, time::sleep};

use crate::{
    error::CatalogError,
    management::TokenManager,
    types::{AlbumKind, AlbumRef, ArtistCandidate, Playlist, TrackHit, TrackRef, Visibility},
};

/// Maximum number of tracks accepted by one "add items to playlist" call.
pub const MAX_TRACKS_PER_ADD: usize = 100;

const MAX_BAD_GATEWAY_RETRIES: u32 = 3;
const MAX_RETRY_AFTER_SECS: u64 = 120;

pub(crate) const NO_QUERY: [(&str, &str); 0] = [];

/// The music catalog as seen by the playlist builder.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Identifier of the user owning the access token.
    async fn current_user_id(&self) -> Result<String, CatalogError>;

    async fn search_artists(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<ArtistCandidate>, CatalogError>;

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<TrackHit>, CatalogError>;

    async fn top_tracks(&self, artist_id: &str, market: &str)
    -> Result<Vec<TrackRef>, CatalogError>;

    /// Albums of the artist, in catalog order, without their tracks.
    async fn list_albums(
        &self,
        artist_id: &str,
        kinds: &[AlbumKind],
        limit: u32,
    ) -> Result<Vec<AlbumRef>, CatalogError>;

    async fn album_tracks(&self, album_id: &str) -> Result<Vec<TrackRef>, CatalogError>;

    /// One page of the user's playlists. `None` marks items the service
    /// returned as null; they still count towards the page size.
    async fn list_user_playlists(
        &self,
        user_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Option<Playlist>>, CatalogError>;

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        visibility: Visibility,
    ) -> Result<Playlist, CatalogError>;

    /// One page of playlist items. `None` marks items without a track id
    /// (local files, removed tracks); they still count towards the page size.
    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Option<TrackRef>>, CatalogError>;

    /// Appends at most [`MAX_TRACKS_PER_ADD`] tracks.
    async fn add_tracks(&self, playlist_id: &str, tracks: &[TrackRef]) -> Result<(), CatalogError>;
}

/// [`CatalogClient`] backed by the Spotify Web API.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(api_url: impl Into<String>, tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    pub(crate) async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path);
        let response = self.send(|http| http.get(&url).query(query)).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }

    pub(crate) async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let response = self.send(|http| http.post(&url).json(body)).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }

    async fn send<F>(&self, build: F) -> Result<Response, CatalogError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut bad_gateway_retries = 0;
        let mut throttled = false;

        loop {
            let token = {
                let mut tokens = self.tokens.lock().await;
                tokens.get_valid_token().await
            };

            let response = build(&self.http).bearer_auth(token).send().await?;
            let status = response.status();

            if status == StatusCode::BAD_GATEWAY && bad_gateway_retries < MAX_BAD_GATEWAY_RETRIES {
                bad_gateway_retries += 1;
                log::debug!("Bad gateway, retry {} in 10s", bad_gateway_retries);
                sleep(Duration::from_secs(10)).await;
                continue;
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                if !throttled && retry_after <= MAX_RETRY_AFTER_SECS {
                    throttled = true;
                    log::info!("Rate limited, waiting {} seconds", retry_after);
                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
                return Err(CatalogError::RateLimited { retry_after });
            }

            if status == StatusCode::UNAUTHORIZED {
                let body = response.text().await.unwrap_or_default();
                return Err(CatalogError::Unauthorized(body));
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(CatalogError::Status {
                    status: status.as_u16(),
                    message: body,
                });
            }

            return Ok(response);
        }
    }
}

#[async_trait]
impl CatalogClient for SpotifyClient {
    async fn current_user_id(&self) -> Result<String, CatalogError> {
        playlist::current_user_id(self).await
    }

    async fn search_artists(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<ArtistCandidate>, CatalogError> {
        artists::search_artists(self, query, limit).await
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<TrackHit>, CatalogError> {
        tracks::search_tracks(self, query, limit).await
    }

    async fn top_tracks(
        &self,
        artist_id: &str,
        market: &str,
    ) -> Result<Vec<TrackRef>, CatalogError> {
        artists::top_tracks(self, artist_id, market).await
    }

    async fn list_albums(
        &self,
        artist_id: &str,
        kinds: &[AlbumKind],
        limit: u32,
    ) -> Result<Vec<AlbumRef>, CatalogError> {
        releases::list_albums(self, artist_id, kinds, limit).await
    }

    async fn album_tracks(&self, album_id: &str) -> Result<Vec<TrackRef>, CatalogError> {
        releases::album_tracks(self, album_id).await
    }

    async fn list_user_playlists(
        &self,
        user_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Option<Playlist>>, CatalogError> {
        playlist::list_user_playlists(self, user_id, limit, offset).await
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        visibility: Visibility,
    ) -> Result<Playlist, CatalogError> {
        playlist::create(self, user_id, name, visibility).await
    }

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Option<TrackRef>>, CatalogError> {
        playlist::playlist_tracks(self, playlist_id, limit, offset).await
    }

    async fn add_tracks(&self, playlist_id: &str, tracks: &[TrackRef]) -> Result<(), CatalogError> {
        playlist::add_tracks(self, playlist_id, tracks).await
    }
}
