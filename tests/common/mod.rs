#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use lineupcli::{
    config::SelectionSettings,
    error::CatalogError,
    retry::RetryPolicy,
    spotify::{CatalogClient, MAX_TRACKS_PER_ADD},
    types::{AlbumKind, AlbumRef, ArtistCandidate, Playlist, TrackHit, TrackRef, Visibility},
};

pub fn tracks(ids: &[&str]) -> Vec<TrackRef> {
    ids.iter().filter_map(|id| TrackRef::new(*id)).collect()
}

pub fn numbered_tracks(prefix: &str, count: usize) -> Vec<TrackRef> {
    (0..count)
        .filter_map(|i| TrackRef::new(format!("{prefix}{i}")))
        .collect()
}

/// Selection settings that never sleep between attempts.
pub fn fast_selection() -> SelectionSettings {
    SelectionSettings {
        top_retry: RetryPolicy::immediate(3),
        recent_retry: RetryPolicy::immediate(2),
        album_retry: RetryPolicy::immediate(2),
        ..SelectionSettings::default()
    }
}

struct FakeAlbum {
    kind: AlbumKind,
    album: AlbumRef,
    tracks: Vec<TrackRef>,
}

#[derive(Default)]
struct State {
    artists: HashMap<String, Vec<ArtistCandidate>>,
    failing_searches: HashSet<String>,
    top_tracks: HashMap<String, Vec<TrackRef>>,
    top_failures: HashMap<String, u32>,
    albums: HashMap<String, Vec<FakeAlbum>>,
    track_hits: HashMap<String, TrackRef>,
    playlists: Vec<(Playlist, Vec<TrackRef>)>,
    null_playlist_slots: HashSet<usize>,
    add_calls: Vec<usize>,
    calls: HashMap<&'static str, u32>,
}

/// In-memory catalog with the behavior of the real service.
#[derive(Default)]
pub struct FakeCatalog {
    state: Mutex<State>,
    delay: Option<Duration>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `delay`, so concurrent runs actually overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_artist(self, query: &str, id: &str, popularity: u8) -> Self {
        self.state
            .lock()
            .unwrap()
            .artists
            .entry(query.to_lowercase())
            .or_default()
            .push(ArtistCandidate {
                id: id.to_string(),
                name: query.to_string(),
                popularity,
            });
        self
    }

    pub fn with_failing_search(self, query: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_searches
            .insert(query.to_lowercase());
        self
    }

    pub fn with_top_tracks(self, artist_id: &str, ids: &[&str]) -> Self {
        self.state
            .lock()
            .unwrap()
            .top_tracks
            .insert(artist_id.to_string(), tracks(ids));
        self
    }

    /// The first `failures` top-track calls for the artist fail.
    pub fn with_flaky_top_tracks(self, artist_id: &str, failures: u32) -> Self {
        self.state
            .lock()
            .unwrap()
            .top_failures
            .insert(artist_id.to_string(), failures);
        self
    }

    pub fn with_album(
        self,
        artist_id: &str,
        kind: AlbumKind,
        album_id: &str,
        name: &str,
        track_ids: Vec<TrackRef>,
    ) -> Self {
        let album = FakeAlbum {
            kind,
            album: AlbumRef::new(album_id, name),
            tracks: track_ids,
        };
        self.state
            .lock()
            .unwrap()
            .albums
            .entry(artist_id.to_string())
            .or_default()
            .push(album);
        self
    }

    pub fn with_track_hit(self, query: &str, id: &str) -> Self {
        if let Some(track) = TrackRef::new(id) {
            self.state
                .lock()
                .unwrap()
                .track_hits
                .insert(query.to_string(), track);
        }
        self
    }

    pub fn with_playlist(self, id: &str, name: &str, existing: Vec<TrackRef>) -> Self {
        self.state.lock().unwrap().playlists.push((playlist(id, name), existing));
        self
    }

    /// Inserts a null item at `slot` of the playlist listing.
    pub fn with_null_playlist_slot(self, slot: usize) -> Self {
        self.state.lock().unwrap().null_playlist_slots.insert(slot);
        self
    }

    pub fn playlist_names(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .map(|(p, _)| p.name.clone())
            .collect()
    }

    pub fn playlist_contents(&self, playlist_id: &str) -> Vec<TrackRef> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .find(|(p, _)| p.id == playlist_id)
            .map(|(_, t)| t.clone())
            .unwrap_or_default()
    }

    pub fn playlist_count(&self) -> usize {
        self.state.lock().unwrap().playlists.len()
    }

    pub fn add_calls(&self) -> Vec<usize> {
        self.state.lock().unwrap().add_calls.clone()
    }

    pub fn calls(&self, method: &str) -> u32 {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(method)
            .copied()
            .unwrap_or(0)
    }

    async fn record(&self, method: &'static str) {
        *self.state.lock().unwrap().calls.entry(method).or_default() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

pub fn playlist(id: &str, name: &str) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: name.to_string(),
        url: format!("https://open.spotify.com/playlist/{id}"),
    }
}

fn page<T: Clone>(items: &[T], limit: u32, offset: u32) -> Vec<T> {
    items
        .iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn current_user_id(&self) -> Result<String, CatalogError> {
        self.record("current_user_id").await;
        Ok("fake-user".to_string())
    }

    async fn search_artists(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<ArtistCandidate>, CatalogError> {
        self.record("search_artists").await;
        let state = self.state.lock().unwrap();
        let key = query.to_lowercase();
        if state.failing_searches.contains(&key) {
            return Err(CatalogError::Http("connection reset".to_string()));
        }
        Ok(state
            .artists
            .get(&key)
            .map(|c| page(c, limit, 0))
            .unwrap_or_default())
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<TrackHit>, CatalogError> {
        self.record("search_tracks").await;
        let state = self.state.lock().unwrap();
        Ok(state
            .track_hits
            .get(query)
            .map(|track| TrackHit {
                track: track.clone(),
                name: query.to_string(),
                artists: Vec::new(),
                popularity: 0,
            })
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn top_tracks(
        &self,
        artist_id: &str,
        _market: &str,
    ) -> Result<Vec<TrackRef>, CatalogError> {
        self.record("top_tracks").await;
        let mut state = self.state.lock().unwrap();
        if let Some(remaining) = state.top_failures.get_mut(artist_id) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(CatalogError::Status {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
        }
        Ok(state.top_tracks.get(artist_id).cloned().unwrap_or_default())
    }

    async fn list_albums(
        &self,
        artist_id: &str,
        kinds: &[AlbumKind],
        limit: u32,
    ) -> Result<Vec<AlbumRef>, CatalogError> {
        self.record("list_albums").await;
        let state = self.state.lock().unwrap();
        Ok(state
            .albums
            .get(artist_id)
            .map(|albums| {
                albums
                    .iter()
                    .filter(|a| kinds.contains(&a.kind))
                    .take(limit as usize)
                    .map(|a| a.album.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn album_tracks(&self, album_id: &str) -> Result<Vec<TrackRef>, CatalogError> {
        self.record("album_tracks").await;
        let state = self.state.lock().unwrap();
        state
            .albums
            .values()
            .flatten()
            .find(|a| a.album.id == album_id)
            .map(|a| a.tracks.clone())
            .ok_or_else(|| CatalogError::Status {
                status: 404,
                message: format!("no album {album_id}"),
            })
    }

    async fn list_user_playlists(
        &self,
        _user_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Option<Playlist>>, CatalogError> {
        self.record("list_user_playlists").await;
        let state = self.state.lock().unwrap();
        let mut all: Vec<Option<Playlist>> =
            state.playlists.iter().map(|(p, _)| Some(p.clone())).collect();
        let mut slots: Vec<usize> = state.null_playlist_slots.iter().copied().collect();
        slots.sort_unstable();
        for slot in slots {
            all.insert(slot.min(all.len()), None);
        }
        Ok(page(&all, limit, offset))
    }

    async fn create_playlist(
        &self,
        _user_id: &str,
        name: &str,
        _visibility: Visibility,
    ) -> Result<Playlist, CatalogError> {
        self.record("create_playlist").await;
        let mut state = self.state.lock().unwrap();
        let created = playlist(&format!("created{}", state.playlists.len()), name);
        state.playlists.push((created.clone(), Vec::new()));
        Ok(created)
    }

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Option<TrackRef>>, CatalogError> {
        self.record("playlist_tracks").await;
        let state = self.state.lock().unwrap();
        let (_, contents) = state
            .playlists
            .iter()
            .find(|(p, _)| p.id == playlist_id)
            .ok_or_else(|| CatalogError::Status {
                status: 404,
                message: format!("no playlist {playlist_id}"),
            })?;
        let items: Vec<Option<TrackRef>> = contents.iter().cloned().map(Some).collect();
        Ok(page(&items, limit, offset))
    }

    async fn add_tracks(&self, playlist_id: &str, tracks: &[TrackRef]) -> Result<(), CatalogError> {
        self.record("add_tracks").await;
        if tracks.len() > MAX_TRACKS_PER_ADD {
            return Err(CatalogError::InvalidRequest(format!(
                "{} tracks in one request",
                tracks.len()
            )));
        }

        let mut state = self.state.lock().unwrap();
        state.add_calls.push(tracks.len());
        let (_, contents) = state
            .playlists
            .iter_mut()
            .find(|(p, _)| p.id == playlist_id)
            .ok_or_else(|| CatalogError::Status {
                status: 404,
                message: format!("no playlist {playlist_id}"),
            })?;
        contents.extend(tracks.iter().cloned());
        Ok(())
    }
}
