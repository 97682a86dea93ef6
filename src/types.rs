use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Catalog identifier of a single track. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackRef(String);

impl TrackRef {
    /// Returns `None` for blank identifiers so they are dropped at the source.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    pub fn uri(&self) -> String {
        format!("spotify:track:{}", self.0)
    }
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistCandidate {
    pub id: String,
    pub name: String,
    pub popularity: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRef {
    pub id: String,
    pub name: String,
    /// Trimmed, lowercased name used for deduplication and keyword filtering.
    pub normalized_name: String,
}

impl AlbumRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            normalized_name: crate::utils::normalize_name(&name),
            name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlbumKind {
    Album,
    Single,
}

impl AlbumKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlbumKind::Album => "album",
            AlbumKind::Single => "single",
        }
    }
}

impl fmt::Display for AlbumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A track search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackHit {
    pub track: TrackRef,
    pub name: String,
    pub artists: Vec<String>,
    pub popularity: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn from_public(public: bool) -> Self {
        if public {
            Visibility::Public
        } else {
            Visibility::Private
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => f.write_str("public"),
            Visibility::Private => f.write_str("private"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// Ordered, identifier-deduplicated tracks selected for one artist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackBundle {
    tracks: Vec<TrackRef>,
}

impl TrackBundle {
    /// Concatenates the sources in the given order, keeping the first
    /// occurrence of every identifier.
    pub fn from_sources<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Vec<TrackRef>>,
    {
        let tracks = crate::utils::dedupe_preserving_order(sources.into_iter().flatten());
        Self { tracks }
    }

    pub fn tracks(&self) -> &[TrackRef] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn into_tracks(self) -> Vec<TrackRef> {
        self.tracks
    }
}

/// Terminal state of one artist's pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtistStatus {
    Added,
    AlreadyPresent,
    NotFound,
    NoTracks,
    Failed(String),
}

impl fmt::Display for ArtistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtistStatus::Added => f.write_str("added"),
            ArtistStatus::AlreadyPresent => f.write_str("already in playlist"),
            ArtistStatus::NotFound => f.write_str("not found"),
            ArtistStatus::NoTracks => f.write_str("no tracks found"),
            ArtistStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistResult {
    pub name: String,
    pub status: ArtistStatus,
    pub tracks_added: usize,
}

impl ArtistResult {
    pub fn new(name: impl Into<String>, status: ArtistStatus, tracks_added: usize) -> Self {
        Self {
            name: name.into(),
            status,
            tracks_added,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self.status, ArtistStatus::Added | ArtistStatus::AlreadyPresent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracklistEntry {
    pub artist: String,
    pub title: String,
}

impl fmt::Display for TracklistEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

#[derive(Tabled)]
pub struct ArtistResultTableRow {
    pub artist: String,
    pub status: String,
    pub tracks: usize,
}

#[derive(Tabled)]
pub struct CandidateTableRow {
    pub chosen: String,
    pub name: String,
    pub popularity: u8,
    pub id: String,
}

#[derive(Tabled)]
pub struct SettingTableRow {
    pub setting: String,
    pub value: String,
}

// Wire types of the Spotify Web API.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistSearchResponse {
    pub artists: Paging<ArtistObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSearchResponse {
    pub tracks: Paging<TrackObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<Option<T>>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub popularity: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackObject {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    #[serde(default)]
    pub popularity: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTracksResponse {
    #[serde(default)]
    pub tracks: Vec<TrackObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub album_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistObject {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrackItem {
    pub track: Option<PlaylistTrackId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrackId {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

impl From<PlaylistObject> for Playlist {
    fn from(p: PlaylistObject) -> Self {
        let url = p
            .external_urls
            .spotify
            .unwrap_or_else(|| format!("https://open.spotify.com/playlist/{}", p.id));
        Playlist {
            id: p.id,
            name: p.name,
            url,
        }
    }
}
