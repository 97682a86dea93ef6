use crate::{
    error::CatalogError,
    spotify::SpotifyClient,
    types::{AlbumKind, AlbumObject, AlbumRef, Paging, TrackObject, TrackRef},
};

/// Page size used when listing an album's tracks. Covers regular albums in
/// one request; the selector never needs more than the first page.
const ALBUM_TRACKS_LIMIT: u32 = 50;

/// Retrieves albums/releases for an artist, filtered by release kinds.
///
/// # Release Kinds
///
/// - `album` - Full-length studio albums
/// - `single` - Singles and EPs
///
/// # API Endpoint
///
/// `GET /artists/{id}/albums?include_groups={kinds}&limit={limit}`
pub async fn list_albums(
    client: &SpotifyClient,
    artist_id: &str,
    kinds: &[AlbumKind],
    limit: u32,
) -> Result<Vec<AlbumRef>, CatalogError> {
    let include_groups = kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(",");
    let limit = limit.to_string();

    let res: Paging<AlbumObject> = client
        .get_json(
            &format!("/artists/{id}/albums", id = artist_id),
            &[
                ("include_groups", include_groups.as_str()),
                ("limit", limit.as_str()),
            ],
        )
        .await?;

    Ok(res
        .items
        .into_iter()
        .flatten()
        .map(|album| AlbumRef::new(album.id, album.name))
        .collect())
}

/// Retrieves the track listing of one album.
///
/// # API Endpoint
///
/// `GET /albums/{id}/tracks?limit=50`
pub async fn album_tracks(
    client: &SpotifyClient,
    album_id: &str,
) -> Result<Vec<TrackRef>, CatalogError> {
    let limit = ALBUM_TRACKS_LIMIT.to_string();
    let res: Paging<TrackObject> = client
        .get_json(
            &format!("/albums/{id}/tracks", id = album_id),
            &[("limit", limit.as_str())],
        )
        .await?;

    Ok(res
        .items
        .into_iter()
        .flatten()
        .filter_map(|t| t.id.and_then(TrackRef::new))
        .collect())
}
