use crate::{
    error::CatalogError,
    spotify::SpotifyClient,
    types::{ArtistCandidate, ArtistSearchResponse, TopTracksResponse, TrackRef},
};

/// Searches artists by free text.
///
/// Candidates are returned in the order the catalog ranks them, which is the
/// order the resolver uses to break popularity ties.
///
/// # API Endpoint
///
/// `GET /search?q={query}&type=artist&limit={limit}`
pub async fn search_artists(
    client: &SpotifyClient,
    query: &str,
    limit: u32,
) -> Result<Vec<ArtistCandidate>, CatalogError> {
    let limit = limit.to_string();
    let res: ArtistSearchResponse = client
        .get_json(
            "/search",
            &[("q", query), ("type", "artist"), ("limit", limit.as_str())],
        )
        .await?;

    Ok(res
        .artists
        .items
        .into_iter()
        .flatten()
        .map(|a| ArtistCandidate {
            id: a.id,
            name: a.name,
            popularity: a.popularity.unwrap_or(0),
        })
        .collect())
}

/// Retrieves the artist's top tracks for a market.
///
/// Tracks without an identifier are dropped.
///
/// # API Endpoint
///
/// `GET /artists/{id}/top-tracks?market={market}`
pub async fn top_tracks(
    client: &SpotifyClient,
    artist_id: &str,
    market: &str,
) -> Result<Vec<TrackRef>, CatalogError> {
    let res: TopTracksResponse = client
        .get_json(
            &format!("/artists/{id}/top-tracks", id = artist_id),
            &[("market", market)],
        )
        .await?;

    Ok(res
        .tracks
        .into_iter()
        .filter_map(|t| t.id.and_then(TrackRef::new))
        .collect())
}
