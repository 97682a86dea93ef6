use crate::{
    error::CatalogError,
    spotify::SpotifyClient,
    types::{TrackHit, TrackRef, TrackSearchResponse},
};

/// Searches tracks by free text such as `"Artist - Title"`.
///
/// # API Endpoint
///
/// `GET /search?q={query}&type=track&limit={limit}`
pub async fn search_tracks(
    client: &SpotifyClient,
    query: &str,
    limit: u32,
) -> Result<Vec<TrackHit>, CatalogError> {
    let limit = limit.to_string();
    let res: TrackSearchResponse = client
        .get_json(
            "/search",
            &[("q", query), ("type", "track"), ("limit", limit.as_str())],
        )
        .await?;

    Ok(res
        .tracks
        .items
        .into_iter()
        .flatten()
        .filter_map(|t| {
            let track = t.id.and_then(TrackRef::new)?;
            Some(TrackHit {
                track,
                name: t.name,
                artists: t.artists.into_iter().map(|a| a.name).collect(),
                popularity: t.popularity.unwrap_or(0),
            })
        })
        .collect())
}
