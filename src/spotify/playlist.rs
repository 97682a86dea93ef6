use crate::{
    error::CatalogError,
    spotify::{MAX_TRACKS_PER_ADD, NO_QUERY, SpotifyClient},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CurrentUserResponse, Paging, Playlist, PlaylistObject, PlaylistTrackItem, TrackRef,
        Visibility,
    },
};

/// `GET /me`
pub async fn current_user_id(client: &SpotifyClient) -> Result<String, CatalogError> {
    let res: CurrentUserResponse = client.get_json("/me", &NO_QUERY).await?;
    Ok(res.id)
}

/// One page of the user's playlists.
///
/// # API Endpoint
///
/// `GET /users/{user_id}/playlists?limit={limit}&offset={offset}`
pub async fn list_user_playlists(
    client: &SpotifyClient,
    user_id: &str,
    limit: u32,
    offset: u32,
) -> Result<Vec<Option<Playlist>>, CatalogError> {
    let limit = limit.to_string();
    let offset = offset.to_string();
    let res: Paging<PlaylistObject> = client
        .get_json(
            &format!("/users/{user_id}/playlists"),
            &[("limit", limit.as_str()), ("offset", offset.as_str())],
        )
        .await?;

    Ok(res
        .items
        .into_iter()
        .map(|item| item.map(Playlist::from))
        .collect())
}

/// Creates a playlist owned by `user_id` with exactly the given name.
///
/// # API Endpoint
///
/// `POST /users/{user_id}/playlists`
pub async fn create(
    client: &SpotifyClient,
    user_id: &str,
    name: &str,
    visibility: Visibility,
) -> Result<Playlist, CatalogError> {
    let body = CreatePlaylistRequest {
        name: name.to_string(),
        description: format!("Created by {}", env!("CARGO_PKG_NAME")),
        public: visibility.is_public(),
        collaborative: false,
    };

    let res: PlaylistObject = client
        .post_json(&format!("/users/{user_id}/playlists"), &body)
        .await?;
    Ok(Playlist::from(res))
}

/// One page of playlist items, reduced to track identifiers.
///
/// # API Endpoint
///
/// `GET /playlists/{id}/tracks?fields=items(track(id))&limit={limit}&offset={offset}`
pub async fn playlist_tracks(
    client: &SpotifyClient,
    playlist_id: &str,
    limit: u32,
    offset: u32,
) -> Result<Vec<Option<TrackRef>>, CatalogError> {
    let limit = limit.to_string();
    let offset = offset.to_string();
    let res: Paging<PlaylistTrackItem> = client
        .get_json(
            &format!("/playlists/{playlist_id}/tracks"),
            &[
                ("fields", "items(track(id))"),
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
            ],
        )
        .await?;

    Ok(res
        .items
        .into_iter()
        .map(|item| {
            item.and_then(|i| i.track)
                .and_then(|t| t.id)
                .and_then(TrackRef::new)
        })
        .collect())
}

/// Appends tracks to a playlist.
///
/// # API Endpoint
///
/// `POST /playlists/{id}/tracks`
pub async fn add_tracks(
    client: &SpotifyClient,
    playlist_id: &str,
    tracks: &[TrackRef],
) -> Result<(), CatalogError> {
    if tracks.len() > MAX_TRACKS_PER_ADD {
        return Err(CatalogError::InvalidRequest(format!(
            "cannot add {} tracks in one request (max {})",
            tracks.len(),
            MAX_TRACKS_PER_ADD
        )));
    }
    if tracks.is_empty() {
        return Ok(());
    }

    let body = AddTrackToPlaylistRequest {
        uris: tracks.iter().map(TrackRef::uri).collect(),
    };
    let res: AddTrackToPlaylistResponse = client
        .post_json(&format!("/playlists/{playlist_id}/tracks"), &body)
        .await?;
    log::debug!("Playlist {} now at snapshot {}", playlist_id, res.snapshot_id);
    Ok(())
}
