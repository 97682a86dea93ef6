use std::collections::HashSet;

use crate::{
    config::SelectionSettings,
    error::CatalogError,
    retry::{error_or_empty, retry_with_backoff},
    spotify::CatalogClient,
    types::{AlbumKind, AlbumRef, TrackBundle, TrackRef},
    utils,
};

/// Picks a representative set of tracks for one artist.
///
/// Three independent sources are combined in a fixed order: top tracks,
/// tracks from recent singles and albums, then one full album. Each source
/// retries on its own and degrades to an empty list on failure, so a broken
/// source never hides the others.
pub struct TrackSelector<'a> {
    client: &'a dyn CatalogClient,
    settings: &'a SelectionSettings,
}

impl<'a> TrackSelector<'a> {
    pub fn new(client: &'a dyn CatalogClient, settings: &'a SelectionSettings) -> Self {
        Self { client, settings }
    }

    pub async fn select(&self, artist_id: &str) -> TrackBundle {
        let top = self.top_tracks(artist_id).await;
        let recent = self.recent_releases(artist_id).await;
        let album = self.album_tracks(artist_id).await;

        log::debug!(
            "Artist {}: {} top, {} recent, {} album tracks",
            artist_id,
            top.len(),
            recent.len(),
            album.len()
        );

        TrackBundle::from_sources([top, recent, album])
    }

    /// At most `top_tracks` of the artist's most played tracks.
    pub async fn top_tracks(&self, artist_id: &str) -> Vec<TrackRef> {
        let market = self.settings.market.as_str();
        let outcome = retry_with_backoff(
            self.settings.top_retry,
            "top tracks",
            || self.client.top_tracks(artist_id, market),
            error_or_empty,
        )
        .await;

        match outcome {
            Ok(tracks) => tracks.into_iter().take(self.settings.top_tracks).collect(),
            Err(e) => {
                log::warn!("Could not fetch top tracks for {}: {}", artist_id, e);
                Vec::new()
            }
        }
    }

    /// Tracks from recent singles and albums, at most `recent_tracks`.
    pub async fn recent_releases(&self, artist_id: &str) -> Vec<TrackRef> {
        let outcome = retry_with_backoff(
            self.settings.recent_retry,
            "recent releases",
            || self.fetch_recent(artist_id),
            error_or_empty,
        )
        .await;

        match outcome {
            Ok(tracks) => tracks,
            Err(e) => {
                log::warn!("Could not fetch recent releases for {}: {}", artist_id, e);
                Vec::new()
            }
        }
    }

    /// Tracks of one "real" album: the first whose name carries no exclusion
    /// keyword and that has at least `album_min_tracks` tracks.
    ///
    /// When no album qualifies, the first `fallback_albums` albums are tried
    /// again without the keyword filter.
    pub async fn album_tracks(&self, artist_id: &str) -> Vec<TrackRef> {
        let outcome = retry_with_backoff(
            self.settings.album_retry,
            "album tracks",
            || self.fetch_album(artist_id),
            error_or_empty,
        )
        .await;

        match outcome {
            Ok(tracks) => tracks,
            Err(e) => {
                log::warn!("Could not fetch album tracks for {}: {}", artist_id, e);
                Vec::new()
            }
        }
    }

    async fn fetch_recent(&self, artist_id: &str) -> Result<Vec<TrackRef>, CatalogError> {
        let releases = self
            .client
            .list_albums(
                artist_id,
                &[AlbumKind::Single, AlbumKind::Album],
                self.settings.recent_page_size,
            )
            .await?;

        let target = self.settings.recent_tracks;
        let mut seen = HashSet::new();
        let mut tracks = Vec::new();

        for release in releases {
            if tracks.len() >= target {
                break;
            }
            if !seen.insert(release.normalized_name.clone()) {
                continue;
            }
            match self.client.album_tracks(&release.id).await {
                Ok(release_tracks) => tracks.extend(release_tracks),
                Err(e) => log::debug!("Skipping release '{}': {}", release.name, e),
            }
        }

        tracks.truncate(target);
        Ok(tracks)
    }

    async fn fetch_album(&self, artist_id: &str) -> Result<Vec<TrackRef>, CatalogError> {
        let albums = self
            .client
            .list_albums(
                artist_id,
                &[AlbumKind::Album],
                self.settings.album_page_size,
            )
            .await?;

        let candidates = qualifying_albums(&albums, &self.settings.exclusion_keywords);
        if let Some(tracks) = self.first_full_album(candidates).await {
            return Ok(tracks);
        }

        log::debug!("No album of {} passed the filter, relaxing it", artist_id);
        let fallback = albums.iter().take(self.settings.fallback_albums);
        Ok(self.first_full_album(fallback).await.unwrap_or_default())
    }

    async fn first_full_album<'b, I>(&self, albums: I) -> Option<Vec<TrackRef>>
    where
        I: IntoIterator<Item = &'b AlbumRef>,
    {
        let min_tracks = self.settings.album_min_tracks.max(1);
        for album in albums {
            match self.client.album_tracks(&album.id).await {
                Ok(mut tracks) if tracks.len() >= min_tracks => {
                    tracks.truncate(self.settings.album_max_tracks);
                    return Some(tracks);
                }
                Ok(tracks) => log::debug!(
                    "Album '{}' has only {} tracks",
                    album.name,
                    tracks.len()
                ),
                Err(e) => log::debug!("Skipping album '{}': {}", album.name, e),
            }
        }
        None
    }
}

/// Albums with distinct normalized names and no exclusion keyword, in
/// catalog order.
pub fn qualifying_albums<'b>(albums: &'b [AlbumRef], keywords: &[String]) -> Vec<&'b AlbumRef> {
    let mut seen = HashSet::new();
    albums
        .iter()
        .filter(|album| !utils::contains_keyword(&album.normalized_name, keywords))
        .filter(|album| seen.insert(album.normalized_name.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::default_exclusion_keywords, spotify::MockCatalogClient};

    fn tracks(ids: &[&str]) -> Vec<TrackRef> {
        ids.iter().filter_map(|id| TrackRef::new(*id)).collect()
    }

    #[test]
    fn test_qualifying_albums_skips_keywords_and_duplicates() {
        let albums = vec![
            AlbumRef::new("1", "Discovery (Remastered)"),
            AlbumRef::new("2", "Homework"),
            AlbumRef::new("3", "homework "),
            AlbumRef::new("4", "Live at Wembley"),
        ];

        let ids: Vec<&str> = qualifying_albums(&albums, &default_exclusion_keywords())
            .into_iter()
            .map(|a| a.id.as_str())
            .collect();

        assert_eq!(ids, vec!["2"]);
    }

    #[test]
    fn test_keyword_matches_inside_words() {
        // "alive" contains "live", so the album is excluded
        let albums = vec![
            AlbumRef::new("1", "Alive 2007"),
            AlbumRef::new("2", "Human After All"),
        ];

        let ids: Vec<&str> = qualifying_albums(&albums, &default_exclusion_keywords())
            .into_iter()
            .map(|a| a.id.as_str())
            .collect();

        assert_eq!(ids, vec!["2"]);
    }

    #[tokio::test]
    async fn test_top_tracks_truncated_to_limit() {
        let mut mock = MockCatalogClient::new();
        mock.expect_top_tracks()
            .times(1)
            .returning(|_, _| Ok(tracks(&["a", "b", "c", "d", "e", "f", "g"])));

        let settings = SelectionSettings::default();
        let selector = TrackSelector::new(&mock, &settings);

        assert_eq!(
            selector.top_tracks("artist").await,
            tracks(&["a", "b", "c", "d", "e"])
        );
    }

    #[tokio::test]
    async fn test_top_tracks_failure_degrades_to_empty() {
        let mut mock = MockCatalogClient::new();
        mock.expect_top_tracks()
            .times(2)
            .returning(|_, _| Err(CatalogError::Http("timeout".to_string())));

        let settings = SelectionSettings {
            top_retry: crate::retry::RetryPolicy::immediate(2),
            ..SelectionSettings::default()
        };
        let selector = TrackSelector::new(&mock, &settings);

        assert!(selector.top_tracks("artist").await.is_empty());
    }
}
