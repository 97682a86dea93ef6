use std::collections::HashSet;

use crate::{
    error::CatalogError,
    spotify::{CatalogClient, MAX_TRACKS_PER_ADD},
    types::{Playlist, TrackRef, Visibility},
    utils,
};

/// Page size used when scanning the user's playlists.
pub const PLAYLIST_PAGE_SIZE: u32 = 50;
/// Page size used when reading a playlist's current tracks.
pub const MEMBERSHIP_PAGE_SIZE: u32 = 100;

/// A playlist looked up by name, and whether it had to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistTarget {
    pub playlist: Playlist,
    pub created: bool,
}

/// Finds playlists by name and appends tracks without duplicating them.
pub struct PlaylistMerger<'a> {
    client: &'a dyn CatalogClient,
}

impl<'a> PlaylistMerger<'a> {
    pub fn new(client: &'a dyn CatalogClient) -> Self {
        Self { client }
    }

    /// First playlist of the user whose trimmed name matches `name`
    /// case-insensitively.
    pub async fn find(&self, user_id: &str, name: &str) -> Result<Option<Playlist>, CatalogError> {
        let wanted = utils::normalize_name(name);
        let mut offset = 0;

        loop {
            let page = self
                .client
                .list_user_playlists(user_id, PLAYLIST_PAGE_SIZE, offset)
                .await?;
            let page_len = page.len() as u32;

            if let Some(found) = page
                .into_iter()
                .flatten()
                .find(|p| utils::normalize_name(&p.name) == wanted)
            {
                return Ok(Some(found));
            }

            if page_len < PLAYLIST_PAGE_SIZE {
                return Ok(None);
            }
            offset += page_len;
        }
    }

    /// Returns the playlist named `name`, creating it when none exists.
    ///
    /// A new playlist gets `name` exactly as given.
    pub async fn get_or_create(
        &self,
        user_id: &str,
        name: &str,
        visibility: Visibility,
    ) -> Result<PlaylistTarget, CatalogError> {
        if let Some(playlist) = self.find(user_id, name).await? {
            log::debug!("Using existing playlist '{}' ({})", playlist.name, playlist.id);
            return Ok(PlaylistTarget {
                playlist,
                created: false,
            });
        }

        let playlist = self
            .client
            .create_playlist(user_id, name, visibility)
            .await?;
        log::info!("Created {} playlist '{}'", visibility, playlist.name);
        Ok(PlaylistTarget {
            playlist,
            created: true,
        })
    }

    /// Every track identifier currently in the playlist.
    pub async fn members(&self, playlist_id: &str) -> Result<HashSet<TrackRef>, CatalogError> {
        let mut members = HashSet::new();
        let mut offset = 0;

        loop {
            let page = self
                .client
                .playlist_tracks(playlist_id, MEMBERSHIP_PAGE_SIZE, offset)
                .await?;
            let page_len = page.len() as u32;
            members.extend(page.into_iter().flatten());

            if page_len < MEMBERSHIP_PAGE_SIZE {
                return Ok(members);
            }
            offset += page_len;
        }
    }

    /// Appends the tracks not yet in the playlist, in input order and in
    /// batches of [`MAX_TRACKS_PER_ADD`]. Returns how many were added.
    ///
    /// Adding the same tracks twice adds nothing the second time.
    pub async fn add(&self, playlist_id: &str, tracks: &[TrackRef]) -> Result<usize, CatalogError> {
        if tracks.is_empty() {
            return Ok(0);
        }

        let mut present = self.members(playlist_id).await?;
        let fresh: Vec<TrackRef> = tracks
            .iter()
            .filter(|track| present.insert((*track).clone()))
            .cloned()
            .collect();

        let mut added = 0;
        for batch in fresh.chunks(MAX_TRACKS_PER_ADD) {
            self.client.add_tracks(playlist_id, batch).await?;
            added += batch.len();
        }

        if added < tracks.len() {
            log::debug!(
                "Skipped {} tracks already in playlist {}",
                tracks.len() - added,
                playlist_id
            );
        }
        Ok(added)
    }
}
