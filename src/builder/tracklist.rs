use indicatif::ProgressBar;

use crate::{
    sources::tracklist::clean_title,
    spotify::CatalogClient,
    types::{TrackHit, TrackRef, TracklistEntry},
    utils,
};

/// Number of search hits the chooser picks from.
pub const TRACK_SEARCH_LIMIT: u32 = 5;

/// Track lookups for a scraped tracklist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracklistMatches {
    /// Matched tracks in tracklist order, without duplicates.
    pub found: Vec<TrackRef>,
    pub missing: Vec<TracklistEntry>,
}

/// Searches the catalog for every entry and keeps the best hit.
///
/// Titles are cleaned of label and remix notes before searching. A failed
/// search counts as a miss; the import continues with the rest.
pub async fn match_entries(
    client: &dyn CatalogClient,
    entries: &[TracklistEntry],
    progress: &ProgressBar,
) -> TracklistMatches {
    progress.set_length(entries.len() as u64);

    let mut found = Vec::new();
    let mut missing = Vec::new();

    for entry in entries {
        progress.set_message(entry.to_string());
        let title = clean_title(&entry.title);
        let query = format!("{} - {}", entry.artist, title);

        match client.search_tracks(&query, TRACK_SEARCH_LIMIT).await {
            Ok(hits) => match choose_track(&entry.artist, &title, hits) {
                Some(hit) => {
                    log::debug!("'{}' matched {} ({})", entry, hit.name, hit.track);
                    found.push(hit.track);
                }
                None => missing.push(entry.clone()),
            },
            Err(e) => {
                log::warn!("Search for '{}' failed: {}", query, e);
                missing.push(entry.clone());
            }
        }
        progress.inc(1);
    }

    TracklistMatches {
        found: utils::dedupe_preserving_order(found),
        missing,
    }
}

/// Picks the hit that best matches the listed artist and cleaned title.
///
/// A matching artist outweighs a matching title; popularity breaks ties and
/// the earlier hit wins when everything is equal.
pub fn choose_track(artist: &str, title: &str, hits: Vec<TrackHit>) -> Option<TrackHit> {
    let artist = utils::normalize_name(artist);
    let title = utils::normalize_name(title);

    let mut best: Option<((u8, u8), TrackHit)> = None;
    for hit in hits {
        let artist_match = hit.artists.iter().any(|name| {
            let name = utils::normalize_name(name);
            !name.is_empty() && (artist.contains(&name) || name.contains(&artist))
        });
        let title_match = utils::normalize_name(&hit.name).starts_with(&title);
        let score = (
            2 * u8::from(artist_match) + u8::from(title_match),
            hit.popularity,
        );

        if best.as_ref().is_none_or(|(top, _)| score > *top) {
            best = Some((score, hit));
        }
    }
    best.map(|(_, hit)| hit)
}
