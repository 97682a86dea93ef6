use crate::{
    builder::{PlaylistMerger, tracklist::match_entries},
    cli::common,
    config::Settings,
    error, info,
    sources::{HttpFetcher, PageFetcher, parse_tracklist},
    success, warning,
};

/// `tracklist <URL>`: imports a DJ set tracklist page into a playlist.
pub async fn tracklist(settings: &Settings, url: &str, playlist: Option<String>) {
    let fetcher = HttpFetcher::from_settings(settings);
    let pb = if fetcher.is_rendered() {
        common::spinner(format!("Fetching rendered page {}...", url))
    } else {
        common::spinner(format!("Fetching {}...", url))
    };
    let html = fetcher.fetch(url).await;
    pb.finish_and_clear();

    let html = match html {
        Ok(h) => h,
        Err(e) => error!("Cannot fetch tracklist page. Err: {}", e),
    };

    let entries = match parse_tracklist(&html) {
        Ok(e) => e,
        Err(e) => error!("Cannot parse tracklist page. Err: {}", e),
    };
    if entries.is_empty() {
        warning!("No tracks found on the page.");
        return;
    }
    success!("Extracted {} tracks", entries.len());

    let client = common::connect(settings).await;
    let pb = common::progress_bar();
    let matches = match_entries(client.as_ref(), &entries, &pb).await;
    pb.finish_and_clear();

    for entry in &matches.missing {
        warning!("Not found: {}", entry);
    }
    if matches.found.is_empty() {
        warning!("None of the tracks were found on Spotify.");
        return;
    }
    success!("Found {} of {} tracks", matches.found.len(), entries.len());

    let name = playlist.unwrap_or_else(|| settings.default_playlist_name.clone());
    let target =
        common::target_playlist(client.as_ref(), &name, settings.tracklist_visibility).await;

    match PlaylistMerger::new(client.as_ref())
        .add(&target.id, &matches.found)
        .await
    {
        Ok(0) => info!("No new tracks to add, all are already in the playlist."),
        Ok(added) => success!("Added {} new tracks to playlist.", added),
        Err(e) => error!("Cannot add tracks to playlist. Err: {}", e),
    }

    info!("Playlist URL: {}", target.url);
}
