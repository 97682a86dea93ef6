use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    builder::{BatchOrchestrator, BatchSummary, PlaylistMerger, batch::FAILED_PREVIEW_LIMIT},
    config::Settings,
    error, info,
    management::TokenManager,
    spotify::{CatalogClient, SpotifyClient},
    success,
    types::{ArtistResultTableRow, Playlist, Visibility},
    warning,
};

/// Builds the catalog client from the stored token. Exits on failure.
pub(crate) async fn connect(settings: &Settings) -> Arc<dyn CatalogClient> {
    let tokens = match TokenManager::load(&settings.spotify).await {
        Ok(t) => t,
        Err(e) => error!(
            "Failed to load token. Authorize with Spotify first.\n Error: {}",
            e
        ),
    };

    Arc::new(SpotifyClient::new(settings.spotify.api_url.clone(), tokens))
}

/// Finds or creates the named playlist of the current user. Exits on failure.
pub(crate) async fn target_playlist(
    client: &dyn CatalogClient,
    name: &str,
    visibility: Visibility,
) -> Playlist {
    let user_id = match client.current_user_id().await {
        Ok(id) => id,
        Err(e) => error!("Cannot fetch current user. Err: {}", e),
    };

    match PlaylistMerger::new(client)
        .get_or_create(&user_id, name, visibility)
        .await
    {
        Ok(target) if target.created => {
            success!("Created new playlist: {}", target.playlist.name);
            target.playlist
        }
        Ok(target) => {
            info!("Found existing playlist: {}", target.playlist.name);
            target.playlist
        }
        Err(e) => error!("Cannot get or create playlist '{}'. Err: {}", name, e),
    }
}

/// Runs the artist batch against the named playlist and prints the summary.
pub(crate) async fn run_batch(
    settings: &Settings,
    names: Vec<String>,
    playlist_name: Option<String>,
) {
    let name = playlist_name.unwrap_or_else(|| settings.default_playlist_name.clone());
    let client = connect(settings).await;
    let playlist = target_playlist(client.as_ref(), &name, settings.batch_visibility).await;

    let orchestrator = BatchOrchestrator::new(
        client,
        settings.selection.clone(),
        settings.artist_search_limit,
        settings.pool_size,
    );

    info!(
        "Processing {} artists with {} workers",
        names.len(),
        settings.pool_size
    );
    let pb = progress_bar();
    let summary = orchestrator.run(&names, &playlist, &pb).await;
    pb.finish_and_clear();

    print_summary(&summary);
}

pub(crate) fn print_summary(summary: &BatchSummary) {
    let rows: Vec<ArtistResultTableRow> = summary
        .results
        .iter()
        .map(|r| ArtistResultTableRow {
            artist: r.name.clone(),
            status: r.status.to_string(),
            tracks: r.tracks_added,
        })
        .collect();
    if !rows.is_empty() {
        println!("{}", Table::new(rows));
    }

    success!("{} artists processed successfully", summary.succeeded());
    success!("{} tracks added to playlist", summary.total_added());

    let (shown, remaining) = summary.failed_preview(FAILED_PREVIEW_LIMIT);
    if !shown.is_empty() {
        warning!(
            "{} artists without tracks added:",
            shown.len() + remaining
        );
        for name in shown {
            println!("      - {}", name);
        }
        if remaining > 0 {
            println!("      ... and {} more", remaining);
        }
    }

    info!("Playlist URL: {}", summary.playlist_url);
}

pub(crate) fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// Bar sized later by the component that knows the amount of work.
pub(crate) fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{bar:30.blue/white}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
