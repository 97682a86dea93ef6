use std::sync::Arc;

use indicatif::ProgressBar;
use tokio::{
    sync::{Semaphore, mpsc, oneshot},
    task::JoinHandle,
};

use crate::{
    builder::{
        merger::PlaylistMerger,
        resolver::{ArtistResolver, Resolution},
        selector::TrackSelector,
    },
    config::SelectionSettings,
    error::CatalogError,
    spotify::CatalogClient,
    types::{ArtistResult, ArtistStatus, Playlist, TrackRef},
    utils,
};

/// Number of failed artist names listed before the remainder is summarized.
pub const FAILED_PREVIEW_LIMIT: usize = 10;

/// Outcome of a batch run, results in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub results: Vec<ArtistResult>,
    pub playlist_url: String,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success()).count()
    }

    pub fn failed_names(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.success())
            .map(|r| r.name.as_str())
            .collect()
    }

    pub fn total_added(&self) -> usize {
        self.results.iter().map(|r| r.tracks_added).sum()
    }

    /// The first `limit` failed names and how many more were left out.
    pub fn failed_preview(&self, limit: usize) -> (Vec<&str>, usize) {
        let failed = self.failed_names();
        let remaining = failed.len().saturating_sub(limit);
        (failed.into_iter().take(limit).collect(), remaining)
    }
}

struct MergeRequest {
    tracks: Vec<TrackRef>,
    reply: oneshot::Sender<Result<usize, CatalogError>>,
}

/// Runs the per-artist pipeline for many artists concurrently.
///
/// Resolution and selection run on at most `pool_size` tasks at a time.
/// Additions to the playlist go through a single writer task, so membership
/// checks and appends for one playlist never interleave.
pub struct BatchOrchestrator {
    client: Arc<dyn CatalogClient>,
    selection: Arc<SelectionSettings>,
    search_limit: u32,
    pool_size: usize,
}

impl BatchOrchestrator {
    pub fn new(
        client: Arc<dyn CatalogClient>,
        selection: SelectionSettings,
        search_limit: u32,
        pool_size: usize,
    ) -> Self {
        Self {
            client,
            selection: Arc::new(selection),
            search_limit,
            pool_size: pool_size.max(1),
        }
    }

    /// Processes every non-blank name and merges its tracks into `playlist`.
    ///
    /// One artist failing never affects the others; every cleaned name gets
    /// exactly one [`ArtistResult`].
    pub async fn run<S: AsRef<str>>(
        &self,
        names: &[S],
        playlist: &Playlist,
        progress: &ProgressBar,
    ) -> BatchSummary {
        let names = utils::clean_names(names);
        let total = names.len();
        progress.set_length(total as u64);

        let (writer, writer_handle) = self.spawn_writer(playlist.id.clone());
        let semaphore = Arc::new(Semaphore::new(self.pool_size));
        let mut handles = Vec::with_capacity(total);

        for (index, name) in names.iter().enumerate() {
            let client = self.client.clone();
            let selection = self.selection.clone();
            let semaphore = semaphore.clone();
            let writer = writer.clone();
            let progress = progress.clone();
            let search_limit = self.search_limit;
            let name = name.clone();

            let handle: JoinHandle<ArtistResult> = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return ArtistResult::new(name, ArtistStatus::Failed(e.to_string()), 0);
                    }
                };

                progress.set_message(name.clone());
                let result =
                    process_artist(client.as_ref(), &selection, search_limit, name, &writer).await;

                progress.println(format!(
                    "[{}/{}] {}: {}",
                    index + 1,
                    total,
                    result.name,
                    describe(&result)
                ));
                progress.inc(1);
                result
            });
            handles.push(handle);
        }
        drop(writer);

        let mut results = Vec::with_capacity(total);
        for (handle, name) in handles.into_iter().zip(names) {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    log::warn!("Worker for '{}' stopped: {}", name, e);
                    results.push(ArtistResult::new(name, ArtistStatus::Failed(e.to_string()), 0));
                }
            }
        }

        if let Err(e) = writer_handle.await {
            log::warn!("Playlist writer stopped: {}", e);
        }

        BatchSummary {
            results,
            playlist_url: playlist.url.clone(),
        }
    }

    fn spawn_writer(&self, playlist_id: String) -> (mpsc::Sender<MergeRequest>, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<MergeRequest>(self.pool_size);
        let client = self.client.clone();

        let handle = tokio::spawn(async move {
            let merger = PlaylistMerger::new(client.as_ref());
            while let Some(request) = rx.recv().await {
                let outcome = merger.add(&playlist_id, &request.tracks).await;
                // The worker may have been cancelled; nothing to report then.
                let _ = request.reply.send(outcome);
            }
        });

        (tx, handle)
    }
}

/// `pending → resolving → selecting → merging → done` for one artist.
async fn process_artist(
    client: &dyn CatalogClient,
    selection: &SelectionSettings,
    search_limit: u32,
    name: String,
    writer: &mpsc::Sender<MergeRequest>,
) -> ArtistResult {
    let artist = match ArtistResolver::new(client, search_limit).resolve(&name).await {
        Resolution::Found(artist) => artist,
        Resolution::NotFound => return ArtistResult::new(name, ArtistStatus::NotFound, 0),
        Resolution::Failed(e) => {
            return ArtistResult::new(name, ArtistStatus::Failed(e.to_string()), 0);
        }
    };

    let bundle = TrackSelector::new(client, selection)
        .select(&artist.id)
        .await;
    if bundle.is_empty() {
        return ArtistResult::new(name, ArtistStatus::NoTracks, 0);
    }

    let (reply, response) = oneshot::channel();
    let request = MergeRequest {
        tracks: bundle.into_tracks(),
        reply,
    };
    if writer.send(request).await.is_err() {
        return ArtistResult::new(
            name,
            ArtistStatus::Failed("playlist writer stopped".to_string()),
            0,
        );
    }

    match response.await {
        Ok(Ok(0)) => ArtistResult::new(name, ArtistStatus::AlreadyPresent, 0),
        Ok(Ok(added)) => ArtistResult::new(name, ArtistStatus::Added, added),
        Ok(Err(e)) => ArtistResult::new(name, ArtistStatus::Failed(e.to_string()), 0),
        Err(_) => ArtistResult::new(
            name,
            ArtistStatus::Failed("playlist writer stopped".to_string()),
            0,
        ),
    }
}

fn describe(result: &ArtistResult) -> String {
    match result.status {
        ArtistStatus::Added => format!("added {} tracks", result.tracks_added),
        _ => result.status.to_string(),
    }
}
