use crate::{cli::common, config::Settings, utils, warning};

/// `artists "<A, B, C>"`: builds the playlist from a comma-separated list.
pub async fn artists(settings: &Settings, csv: &str, playlist: Option<String>) {
    let names = utils::split_artist_csv(csv);
    if names.is_empty() {
        warning!("No artist names given.");
        return;
    }

    common::run_batch(settings, names, playlist).await;
}
