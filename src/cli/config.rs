use tabled::Table;

use crate::{
    config::{self, Settings},
    types::SettingTableRow,
    utils::mask_secret,
};

/// `config`: prints the effective settings with secrets masked.
pub fn show_config(settings: &Settings) {
    let sel = &settings.selection;
    let retry = |p: &crate::retry::RetryPolicy| {
        format!("{} x {}ms", p.max_attempts, p.backoff_base.as_millis())
    };

    let rows = vec![
        row("data directory", config::data_dir().display().to_string()),
        row(
            "client id",
            settings.spotify.client_id.clone().unwrap_or_else(|| "(not set)".to_string()),
        ),
        row(
            "client secret",
            mask_secret(settings.spotify.client_secret.as_deref()),
        ),
        row(
            "access token",
            mask_secret(settings.spotify.access_token.as_deref()),
        ),
        row("api url", settings.spotify.api_url.clone()),
        row("token url", settings.spotify.token_url.clone()),
        row("market", sel.market.clone()),
        row("default playlist", settings.default_playlist_name.clone()),
        row("batch playlists", settings.batch_visibility.to_string()),
        row("tracklist playlists", settings.tracklist_visibility.to_string()),
        row("workers", settings.pool_size.to_string()),
        row("artist search limit", settings.artist_search_limit.to_string()),
        row("top tracks retry", retry(&sel.top_retry)),
        row("releases retry", retry(&sel.recent_retry)),
        row("album retry", retry(&sel.album_retry)),
        row("album min tracks", sel.album_min_tracks.to_string()),
        row("exclusion keywords", sel.exclusion_keywords.join(", ")),
        row("openai key", mask_secret(settings.openai_api_key.as_deref())),
        row("openai model", settings.openai_model.clone()),
        row(
            "bright data key",
            mask_secret(settings.brightdata_api_key.as_deref()),
        ),
        row(
            "bright data zone",
            settings.brightdata_zone.clone().unwrap_or_else(|| "(not set)".to_string()),
        ),
    ];

    println!("{}", Table::new(rows));
}

fn row(setting: &str, value: String) -> SettingTableRow {
    SettingTableRow {
        setting: setting.to_string(),
        value,
    }
}
