use std::path::PathBuf;

use tokio::io::AsyncReadExt;

use crate::{
    cli::common,
    config::Settings,
    Res, error, info,
    sources::{OpenAiExtractor, lineup::extract_lineup},
    success, warning,
};

/// `lineup`: extracts performers from lineup text and builds the playlist.
///
/// Reads `file` when given, otherwise standard input.
pub async fn lineup(settings: &Settings, file: Option<PathBuf>, playlist: Option<String>) {
    let text = match read_text(file).await {
        Ok(t) => t,
        Err(e) => error!("Cannot read lineup text. Err: {}", e),
    };

    let api_key = match settings.openai_key() {
        Ok(key) => key,
        Err(e) => error!("{}", e),
    };
    let extractor = match OpenAiExtractor::new(api_key, settings.openai_model.clone()) {
        Ok(x) => x,
        Err(e) => error!("{}", e),
    };

    let pb = common::spinner("Extracting artist names from lineup...");
    let names = extract_lineup(&extractor, &text).await;
    pb.finish_and_clear();

    if names.is_empty() {
        warning!("No artists found in the lineup.");
        return;
    }
    success!("Found {} artists", names.len());
    info!("{}", names.join(", "));

    common::run_batch(settings, names, playlist).await;
}

async fn read_text(file: Option<PathBuf>) -> Res<String> {
    let text = match file {
        Some(path) => async_fs::read_to_string(path).await?,
        None => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            text
        }
    };

    if text.trim().is_empty() {
        return Err("lineup text is empty".into());
    }
    Ok(text)
}
