use std::path::{Path, PathBuf};

use crate::{
    error, info,
    sources::export::{export_rows, read_html_sources, to_csv},
    success, warning,
};

/// `export <PATH>`: writes the tracks of saved tracklist pages to CSV.
pub async fn export(input: &Path, output: PathBuf) {
    let sources = match read_html_sources(input).await {
        Ok(s) => s,
        Err(e) => error!("Cannot read tracklist pages. Err: {}", e),
    };
    if sources.is_empty() {
        warning!("No .html files found in {}", input.display());
        return;
    }
    info!("Parsing {} pages", sources.len());

    let rows = match export_rows(&sources) {
        Ok(r) => r,
        Err(e) => error!("Cannot parse tracklist pages. Err: {}", e),
    };

    if let Err(e) = async_fs::write(&output, to_csv(&rows)).await {
        error!("Cannot write {}. Err: {}", output.display(), e);
    }
    success!("Saved {} tracks to {}", rows.len(), output.display());
}
