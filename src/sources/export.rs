use std::path::Path;

use crate::{error::SourceError, sources::tracklist::parse_tracklist};

pub const CSV_HEADER: [&str; 3] = ["title", "artist", "source_file"];

/// A saved tracklist page read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlSource {
    /// File name without its directory.
    pub name: String,
    pub html: String,
}

/// One exported track and the file it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub title: String,
    pub artist: String,
    pub source_file: String,
}

/// Reads a single `.html` file, or every `.html` file directly inside a
/// directory, sorted by file name.
pub async fn read_html_sources(path: &Path) -> Result<Vec<HtmlSource>, SourceError> {
    if path.is_dir() {
        let mut files = Vec::new();
        let mut dir = tokio::fs::read_dir(path).await?;
        while let Some(entry) = dir.next_entry().await? {
            let file = entry.path();
            if is_html(&file) && file.is_file() {
                files.push(file);
            }
        }
        files.sort();

        let mut sources = Vec::with_capacity(files.len());
        for file in files {
            sources.push(read_source(&file).await?);
        }
        return Ok(sources);
    }

    if is_html(path) {
        return Ok(vec![read_source(path).await?]);
    }

    Err(SourceError::Io(format!(
        "{} is neither an .html file nor a directory",
        path.display()
    )))
}

/// Parses every source and tags its tracks with the file name.
pub fn export_rows(sources: &[HtmlSource]) -> Result<Vec<ExportRow>, SourceError> {
    let mut rows = Vec::new();
    for source in sources {
        let entries = parse_tracklist(&source.html)?;
        log::debug!("{}: {} tracks", source.name, entries.len());
        rows.extend(entries.into_iter().map(|entry| ExportRow {
            title: entry.title,
            artist: entry.artist,
            source_file: source.name.clone(),
        }));
    }
    Ok(rows)
}

/// Renders rows as CSV with a `title,artist,source_file` header.
pub fn to_csv(rows: &[ExportRow]) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push_str("\r\n");
    for row in rows {
        let fields = [&row.title, &row.artist, &row.source_file];
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn is_html(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "html")
}

async fn read_source(path: &Path) -> Result<HtmlSource, SourceError> {
    let html = async_fs::read_to_string(path)
        .await
        .map_err(|e| SourceError::Io(format!("{}: {}", path.display(), e)))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(HtmlSource { name, html })
}
