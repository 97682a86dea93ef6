use std::collections::HashSet;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::{error::SourceError, types::TracklistEntry};

const TRACK_ROW: &str = ".trackFormat__text";
const RECORDING: &str = "[itemtype$='schema.org/MusicRecording']";
const RECORDING_NAME: &str = "meta[itemprop='name']";
const RECORDING_ARTIST: &str = "meta[itemprop='byArtist']";
const NUMBERED_LINE: &str = r"^\s*\d+\.\s+(.+?)\s+[–-]\s+(.+?)\s*$";
const LABEL_NOTE: &str = r"\s*\[[^\]]*\]";
const VERSION_NOTE: &str =
    r"(?i)\s*\([^)]*\b(remix|mix|edit|version|rework|dub|bootleg|vip|remaster(ed)?)\b[^)]*\)";

/// Extracts "Artist - Title" entries from a tracklist page.
///
/// Three layouts are tried in order and the first one that yields entries
/// wins:
///
/// 1. track rows (`.trackFormat__text`) reading "Artist - Title"
/// 2. schema.org `MusicRecording` blocks with `name` and `byArtist` meta tags
/// 3. numbered text lines such as `12. Artist – Title`
///
/// Titles lose a leading repetition of the artist name and duplicates are
/// dropped, keeping the first occurrence.
pub fn parse_tracklist(html: &str) -> Result<Vec<TracklistEntry>, SourceError> {
    let document = Html::parse_document(html);

    let mut entries = track_rows(&document)?;
    if entries.is_empty() {
        entries = recordings(&document)?;
    }
    if entries.is_empty() {
        entries = numbered_lines(&document)?;
    }

    let entries = entries
        .into_iter()
        .map(|entry| TracklistEntry {
            title: clean_redundant_artist(&entry.artist, &entry.title),
            artist: entry.artist,
        })
        .filter(|entry| !entry.artist.is_empty() && !entry.title.is_empty());

    Ok(dedupe_entries(entries))
}

/// Drops an "Artist -", "Artist:" or "Artist |" prefix from `title`.
pub fn clean_redundant_artist(artist: &str, title: &str) -> String {
    let pattern = format!(r"(?i)^{}\s*[-:|]\s*", regex::escape(artist.trim()));
    match Regex::new(&pattern) {
        Ok(re) if !artist.trim().is_empty() => re.replace(title, "").trim().to_string(),
        _ => title.trim().to_string(),
    }
}

/// Reduces a DJ tracklist title to the song name used for searching.
///
/// Removes label and catalog notes in square brackets as well as
/// parenthesized remix, edit or version notes:
/// `"Ayla (Taucher Remix) [POSITIVA]"` becomes `"Ayla"`. Other parentheses
/// such as `"(Live)"` stay. A title made only of notes is returned trimmed.
pub fn clean_title(title: &str) -> String {
    let mut cleaned = title.to_string();
    for pattern in [LABEL_NOTE, VERSION_NOTE] {
        match Regex::new(pattern) {
            Ok(re) => cleaned = re.replace_all(&cleaned, "").into_owned(),
            Err(e) => log::warn!("Invalid title pattern {}: {}", pattern, e),
        }
    }

    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        title.trim().to_string()
    } else {
        cleaned
    }
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Extraction(format!("bad selector {css}: {e}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn meta_content(block: ElementRef<'_>, meta: &Selector) -> Option<String> {
    block
        .select(meta)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

fn entry(artist: &str, title: &str) -> TracklistEntry {
    TracklistEntry {
        artist: artist.trim().to_string(),
        title: title.trim().to_string(),
    }
}

fn track_rows(document: &Html) -> Result<Vec<TracklistEntry>, SourceError> {
    let rows = selector(TRACK_ROW)?;
    Ok(document
        .select(&rows)
        .filter_map(|row| {
            let text = element_text(row);
            text.split_once(" - ")
                .map(|(artist, title)| entry(artist, title))
        })
        .collect())
}

fn recordings(document: &Html) -> Result<Vec<TracklistEntry>, SourceError> {
    let blocks = selector(RECORDING)?;
    let name_meta = selector(RECORDING_NAME)?;
    let artist_meta = selector(RECORDING_ARTIST)?;

    Ok(document
        .select(&blocks)
        .filter_map(|block| {
            let title = meta_content(block, &name_meta)?;
            let artist = meta_content(block, &artist_meta)?;
            Some(entry(&artist, &title))
        })
        .collect())
}

fn numbered_lines(document: &Html) -> Result<Vec<TracklistEntry>, SourceError> {
    let line = Regex::new(NUMBERED_LINE).map_err(|e| SourceError::Extraction(e.to_string()))?;
    let text = document.root_element().text().collect::<Vec<_>>().join("\n");

    Ok(text
        .lines()
        .filter_map(|l| line.captures(l))
        .map(|caps| entry(&caps[1], &caps[2]))
        .collect())
}

fn dedupe_entries<I>(entries: I) -> Vec<TracklistEntry>
where
    I: IntoIterator<Item = TracklistEntry>,
{
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert((e.artist.to_lowercase(), e.title.to_lowercase())))
        .collect()
}
