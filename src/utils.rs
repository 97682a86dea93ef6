use std::collections::HashSet;

use crate::types::TrackRef;

/// Trims and lowercases a name for case-insensitive comparisons.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whether the normalized `name` contains any of the (lowercase) keywords.
pub fn contains_keyword(name: &str, keywords: &[String]) -> bool {
    let name = normalize_name(name);
    keywords
        .iter()
        .any(|keyword| name.contains(&keyword.to_lowercase()))
}

pub fn dedupe_preserving_order<I>(tracks: I) -> Vec<TrackRef>
where
    I: IntoIterator<Item = TrackRef>,
{
    let mut seen = HashSet::new();
    tracks
        .into_iter()
        .filter(|track| seen.insert(track.id().to_string()))
        .collect()
}

/// Trims every name and drops the blank ones, keeping input order.
pub fn clean_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

pub fn split_artist_csv(input: &str) -> Vec<String> {
    clean_names(input.split(','))
}

/// Case-insensitive name deduplication for extracted performer names.
///
/// Names of a single character are dropped, the first spelling wins.
pub fn dedupe_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        let normalized = normalize_name(name);
        if normalized.chars().count() > 1 && seen.insert(normalized) {
            unique.push(name.to_string());
        }
    }
    unique
}

pub fn mask_secret(value: Option<&str>) -> String {
    match value {
        Some(v) if v.chars().count() > 4 => {
            format!("{}****", v.chars().take(4).collect::<String>())
        }
        Some(v) if !v.is_empty() => "****".to_string(),
        _ => "(not set)".to_string(),
    }
}
