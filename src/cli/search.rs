use tabled::Table;

use crate::{
    builder::{ArtistResolver, resolver::choose_most_popular},
    cli::common,
    config::Settings,
    error,
    types::CandidateTableRow,
    warning,
};

/// `search <NAME>`: shows the artist candidates and which one would be used.
pub async fn search(settings: &Settings, name: &str, limit: Option<u32>) {
    let client = common::connect(settings).await;
    let resolver = ArtistResolver::new(
        client.as_ref(),
        limit.unwrap_or(settings.artist_search_limit),
    );

    let pb = common::spinner(format!("Searching for {}...", name));
    let candidates = resolver.candidates(name).await;
    pb.finish_and_clear();

    let candidates = match candidates {
        Ok(c) => c,
        Err(e) => error!("Search failed. Err: {}", e),
    };
    if candidates.is_empty() {
        warning!("No artists found for '{}'.", name);
        return;
    }

    let chosen = choose_most_popular(candidates.clone()).map(|c| c.id);
    let rows: Vec<CandidateTableRow> = candidates
        .into_iter()
        .map(|c| CandidateTableRow {
            chosen: if Some(&c.id) == chosen.as_ref() {
                "*".to_string()
            } else {
                String::new()
            },
            name: c.name,
            popularity: c.popularity,
            id: c.id,
        })
        .collect();

    println!("{}", Table::new(rows));
}
