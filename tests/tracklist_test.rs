mod common;

use common::{FakeCatalog, tracks};
use indicatif::ProgressBar;
use lineupcli::{
    builder::{PlaylistMerger, tracklist::match_entries},
    sources::{
        export::{export_rows, read_html_sources, to_csv},
        parse_tracklist,
    },
    types::{TracklistEntry, Visibility},
};
use tempfile::TempDir;

// Helper function to create an expected entry
fn entry(artist: &str, title: &str) -> TracklistEntry {
    TracklistEntry {
        artist: artist.to_string(),
        title: title.to_string(),
    }
}

#[test]
fn test_parse_track_rows() {
    let html = r#"
        <html><body>
          <div class="tlpItem">
            <span class="trackFormat__text"><span>Jeff Mills</span> - <span>The Bells</span></span>
          </div>
          <div class="tlpItem">
            <span class="trackFormat__text">Darude - Darude - Sandstorm</span>
          </div>
          <div class="tlpItem">
            <span class="trackFormat__text">ID</span>
          </div>
          <div class="tlpItem">
            <span class="trackFormat__text">Jeff Mills - The Bells</span>
          </div>
        </body></html>
    "#;

    let entries = parse_tracklist(html).unwrap();

    // Redundant artist prefix removed, duplicate and incomplete rows dropped
    assert_eq!(
        entries,
        vec![entry("Jeff Mills", "The Bells"), entry("Darude", "Sandstorm")]
    );
}

#[test]
fn test_parse_schema_org_recordings() {
    let html = r#"
        <html><body>
          <div itemscope itemtype="http://schema.org/MusicRecording">
            <meta itemprop="name" content="Crispy Bacon">
            <meta itemprop="byArtist" content="Laurent Garnier">
          </div>
          <div itemscope itemtype="https://schema.org/MusicRecording">
            <meta itemprop="name" content="Charly">
            <meta itemprop="byArtist" content="The Prodigy">
          </div>
          <div itemscope itemtype="http://schema.org/MusicRecording">
            <meta itemprop="name" content="">
            <meta itemprop="byArtist" content="Nobody">
          </div>
        </body></html>
    "#;

    let entries = parse_tracklist(html).unwrap();

    assert_eq!(
        entries,
        vec![
            entry("Laurent Garnier", "Crispy Bacon"),
            entry("The Prodigy", "Charly"),
        ]
    );
}

#[test]
fn test_parse_numbered_lines() {
    let html = r#"
        <html><body>
          <h1>Friday night set</h1>
          <p>1. Ayla – Ayla</p>
          <p>2. Camisra - Let Me Show You</p>
          <p>3. Ayla – Ayla</p>
          <p>Thanks for listening - see you next week</p>
        </body></html>
    "#;

    let entries = parse_tracklist(html).unwrap();

    assert_eq!(
        entries,
        vec![entry("Ayla", "Ayla"), entry("Camisra", "Let Me Show You")]
    );
}

#[test]
fn test_parse_page_without_tracks() {
    let entries = parse_tracklist("<html><body><p>Nothing here</p></body></html>").unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_import_into_new_public_playlist() {
    let catalog = FakeCatalog::new()
        .with_track_hit("Jeff Mills - The Bells", "bells")
        .with_track_hit("Darude - Sandstorm", "sandstorm")
        .with_track_hit("Darude - Sandstorm (Radio Edit)", "sandstorm");
    let entries = vec![
        entry("Jeff Mills", "The Bells"),
        entry("Unknown", "White Label"),
        entry("Darude", "Sandstorm"),
        entry("Darude", "Sandstorm (Radio Edit)"),
    ];

    let matches = match_entries(&catalog, &entries, &ProgressBar::hidden()).await;
    assert_eq!(matches.found, tracks(&["bells", "sandstorm"]));
    assert_eq!(matches.missing, vec![entry("Unknown", "White Label")]);

    let merger = PlaylistMerger::new(&catalog);
    let target = merger
        .get_or_create("user", "Escuchar", Visibility::Public)
        .await
        .unwrap();
    let added = merger.add(&target.playlist.id, &matches.found).await.unwrap();

    assert!(target.created);
    assert_eq!(added, 2);
    assert_eq!(
        catalog.playlist_contents(&target.playlist.id),
        tracks(&["bells", "sandstorm"])
    );
}

#[tokio::test]
async fn test_export_directory_to_csv() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("b_set.html"),
        r#"<span class="trackFormat__text">The Prodigy - Charly</span>"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("a_set.html"), "<p>1. Ayla – Ayla</p>").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "1. Not - Exported").unwrap();

    let sources = read_html_sources(dir.path()).await.unwrap();
    let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["a_set.html", "b_set.html"]);

    let csv = to_csv(&export_rows(&sources).unwrap());
    assert_eq!(
        csv,
        "title,artist,source_file\r\nAyla,Ayla,a_set.html\r\nCharly,The Prodigy,b_set.html\r\n"
    );
}

#[tokio::test]
async fn test_export_rejects_other_files() {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "nothing").unwrap();

    assert!(read_html_sources(&notes).await.is_err());
}
