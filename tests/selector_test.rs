mod common;

use common::{FakeCatalog, fast_selection, numbered_tracks, tracks};
use lineupcli::{
    builder::TrackSelector,
    config::SelectionSettings,
    retry::RetryPolicy,
    types::AlbumKind,
};

#[tokio::test]
async fn test_bundle_keeps_source_order_without_duplicates() {
    let catalog = FakeCatalog::new()
        .with_top_tracks("artist", &["A", "B"])
        .with_album("artist", AlbumKind::Single, "s1", "New Single", tracks(&["B", "C"]))
        .with_album("artist", AlbumKind::Album, "lp1", "Debut", tracks(&["C", "D"]));

    let settings = SelectionSettings {
        recent_tracks: 2,
        album_min_tracks: 2,
        ..fast_selection()
    };
    let bundle = TrackSelector::new(&catalog, &settings).select("artist").await;

    assert_eq!(bundle.into_tracks(), tracks(&["A", "B", "C", "D"]));
}

#[tokio::test]
async fn test_remastered_album_is_skipped() {
    let catalog = FakeCatalog::new()
        .with_album(
            "artist",
            AlbumKind::Album,
            "rm",
            "Artist – Remastered Edition",
            numbered_tracks("rm", 12),
        )
        .with_album("artist", AlbumKind::Album, "lp", "Real Album", numbered_tracks("lp", 4));

    let settings = fast_selection();
    let album = TrackSelector::new(&catalog, &settings)
        .album_tracks("artist")
        .await;

    assert_eq!(album, numbered_tracks("lp", 4));
}

#[tokio::test]
async fn test_album_tracks_capped_at_ten() {
    let catalog = FakeCatalog::new().with_album(
        "artist",
        AlbumKind::Album,
        "lp",
        "Long Album",
        numbered_tracks("lp", 18),
    );

    let settings = fast_selection();
    let album = TrackSelector::new(&catalog, &settings)
        .album_tracks("artist")
        .await;

    assert_eq!(album, numbered_tracks("lp", 10));
}

#[tokio::test]
async fn test_falls_back_when_every_album_matches_a_keyword() {
    let catalog = FakeCatalog::new()
        .with_album("artist", AlbumKind::Album, "l1", "Live in Berlin", numbered_tracks("live", 2))
        .with_album("artist", AlbumKind::Album, "r1", "The Remixes", numbered_tracks("remix", 6));

    let settings = fast_selection();
    let album = TrackSelector::new(&catalog, &settings)
        .album_tracks("artist")
        .await;

    // The live album is too short even without the filter
    assert_eq!(album, numbered_tracks("remix", 6));
}

#[tokio::test]
async fn test_short_albums_are_passed_over() {
    let catalog = FakeCatalog::new()
        .with_album("artist", AlbumKind::Album, "ep", "Short", numbered_tracks("ep", 2))
        .with_album("artist", AlbumKind::Album, "lp", "Full", numbered_tracks("lp", 3));

    let settings = fast_selection();
    let album = TrackSelector::new(&catalog, &settings)
        .album_tracks("artist")
        .await;

    assert_eq!(album, numbered_tracks("lp", 3));
}

#[tokio::test]
async fn test_recent_releases_skip_repeated_names() {
    let catalog = FakeCatalog::new()
        .with_album("artist", AlbumKind::Single, "s1", "Glue", tracks(&["g1"]))
        .with_album("artist", AlbumKind::Single, "s2", "glue ", tracks(&["g2"]))
        .with_album("artist", AlbumKind::Single, "s3", "Atlas", tracks(&["a1", "a2"]));

    let settings = fast_selection();
    let recent = TrackSelector::new(&catalog, &settings)
        .recent_releases("artist")
        .await;

    assert_eq!(recent, tracks(&["g1", "a1", "a2"]));
}

#[tokio::test]
async fn test_recent_releases_limited_to_five() {
    let catalog = FakeCatalog::new()
        .with_album("artist", AlbumKind::Album, "lp1", "First", numbered_tracks("a", 4))
        .with_album("artist", AlbumKind::Album, "lp2", "Second", numbered_tracks("b", 4))
        .with_album("artist", AlbumKind::Album, "lp3", "Third", numbered_tracks("c", 4));

    let settings = fast_selection();
    let recent = TrackSelector::new(&catalog, &settings)
        .recent_releases("artist")
        .await;

    assert_eq!(recent, tracks(&["a0", "a1", "a2", "a3", "b0"]));

    // The third release is never opened
    assert_eq!(catalog.calls("album_tracks"), 2);
}

#[tokio::test]
async fn test_top_tracks_retried_until_available() {
    let catalog = FakeCatalog::new()
        .with_top_tracks("artist", &["t1", "t2"])
        .with_flaky_top_tracks("artist", 2);

    let settings = fast_selection();
    let top = TrackSelector::new(&catalog, &settings).top_tracks("artist").await;

    assert_eq!(top, tracks(&["t1", "t2"]));
    assert_eq!(catalog.calls("top_tracks"), 3);
}

#[tokio::test]
async fn test_top_tracks_give_up_after_max_attempts() {
    let catalog = FakeCatalog::new()
        .with_top_tracks("artist", &["t1"])
        .with_flaky_top_tracks("artist", 5);

    let settings = SelectionSettings {
        top_retry: RetryPolicy::immediate(3),
        ..fast_selection()
    };
    let top = TrackSelector::new(&catalog, &settings).top_tracks("artist").await;

    assert!(top.is_empty());
    assert_eq!(catalog.calls("top_tracks"), 3);
}

#[tokio::test]
async fn test_artist_without_releases_yields_empty_bundle() {
    let catalog = FakeCatalog::new();

    let settings = fast_selection();
    let bundle = TrackSelector::new(&catalog, &settings).select("nobody").await;

    assert!(bundle.is_empty());
}
