//! Integration tests for loading catalogs from fixture files.

use std::path::PathBuf;

use nocturne_core::{Genre, Opus};
use nocturne_fetch::cache::write_cache;
use nocturne_fetch::{load_catalog, Fetcher, FetchError, JsonFileFetcher, SplitJsonFetcher};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[tokio::test]
async fn test_load_catalog_sets_aside_corrupt_records() {
    let fetcher = JsonFileFetcher::new(fixture("catalog.json"));
    let (catalog, rejected) = load_catalog(&fetcher).await.unwrap();

    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.playable_count(), 2);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].index, 3);
    assert_eq!(rejected[0].title, "Ballade in G minor");
    assert!(rejected[0].source.is_integrity());
}

#[tokio::test]
async fn test_file_fetcher_normalizes_remote_ids() {
    let fetcher = JsonFileFetcher::new(fixture("catalog.json"));
    let records = fetcher.fetch_all().await.unwrap();

    assert_eq!(records[0].contents[0].remote_id, "nocturne0001");
    assert_eq!(records[2].contents[0].remote_id, "polofant001");
    assert_eq!(
        records[0].contents[1].artists.as_slice(),
        ["Maurizio Pollini", "Ivan Moravec"]
    );
    assert_eq!(records[4].opus, Opus::Token("posth.".to_string()));
}

#[tokio::test]
async fn test_fixture_genre_queries() {
    let fetcher = JsonFileFetcher::new(fixture("catalog.json"));
    let (catalog, _) = load_catalog(&fetcher).await.unwrap();

    let nocturnes = catalog.by_genre(&["Nocturne"]);
    assert_eq!(nocturnes.len(), 1);
    assert!(nocturnes[0].title().contains("Nocturne"));

    // "Grande Valse Brillante" has no "Waltz" substring
    let waltzes = catalog.by_genre(&["Waltz"]);
    assert_eq!(waltzes.len(), 1);
    assert_eq!(waltzes[0].title(), "Waltz in A minor");

    let others = catalog.by_genre(&["Others"]);
    assert_eq!(others.len(), 1);
    assert_eq!(others[0].title(), "Grande Valse Brillante");

    let mut tokens: Vec<String> = Genre::KNOWN.iter().map(|g| g.to_string()).collect();
    tokens.push("Others".to_string());
    // Polonaise-Fantaisie appears under both of its genres
    assert_eq!(catalog.by_genre(&tokens).len(), catalog.len() + 1);
}

#[tokio::test]
async fn test_split_fetcher_joins_by_title() {
    let fetcher = SplitJsonFetcher::new(fixture("compositions.json"), fixture("contents.json"));
    let (catalog, rejected) = load_catalog(&fetcher).await.unwrap();

    assert!(rejected.is_empty());
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.playable_count(), 2);

    let etude = catalog.iter().next().unwrap();
    assert_eq!(etude.display_name(), "Etude in C minor Op.10 No.12");
    let ids: Vec<&str> = etude.contents().iter().map(|c| c.remote_id()).collect();
    assert_eq!(ids, ["revolution01", "revolution02"]);

    let berceuse = catalog.iter().nth(2).unwrap();
    assert!(!berceuse.has_contents());
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let fetcher = JsonFileFetcher::new(fixture("does-not-exist.json"));
    let err = fetcher.fetch_all().await.unwrap_err();
    assert!(matches!(err, FetchError::Io { .. }));
}

#[tokio::test]
async fn test_malformed_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = JsonFileFetcher::new(&path).fetch_all().await.unwrap_err();
    assert!(matches!(err, FetchError::Parse { .. }));
}

#[tokio::test]
async fn test_undecodable_record_does_not_block_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.json");
    let json = format!(
        r#"[
            {{"title": "Nocturne in E-flat", "opus": 9, "titleHash": "{}",
              "contents": [{{"remoteId": "https://youtu.be/9E6b3swbnWg", "artists": "Arthur Rubinstein"}}]}},
            {{"title": "Ballade", "opus": 23}},
            {{"title": "Polonaise", "opus": [53], "titleHash": "x"}}
        ]"#,
        nocturne_core::integrity::title_hash("Nocturne in E-flat")
    );
    std::fs::write(&path, json).unwrap();

    let (catalog, rejected) = load_catalog(&JsonFileFetcher::new(&path)).await.unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.pick_one().unwrap().contents()[0].remote_id(), "9E6b3swbnWg");

    let titles: Vec<&str> = rejected.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Ballade", "Polonaise"]);
    assert!(rejected[0].source.is_integrity());
    assert!(matches!(rejected[1].source, nocturne_core::Error::Malformed(_)));
}

#[tokio::test]
async fn test_cache_round_trip_preserves_catalog() {
    let (catalog, _) = load_catalog(&JsonFileFetcher::new(fixture("catalog.json")))
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("catalog.json");
    write_cache(&cache_path, &catalog.records()).unwrap();

    let (reloaded, rejected) = load_catalog(&JsonFileFetcher::new(&cache_path))
        .await
        .unwrap();
    assert!(rejected.is_empty());
    assert_eq!(reloaded.len(), catalog.len());
    for (a, b) in catalog.iter().zip(reloaded.iter()) {
        assert_eq!(a.display_name(), b.display_name());
        assert_eq!(a.contents(), b.contents());
    }
}
