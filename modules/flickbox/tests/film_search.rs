mod common;

use std::sync::Arc;

use common::*;
use flickbox::domain::film_search::{FilmSearch, SearchDisplay};

fn search_with(metadata: Arc<FakeMetadata>) -> FilmSearch {
    FilmSearch::new(metadata, 1)
}

#[tokio::test]
async fn opening_with_empty_query_loads_popular_page() {
    let metadata = FakeMetadata::new();
    *metadata.popular.lock() = vec![metadata_film(1), metadata_film(2)];
    let search = search_with(metadata.clone());
    assert_eq!(search.display(), SearchDisplay::Closed);

    search.open().await;
    assert_eq!(*metadata.popular_calls.lock(), vec![1]);
    match search.display() {
        SearchDisplay::Films(films) => assert_eq!(films.len(), 2),
        other => panic!("unexpected display {other:?}"),
    }
    assert_eq!(search.pick(1).map(|f| f.id.0), Some(2));
    assert_eq!(search.pick(5), None);
}

#[tokio::test]
async fn blank_query_clears_results_without_network() {
    let metadata = FakeMetadata::new();
    metadata
        .by_query
        .lock()
        .insert("up".into(), vec![metadata_film(14160)]);
    let search = search_with(metadata.clone());
    search.open().await;
    search.set_query("up").await;
    let calls_before = metadata.total_calls();

    search.set_query("   ").await;
    assert_eq!(metadata.total_calls(), calls_before);
    assert_eq!(search.query(), "   ");
    assert_eq!(search.display(), SearchDisplay::NoResults);
}

#[tokio::test]
async fn zero_matches_show_no_results() {
    let metadata = FakeMetadata::new();
    let search = search_with(metadata.clone());
    search.open().await;
    search.set_query("zzzz").await;
    assert_eq!(*metadata.search_calls.lock(), vec!["zzzz".to_string()]);
    assert_eq!(search.display(), SearchDisplay::NoResults);
}

#[tokio::test]
async fn failed_search_clears_results() {
    let metadata = FakeMetadata::new();
    metadata
        .by_query
        .lock()
        .insert("alien".into(), vec![metadata_film(348)]);
    let search = search_with(metadata.clone());
    search.open().await;
    search.set_query("alien").await;
    assert!(matches!(search.display(), SearchDisplay::Films(_)));

    *metadata.fail.lock() = true;
    search.set_query("aliens").await;
    assert_eq!(search.display(), SearchDisplay::NoResults);
}

#[tokio::test]
async fn slow_earlier_search_overwrites_later_one() {
    let metadata = FakeMetadata::new();
    metadata
        .by_query
        .lock()
        .insert("st".into(), vec![metadata_film(1), metadata_film(2)]);
    metadata
        .by_query
        .lock()
        .insert("star".into(), vec![metadata_film(11)]);
    let gate = Arc::new(tokio::sync::Notify::new());
    metadata.gates.lock().insert("st".into(), gate.clone());

    let search = Arc::new(search_with(metadata.clone()));
    search.open().await;

    let slow = {
        let search = search.clone();
        tokio::spawn(async move { search.set_query("st").await })
    };
    while metadata.search_calls.lock().is_empty() {
        tokio::task::yield_now().await;
    }
    assert_eq!(search.display(), SearchDisplay::Loading);

    search.set_query("star").await;
    gate.notify_one();
    slow.await.unwrap();

    // Responses are applied in arrival order.
    match search.display() {
        SearchDisplay::Films(films) => assert_eq!(films.len(), 2),
        other => panic!("unexpected display {other:?}"),
    }
}

#[tokio::test]
async fn close_resets_query_and_results() {
    let metadata = FakeMetadata::new();
    metadata
        .by_query
        .lock()
        .insert("heat".into(), vec![metadata_film(949)]);
    let search = search_with(metadata);
    search.open().await;
    search.set_query("heat").await;

    search.close();
    assert!(!search.is_open());
    assert_eq!(search.query(), "");
    assert_eq!(search.display(), SearchDisplay::Closed);
    assert_eq!(search.pick(0), None);
}
