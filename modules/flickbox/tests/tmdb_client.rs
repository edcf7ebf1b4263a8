//! Metadata API adapter tests.

use httpmock::prelude::*;
use modkit::TracedClient;
use serde_json::json;

use flickbox::domain::error::DomainError;
use flickbox::domain::ports::MetadataSource;
use flickbox::infra::tmdb::TmdbClient;
use flickbox::model::TmdbId;

fn client(server: &MockServer, key: &str) -> TmdbClient {
    TmdbClient::parse(TracedClient::default(), &server.url("/3"), key).unwrap()
}

#[tokio::test]
async fn popular_sends_key_and_page() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET)
            .path("/3/movie/popular")
            .query_param("api_key", "k3y")
            .query_param("page", "1")
            .header_exists("traceparent");
        then.status(200).json_body(json!({
            "page": 1,
            "results": [
                {"id": 238, "title": "The Godfather", "release_date": "1972-03-14",
                 "poster_path": "/gf.jpg", "vote_average": 8.4}
            ]
        }));
    });

    let films = client(&server, "k3y").popular(1).await.unwrap();
    m.assert();
    assert_eq!(films.len(), 1);
    assert_eq!(films[0].id, TmdbId(238));
    assert_eq!(films[0].rating().to_string(), "4.2");
}

#[tokio::test]
async fn search_encodes_query() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET)
            .path("/3/search/movie")
            .query_param("api_key", "k3y")
            .query_param("query", "amélie & co");
        then.status(200).json_body(json!({ "results": [] }));
    });

    let films = client(&server, "k3y").search("amélie & co").await.unwrap();
    m.assert();
    assert!(films.is_empty());
}

#[tokio::test]
async fn missing_key_fails_without_request() {
    let server = MockServer::start();
    let films = client(&server, "  ").popular(1).await;
    assert_eq!(
        films.unwrap_err(),
        DomainError::NotConfigured {
            what: "metadata_api_key"
        }
    );
}

#[tokio::test]
async fn unauthorized_is_http_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/3/search/movie");
        then.status(401)
            .json_body(json!({ "status_message": "Invalid API key" }));
    });

    let err = client(&server, "bad").search("up").await.unwrap_err();
    assert_eq!(err, DomainError::http_status("search/movie", 401));
}
