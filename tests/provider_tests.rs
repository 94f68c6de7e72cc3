use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use showfinder_api::{
    error::{AppError, RetrievalError},
    models::MediaType,
    services::providers::{
        MetadataProvider, SearchSource, SuggestionProvider, TasteDiveProvider, TmdbProvider,
    },
};

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

fn tmdb_provider(server: &MockServer) -> TmdbProvider {
    TmdbProvider::new(
        "test_key".to_string(),
        server.uri(),
        IMAGE_BASE.to_string(),
        None,
    )
    .unwrap()
}

#[tokio::test]
async fn test_search_page_fetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .and(query_param("api_key", "test_key"))
        .and(query_param("query", "dune"))
        .and(query_param("page", "2"))
        .and(query_param("include_adult", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "results": [
                {"id": 438631, "media_type": "movie", "title": "Dune"},
                {"id": 90228, "media_type": "tv", "name": "Dune: Prophecy"}
            ],
            "total_pages": 3,
            "total_results": 45
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = tmdb_provider(&server).fetch_page("dune", 2).await.unwrap();
    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_results, 45);
    assert_eq!(page.results.len(), 2);
}

#[tokio::test]
async fn test_search_server_error_is_upstream_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = tmdb_provider(&server).fetch_page("dune", 1).await.unwrap_err();
    assert!(matches!(err, RetrievalError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_search_missing_results_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "total_pages": 1
        })))
        .mount(&server)
        .await;

    let err = tmdb_provider(&server).fetch_page("dune", 1).await.unwrap_err();
    assert!(matches!(err, RetrievalError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_search_invalid_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = tmdb_provider(&server).fetch_page("dune", 1).await.unwrap_err();
    assert!(matches!(err, RetrievalError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_details_with_age_rating() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/438631"))
        .and(query_param("append_to_response", "release_dates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 438631,
            "title": "Dune",
            "poster_path": "/dune.jpg",
            "vote_average": 7.8,
            "vote_count": 12500,
            "overview": "Paul Atreides travels to Arrakis.",
            "release_date": "2021-10-22",
            "runtime": 155,
            "genres": [{"id": 878, "name": "Science Fiction"}],
            "release_dates": {
                "results": [{"iso_3166_1": "US", "release_dates": [{"certification": "PG-13"}]}]
            }
        })))
        .mount(&server)
        .await;

    let details = tmdb_provider(&server)
        .show_details(MediaType::Film, 438631)
        .await
        .unwrap();
    assert_eq!(details.title, "Dune");
    assert_eq!(details.poster_url, format!("{}/w500/dune.jpg", IMAGE_BASE));
    assert_eq!(details.age_rating.as_deref(), Some("PG-13"));
    assert_eq!(details.short_release_date.as_deref(), Some("Oct 22, 2021"));
    assert_eq!(details.genres, vec!["Science Fiction".to_string()]);
}

#[tokio::test]
async fn test_details_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tv/1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status_code": 34,
            "status_message": "The resource you requested could not be found."
        })))
        .mount(&server)
        .await;

    let err = tmdb_provider(&server)
        .show_details(MediaType::Series, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_watch_providers_for_region() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tv/90228/watch/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 90228,
            "results": {
                "US": {
                    "link": "https://www.themoviedb.org/tv/90228/watch?locale=US",
                    "flatrate": [{"provider_id": 1899, "provider_name": "Max", "logo_path": "/max.jpg"}]
                },
                "GB": {
                    "buy": [{"provider_id": 2, "provider_name": "Apple TV"}]
                }
            }
        })))
        .mount(&server)
        .await;

    let provider = tmdb_provider(&server);

    let us = provider
        .watch_providers(MediaType::Series, 90228, "us")
        .await
        .unwrap();
    assert_eq!(us.region, "US");
    assert_eq!(us.flatrate.len(), 1);
    assert_eq!(us.flatrate[0].name, "Max");
    assert_eq!(
        us.flatrate[0].logo_url.as_deref(),
        Some("https://image.tmdb.org/t/p/original/max.jpg")
    );

    let fr = provider
        .watch_providers(MediaType::Series, 90228, "FR")
        .await
        .unwrap();
    assert!(fr.flatrate.is_empty());
    assert!(fr.buy.is_empty());
}

#[tokio::test]
async fn test_recommendations_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/438631/recommendations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [
                {"id": 335984, "title": "Blade Runner 2049", "release_date": "2017-10-04"},
                {"id": 329865, "title": "Arrival"}
            ],
            "total_pages": 2,
            "total_results": 40
        })))
        .mount(&server)
        .await;

    let items = tmdb_provider(&server)
        .recommendations(MediaType::Film, 438631)
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Blade Runner 2049");
    assert_eq!(items[0].media_type, MediaType::Film);
    assert_eq!(items[1].release_date, None);
}

#[tokio::test]
async fn test_tastedive_similar() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/similar"))
        .and(query_param("q", "Dune"))
        .and(query_param("type", "shows"))
        .and(query_param("k", "td_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "similar": {
                "info": [{"name": "Dune", "type": "show"}],
                "results": [{"name": "Foundation"}, {"name": "The Expanse"}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = TasteDiveProvider::new("td_key".to_string(), server.uri(), None).unwrap();
    let names = provider.similar("Dune", MediaType::Series).await.unwrap();
    assert_eq!(names, vec!["Foundation".to_string(), "The Expanse".to_string()]);
}

#[tokio::test]
async fn test_tastedive_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/similar"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider = TasteDiveProvider::new("td_key".to_string(), server.uri(), None).unwrap();
    let err = provider.similar("Dune", MediaType::Film).await.unwrap_err();
    assert!(matches!(err, AppError::ExternalApi(_)));
}
