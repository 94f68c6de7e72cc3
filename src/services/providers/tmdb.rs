/// TMDB (The Movie Database) v3 provider
///
/// Serves both the search pages consumed by the retrieval engine and the
/// per-title lookups behind the details screen.
///
/// API Flow:
/// 1. Search: /search/multi → films, series and people, paginated
/// 2. Details: /{movie|tv}/{id} with certifications appended
/// 3. Availability: /{movie|tv}/{id}/watch/providers
/// 4. Similar titles: /{movie|tv}/{id}/recommendations
use crate::{
    config::Config,
    error::{AppError, AppResult, RetrievalError},
    models::{
        normalize_records, MediaType, NormalizedItem, RawResultPage, RawShowDetails,
        RawWatchProviders, ResultPage, ShowDetails, WatchProviders,
    },
    services::providers::{MetadataProvider, SearchSource},
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const PROVIDER_NAME: &str = "tmdb";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
    language: String,
    region: String,
}

impl TmdbProvider {
    /// Creates a provider against the given API and image base URLs
    pub fn new(
        api_key: String,
        api_url: String,
        image_url: String,
        timeout: Option<Duration>,
    ) -> AppResult<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_url: image_url.trim_end_matches('/').to_string(),
            language: "en-US".to_string(),
            region: "US".to_string(),
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        let provider = Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_url.clone(),
            config.http_timeout_secs.map(Duration::from_secs),
        )?;

        Ok(provider
            .with_language(&config.tmdb_language)
            .with_region(&config.watch_region))
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    /// Region used for age ratings
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = region.to_uppercase();
        self
    }

    /// GET a TMDB path and deserialize the body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("TMDB resource not found: {}", path)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                "Failed to deserialize TMDB response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl SearchSource for TmdbProvider {
    async fn fetch_page(&self, query: &str, page: u32) -> Result<ResultPage, RetrievalError> {
        let url = format!("{}/search/multi", self.api_url);
        let page_param = page.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("query", query),
                ("page", page_param.as_str()),
                ("include_adult", "false"),
            ])
            .send()
            .await
            .map_err(|e| {
                RetrievalError::UpstreamUnavailable(format!("TMDB search request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::UpstreamUnavailable(format!(
                "TMDB search returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await.map_err(|e| {
            RetrievalError::UpstreamUnavailable(format!("Failed to read TMDB response: {}", e))
        })?;

        let raw: RawResultPage = serde_json::from_str(&response_text).map_err(|e| {
            RetrievalError::MalformedResponse(format!("TMDB search body is not valid: {}", e))
        })?;
        let result_page = raw.into_page(page)?;

        tracing::debug!(
            query = %query,
            page = page,
            total_pages = result_page.total_pages,
            results = result_page.results.len(),
            provider = PROVIDER_NAME,
            "Search page fetched"
        );

        Ok(result_page)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn show_details(&self, media_type: MediaType, id: u64) -> AppResult<ShowDetails> {
        let append = match media_type {
            MediaType::Film => "release_dates",
            MediaType::Series => "content_ratings",
        };
        let path = format!("/{}/{}", media_type.path_segment(), id);

        let raw: RawShowDetails = self
            .get_json(
                &path,
                &[
                    ("language", self.language.as_str()),
                    ("append_to_response", append),
                ],
            )
            .await?;

        tracing::info!(
            title_id = id,
            media_type = %media_type,
            provider = PROVIDER_NAME,
            "Details fetched"
        );

        Ok(raw.into_details(media_type, &self.image_url, &self.region))
    }

    async fn watch_providers(
        &self,
        media_type: MediaType,
        id: u64,
        region: &str,
    ) -> AppResult<WatchProviders> {
        let path = format!("/{}/{}/watch/providers", media_type.path_segment(), id);
        let raw: RawWatchProviders = self.get_json(&path, &[]).await?;
        let providers = raw.for_region(region, &self.image_url);

        tracing::info!(
            title_id = id,
            region = %providers.region,
            flatrate = providers.flatrate.len(),
            provider = PROVIDER_NAME,
            "Watch providers fetched"
        );

        Ok(providers)
    }

    async fn recommendations(
        &self,
        media_type: MediaType,
        id: u64,
    ) -> AppResult<Vec<NormalizedItem>> {
        let path = format!("/{}/{}/recommendations", media_type.path_segment(), id);
        let raw: RawResultPage = self
            .get_json(&path, &[("language", self.language.as_str()), ("page", "1")])
            .await?;

        let page = raw.into_page(1)?;
        let items = normalize_records(page.results, Some(media_type))?;

        tracing::info!(
            title_id = id,
            results = items.len(),
            provider = PROVIDER_NAME,
            "Recommendations fetched"
        );

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_provider() -> TmdbProvider {
        TmdbProvider::new(
            "test_key".to_string(),
            "http://test.local/3/".to_string(),
            "http://images.local/t/p/".to_string(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_base_urls_trimmed() {
        let provider = create_test_provider();
        assert_eq!(provider.api_url, "http://test.local/3");
        assert_eq!(provider.image_url, "http://images.local/t/p");
    }

    #[test]
    fn test_builder_overrides() {
        let provider = create_test_provider().with_language("de-DE").with_region("de");
        assert_eq!(provider.language, "de-DE");
        assert_eq!(provider.region, "DE");
        assert_eq!(provider.name(), "tmdb");
    }
}
