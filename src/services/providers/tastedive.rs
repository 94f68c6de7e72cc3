/// TasteDive provider for "people who liked this also liked" suggestions
use crate::{
    error::{AppError, AppResult},
    models::MediaType,
    services::providers::SuggestionProvider,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;

const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
struct SimilarResponse {
    #[serde(alias = "Similar")]
    similar: SimilarBlock,
}

#[derive(Debug, Deserialize)]
struct SimilarBlock {
    #[serde(alias = "Results", default)]
    results: Vec<SimilarResult>,
}

#[derive(Debug, Deserialize)]
struct SimilarResult {
    #[serde(alias = "Name")]
    name: String,
}

#[derive(Clone)]
pub struct TasteDiveProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TasteDiveProvider {
    pub fn new(api_key: String, api_url: String, timeout: Option<Duration>) -> AppResult<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// TasteDive's name for the category
    fn category(media_type: MediaType) -> &'static str {
        match media_type {
            MediaType::Film => "movies",
            MediaType::Series => "shows",
        }
    }
}

#[async_trait::async_trait]
impl SuggestionProvider for TasteDiveProvider {
    async fn similar(&self, title: &str, media_type: MediaType) -> AppResult<Vec<String>> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Suggestion title cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/similar", self.api_url);
        let limit = SUGGESTION_LIMIT.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("q", title),
                ("type", Self::category(media_type)),
                ("limit", limit.as_str()),
                ("info", "1"),
                ("k", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TasteDive API returned status {}: {}",
                status, body
            )));
        }

        let parsed: SimilarResponse = response.json().await?;
        let names: Vec<String> = parsed
            .similar
            .results
            .into_iter()
            .map(|r| r.name)
            .take(SUGGESTION_LIMIT)
            .collect();

        tracing::info!(
            title = %title,
            results = names.len(),
            provider = "tastedive",
            "Suggestions fetched"
        );

        Ok(names)
    }
}
