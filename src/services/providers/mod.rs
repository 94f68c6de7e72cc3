use crate::{
    error::{AppResult, RetrievalError},
    models::{MediaType, NormalizedItem, ResultPage, ShowDetails, WatchProviders},
};

/// Upstream data providers
///
/// TMDB supplies search pages, details, watch providers and recommendations.
/// TasteDive supplies similar-title names. Each concern sits behind its own
/// trait so handlers and the retrieval engine can be tested without HTTP.
pub mod tastedive;
pub mod tmdb;

pub use tastedive::TasteDiveProvider;
pub use tmdb::TmdbProvider;

/// Source of search result pages for the retrieval engine
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchSource: Send + Sync {
    /// Fetch one page of raw search results.
    ///
    /// Failures are already classified; the engine decides what to do with them.
    async fn fetch_page(&self, query: &str, page: u32) -> Result<ResultPage, RetrievalError>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Lookups for a single, already identified title
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn show_details(&self, media_type: MediaType, id: u64) -> AppResult<ShowDetails>;

    /// Watch providers for one region (ISO 3166-1 code)
    async fn watch_providers(
        &self,
        media_type: MediaType,
        id: u64,
        region: &str,
    ) -> AppResult<WatchProviders>;

    /// Titles the metadata API considers similar, normalized
    async fn recommendations(
        &self,
        media_type: MediaType,
        id: u64,
    ) -> AppResult<Vec<NormalizedItem>>;
}

/// Similar-title names from the recommendation API
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn similar(&self, title: &str, media_type: MediaType) -> AppResult<Vec<String>>;
}
