use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    db::{create_redis_client, RedisQueueStore},
    services::{
        providers::{
            MetadataProvider, SearchSource, SuggestionProvider, TasteDiveProvider, TmdbProvider,
        },
        InMemoryQueueStore, QueueStore, SearchSessions,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: SearchSessions,
    pub metadata: Arc<dyn MetadataProvider>,
    /// `None` when no TasteDive key is configured
    pub suggestions: Option<Arc<dyn SuggestionProvider>>,
    pub queue: Arc<dyn QueueStore>,
    /// Region used when a providers request names none
    pub default_region: String,
}

impl AppState {
    pub fn new(
        search: Arc<dyn SearchSource>,
        metadata: Arc<dyn MetadataProvider>,
        suggestions: Option<Arc<dyn SuggestionProvider>>,
        queue: Arc<dyn QueueStore>,
        default_region: &str,
    ) -> Self {
        Self {
            sessions: SearchSessions::new(search),
            metadata,
            suggestions,
            queue,
            default_region: default_region.to_uppercase(),
        }
    }

    /// Wires up the real providers and queue backend and starts the idle
    /// session sweep, so it must run inside a Tokio runtime
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let tmdb = Arc::new(TmdbProvider::from_config(config)?);

        let suggestions: Option<Arc<dyn SuggestionProvider>> = match &config.tastedive_api_key {
            Some(key) if !key.trim().is_empty() => Some(Arc::new(TasteDiveProvider::new(
                key.clone(),
                config.tastedive_api_url.clone(),
                config.http_timeout_secs.map(Duration::from_secs),
            )?)),
            _ => {
                tracing::warn!("TASTEDIVE_API_KEY not set, suggestions disabled");
                None
            }
        };

        let queue: Arc<dyn QueueStore> = match &config.redis_url {
            Some(url) => Arc::new(RedisQueueStore::new(create_redis_client(url)?)),
            None => Arc::new(InMemoryQueueStore::new()),
        };
        tracing::info!(backend = queue.name(), "Watch queue store ready");

        let mut state = Self::new(
            tmdb.clone(),
            tmdb,
            suggestions,
            queue,
            &config.watch_region,
        );
        state.sessions = state
            .sessions
            .with_idle_timeout(Duration::from_secs(config.session_idle_secs));
        state.sessions.spawn_idle_sweep();
        tracing::info!(idle_secs = config.session_idle_secs, "Search session sweep started");

        Ok(state)
    }
}
