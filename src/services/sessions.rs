use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{
    sync::RwLock,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    services::{
        pagination::{FetchOutcome, PaginatedSearch, RetrievalSnapshot},
        providers::SearchSource,
    },
};

const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60);
const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(10);

struct Session {
    engine: Arc<PaginatedSearch>,
    last_touched: Instant,
}

impl Session {
    fn new(engine: Arc<PaginatedSearch>) -> Self {
        Self {
            engine,
            last_touched: Instant::now(),
        }
    }
}

/// Registry of live search sessions, each owning one retrieval engine.
///
/// Sessions nobody touched for the idle timeout are dropped by
/// [`SearchSessions::evict_idle`], normally driven by
/// [`SearchSessions::spawn_idle_sweep`].
#[derive(Clone)]
pub struct SearchSessions {
    source: Arc<dyn SearchSource>,
    idle_timeout: Duration,
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SearchSessions {
    pub fn new(source: Arc<dyn SearchSource>) -> Self {
        Self {
            source,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Starts a session for `query` and loads its first page
    pub async fn create(&self, query: &str) -> AppResult<(Uuid, RetrievalSnapshot)> {
        let id = Uuid::new_v4();
        let engine = Arc::new(PaginatedSearch::new(self.source.clone()));

        self.sessions
            .write()
            .await
            .insert(id, Session::new(engine.clone()));
        tracing::info!(session_id = %id, query = %query, "Search session created");

        let query = query.to_string();
        let outcome = Self::run_detached(engine.clone(), move |engine| async move {
            engine.initialize(&query).await
        })
        .await?;
        tracing::debug!(session_id = %id, outcome = ?outcome, "First page requested");

        Ok((id, engine.snapshot().await))
    }

    pub async fn snapshot(&self, id: Uuid) -> AppResult<RetrievalSnapshot> {
        let engine = self.engine(id).await?;
        Ok(engine.snapshot().await)
    }

    /// Requests the next page of a session
    pub async fn next_page(&self, id: Uuid) -> AppResult<(FetchOutcome, RetrievalSnapshot)> {
        let engine = self.engine(id).await?;
        let outcome = Self::run_detached(engine.clone(), |engine| async move {
            engine.fetch_next_page().await
        })
        .await?;

        Ok((outcome, engine.snapshot().await))
    }

    /// Switches a session to a new query; an unchanged query keeps its results
    pub async fn change_query(
        &self,
        id: Uuid,
        query: &str,
    ) -> AppResult<(FetchOutcome, RetrievalSnapshot)> {
        let engine = self.engine(id).await?;
        let query = query.to_string();
        let outcome = Self::run_detached(engine.clone(), move |engine| async move {
            engine.set_query(&query).await
        })
        .await?;

        Ok((outcome, engine.snapshot().await))
    }

    /// Drops a session; an outstanding fetch for it finishes against the
    /// detached engine and is then discarded
    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                tracing::info!(session_id = %id, "Search session removed");
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Search session {} not found", id))),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops every session idle for longer than the idle timeout
    pub async fn evict_idle(&self) -> usize {
        match Instant::now().checked_sub(self.idle_timeout) {
            Some(cutoff) => self.evict_untouched_since(cutoff).await,
            None => 0,
        }
    }

    async fn evict_untouched_since(&self, cutoff: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_touched >= cutoff);

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(
                evicted = evicted,
                remaining = sessions.len(),
                "Idle search sessions evicted"
            );
        }
        evicted
    }

    /// Starts a background task that periodically calls
    /// [`SearchSessions::evict_idle`]. Must be called inside a Tokio runtime.
    pub fn spawn_idle_sweep(&self) -> JoinHandle<()> {
        let sessions = self.clone();
        let period = self
            .idle_timeout
            .min(MAX_SWEEP_PERIOD)
            .max(MIN_SWEEP_PERIOD);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                sessions.evict_idle().await;
            }
        })
    }

    /// Looks up a session and marks it as touched
    async fn engine(&self, id: Uuid) -> AppResult<Arc<PaginatedSearch>> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Search session {} not found", id)))?;
        session.last_touched = Instant::now();
        Ok(session.engine.clone())
    }

    /// Runs an engine operation on its own task.
    ///
    /// A dropped HTTP request must not abandon a fetch halfway, which would
    /// leave the engine marked as loading for good.
    async fn run_detached<F, Fut>(engine: Arc<PaginatedSearch>, op: F) -> AppResult<FetchOutcome>
    where
        F: FnOnce(Arc<PaginatedSearch>) -> Fut,
        Fut: std::future::Future<Output = FetchOutcome> + Send + 'static,
    {
        tokio::spawn(op(engine))
            .await
            .map_err(|e| AppError::Internal(format!("Search task failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::RetrievalError, models::ResultPage, services::providers::MockSearchSource};
    use serde_json::json;

    fn one_page(query: &str, page: u32) -> ResultPage {
        ResultPage {
            page,
            results: vec![json!({"id": page, "media_type": "movie", "title": query})],
            total_pages: 2,
            total_results: 2,
        }
    }

    fn create_sessions() -> SearchSessions {
        let mut mock = MockSearchSource::new();
        mock.expect_name().return_const("mock");
        mock.expect_fetch_page()
            .returning(|query, page| Ok(one_page(query, page)));
        SearchSessions::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_create_loads_first_page() {
        let sessions = create_sessions();
        let (id, snapshot) = sessions.create("dune").await.unwrap();

        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.query, "dune");
        assert_eq!(sessions.snapshot(id).await.unwrap(), snapshot);
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let sessions = create_sessions();
        let (first, _) = sessions.create("dune").await.unwrap();
        let (second, _) = sessions.create("arrival").await.unwrap();

        sessions.next_page(first).await.unwrap();

        assert_eq!(sessions.snapshot(first).await.unwrap().items.len(), 2);
        assert_eq!(sessions.snapshot(second).await.unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn test_next_page_until_exhausted() {
        let sessions = create_sessions();
        let (id, _) = sessions.create("dune").await.unwrap();

        let (outcome, snapshot) = sessions.next_page(id).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Appended { page: 2, items: 1 });
        assert!(!snapshot.more_available);

        let (outcome, _) = sessions.next_page(id).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_change_query() {
        let sessions = create_sessions();
        let (id, _) = sessions.create("batman").await.unwrap();

        let (outcome, snapshot) = sessions.change_query(id, "superman").await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Appended { .. }));
        assert_eq!(snapshot.items[0].title, "superman");
        assert_eq!(snapshot.items.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_and_removed_sessions() {
        let sessions = create_sessions();
        let missing = Uuid::new_v4();
        assert!(matches!(
            sessions.snapshot(missing).await,
            Err(AppError::NotFound(_))
        ));

        let (id, _) = sessions.create("dune").await.unwrap();
        sessions.remove(id).await.unwrap();
        assert!(sessions.is_empty().await);
        assert!(matches!(sessions.next_page(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(sessions.remove(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_first_page_still_creates_session() {
        let mut mock = MockSearchSource::new();
        mock.expect_name().return_const("mock");
        mock.expect_fetch_page().returning(|_, _| {
            Err(RetrievalError::UpstreamUnavailable("connection refused".to_string()))
        });
        let sessions = SearchSessions::new(Arc::new(mock));

        let (id, snapshot) = sessions.create("dune").await.unwrap();
        assert!(snapshot.items.is_empty());
        assert!(!snapshot.loading);
        assert!(snapshot.last_error.is_some());
        assert!(sessions.snapshot(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_untouched_sessions_are_evicted() {
        let sessions = create_sessions();
        let (idle, _) = sessions.create("dune").await.unwrap();
        let (active, _) = sessions.create("arrival").await.unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        let cutoff = Instant::now();
        tokio::time::sleep(Duration::from_millis(5)).await;
        sessions.snapshot(active).await.unwrap();

        assert_eq!(sessions.evict_untouched_since(cutoff).await, 1);
        assert!(matches!(sessions.snapshot(idle).await, Err(AppError::NotFound(_))));
        assert!(sessions.snapshot(active).await.is_ok());
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_evict_idle_keeps_fresh_sessions() {
        let sessions = create_sessions();
        sessions.create("dune").await.unwrap();

        assert_eq!(sessions.evict_idle().await, 0);
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_idle_sweep_drops_abandoned_sessions() {
        let sessions = create_sessions().with_idle_timeout(Duration::from_millis(20));
        let (id, _) = sessions.create("dune").await.unwrap();

        let sweep = sessions.spawn_idle_sweep();
        tokio::time::sleep(Duration::from_millis(250)).await;
        sweep.abort();

        assert!(sessions.is_empty().await);
        assert!(matches!(sessions.next_page(id).await, Err(AppError::NotFound(_))));
    }
}
