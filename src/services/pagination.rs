//! Paginated retrieval engine.
//!
//! Owns one search session's state: the query, the accumulated normalized
//! results, the next page to request and the loading / "more available" flags.
//! Pages are fetched one at a time and only on request.
//!
//! Every reset bumps the state's generation. A fetch remembers the generation
//! it started under and its result is dropped if the state was reset while the
//! request was outstanding.
//!
//! There is no timeout here: a request that never completes keeps the engine
//! loading and further fetches are skipped. Bound upstream calls with
//! `HTTP_TIMEOUT_SECS` if that matters.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    error::{RetrievalError, RetrievalErrorKind},
    models::{normalize_records, NormalizedItem},
    services::providers::SearchSource,
};

const FIRST_PAGE: u32 = 1;

/// Mutable state of one retrieval session
#[derive(Debug, Clone)]
struct RetrievalState {
    query: String,
    generation: u64,
    items: Vec<NormalizedItem>,
    next_page: u32,
    more_available: bool,
    in_flight: bool,
    last_error: Option<RetrievalErrorKind>,
}

impl RetrievalState {
    fn fresh(query: String, generation: u64) -> Self {
        Self {
            query,
            generation,
            items: Vec::new(),
            next_page: FIRST_PAGE,
            more_available: true,
            in_flight: false,
            last_error: None,
        }
    }
}

/// What a caller sees of the engine
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RetrievalSnapshot {
    pub query: String,
    pub generation: u64,
    pub items: Vec<NormalizedItem>,
    pub next_page: u32,
    pub more_available: bool,
    pub loading: bool,
    /// Kind of the most recent failed fetch, cleared by the next success
    pub last_error: Option<RetrievalErrorKind>,
}

/// Result of one fetch request
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// Nothing to do: a fetch is in flight, no pages are left, or the query
    /// did not change
    Skipped,
    /// A page was normalized and appended
    Appended { page: u32, items: usize },
    /// The page was abandoned; state is unchanged apart from the loading flag
    Failed { kind: RetrievalErrorKind },
    /// The state was reset while the request was outstanding
    Stale,
}

/// Identifies the request a fetch belongs to
#[derive(Debug)]
struct FetchTicket {
    generation: u64,
    query: String,
    page: u32,
}

pub struct PaginatedSearch {
    source: Arc<dyn SearchSource>,
    state: Mutex<RetrievalState>,
}

impl PaginatedSearch {
    /// Creates an engine with no query. Call [`PaginatedSearch::initialize`] to start.
    pub fn new(source: Arc<dyn SearchSource>) -> Self {
        Self {
            source,
            state: Mutex::new(RetrievalState::fresh(String::new(), 0)),
        }
    }

    /// Discards all accumulated state, starts a new generation for `query`
    /// and fetches its first page.
    ///
    /// The query is not validated; blank queries are the caller's concern.
    pub async fn initialize(&self, query: &str) -> FetchOutcome {
        {
            let mut state = self.state.lock().await;
            let generation = state.generation + 1;
            *state = RetrievalState::fresh(query.to_string(), generation);

            tracing::info!(query = %query, generation = generation, "Retrieval state reset");
        }

        self.fetch_next_page().await
    }

    /// Re-initializes only if `query` differs from the current one
    pub async fn set_query(&self, query: &str) -> FetchOutcome {
        let unchanged = {
            let state = self.state.lock().await;
            state.generation > 0 && state.query == query
        };

        if unchanged {
            return FetchOutcome::Skipped;
        }

        self.initialize(query).await
    }

    /// Fetches, normalizes and appends the next page.
    ///
    /// A no-op while another fetch is in flight or once the last page has been
    /// seen. Failures are logged and recorded on the state; they never reach
    /// the caller as errors and are not retried.
    pub async fn fetch_next_page(&self) -> FetchOutcome {
        let ticket = {
            let mut state = self.state.lock().await;
            if state.in_flight || !state.more_available {
                tracing::debug!(
                    query = %state.query,
                    in_flight = state.in_flight,
                    more_available = state.more_available,
                    "Fetch skipped"
                );
                return FetchOutcome::Skipped;
            }

            state.in_flight = true;
            FetchTicket {
                generation: state.generation,
                query: state.query.clone(),
                page: state.next_page,
            }
        };

        let result = self.load_page(&ticket).await;

        let mut state = self.state.lock().await;
        if state.generation != ticket.generation {
            tracing::debug!(
                query = %ticket.query,
                page = ticket.page,
                stale_generation = ticket.generation,
                current_generation = state.generation,
                "Discarding page from a superseded query"
            );
            return FetchOutcome::Stale;
        }

        state.in_flight = false;

        match result {
            Ok((items, total_pages)) => {
                let count = items.len();
                state.items.extend(items);
                state.more_available = ticket.page < total_pages;
                state.next_page = ticket.page + 1;
                state.last_error = None;

                tracing::info!(
                    query = %ticket.query,
                    page = ticket.page,
                    total_pages = total_pages,
                    appended = count,
                    accumulated = state.items.len(),
                    "Search page appended"
                );

                FetchOutcome::Appended {
                    page: ticket.page,
                    items: count,
                }
            }
            Err(e) => {
                let kind = e.kind();
                tracing::error!(
                    error = %e,
                    kind = ?kind,
                    query = %ticket.query,
                    page = ticket.page,
                    source = self.source.name(),
                    "Error fetching next page of results"
                );
                state.last_error = Some(kind);

                FetchOutcome::Failed { kind }
            }
        }
    }

    /// Current state as seen by the caller
    pub async fn snapshot(&self) -> RetrievalSnapshot {
        let state = self.state.lock().await;
        RetrievalSnapshot {
            query: state.query.clone(),
            generation: state.generation,
            items: state.items.clone(),
            next_page: state.next_page,
            more_available: state.more_available,
            loading: state.in_flight,
            last_error: state.last_error,
        }
    }

    /// Requests and normalizes one page. The whole page fails if any record does.
    async fn load_page(
        &self,
        ticket: &FetchTicket,
    ) -> Result<(Vec<NormalizedItem>, u32), RetrievalError> {
        let page = self.source.fetch_page(&ticket.query, ticket.page).await?;
        let total_pages = page.total_pages;
        let items = normalize_records(page.results, None)?;
        Ok((items, total_pages))
    }
}
