use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    routes::AppState,
    services::{FetchOutcome, RetrievalSnapshot},
};

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    /// Blank queries are rejected here; the engine does not check them
    fn validated(&self) -> AppResult<&str> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }
        Ok(query)
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    /// What the triggering request did, absent for plain reads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_fetch: Option<FetchOutcome>,
    #[serde(flatten)]
    pub snapshot: RetrievalSnapshot,
}

/// Handler for creating a search session
pub async fn create_session(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<QueryRequest>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    let query = request.validated()?;
    tracing::info!(request_id = %request_id, query = %query, "Search session requested");

    let (session_id, snapshot) = state.sessions.create(query).await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            last_fetch: None,
            snapshot,
        }),
    ))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let snapshot = state.sessions.snapshot(session_id).await?;
    Ok(Json(SessionResponse {
        session_id,
        last_fetch: None,
        snapshot,
    }))
}

/// Handler for loading the next page of a session
pub async fn next_page(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let (outcome, snapshot) = state.sessions.next_page(session_id).await?;

    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        outcome = ?outcome,
        accumulated = snapshot.items.len(),
        "Next page requested"
    );

    Ok(Json(SessionResponse {
        session_id,
        last_fetch: Some(outcome),
        snapshot,
    }))
}

/// Handler for switching a session to another query
pub async fn change_query(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<QueryRequest>,
) -> AppResult<Json<SessionResponse>> {
    let query = request.validated()?;
    let (outcome, snapshot) = state.sessions.change_query(session_id, query).await?;

    Ok(Json(SessionResponse {
        session_id,
        last_fetch: Some(outcome),
        snapshot,
    }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.remove(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
