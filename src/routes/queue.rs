use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{NewQueueEntry, QueueEntry},
    routes::AppState,
};

/// Handler listing the watch queue, oldest first
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<QueueEntry>>> {
    let entries = state.queue.list().await?;
    Ok(Json(entries))
}

/// Handler adding a title to the queue; an already queued id is replaced
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<NewQueueEntry>,
) -> AppResult<(StatusCode, Json<QueueEntry>)> {
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Queue entry title cannot be empty".to_string(),
        ));
    }

    let entry = request.into_entry(Utc::now());
    state.queue.insert(entry.clone()).await?;

    tracing::info!(
        title_id = entry.id,
        title = %entry.title,
        store = state.queue.name(),
        "Title queued"
    );

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<u64>) -> AppResult<StatusCode> {
    if state.queue.remove(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Title {} is not queued", id)))
    }
}

pub async fn clear(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.queue.clear().await?;
    tracing::info!(store = state.queue.name(), "Watch queue cleared");
    Ok(StatusCode::NO_CONTENT)
}
