use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::MediaType,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    pub title: String,
    #[serde(default)]
    pub media_type: Option<MediaType>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub title: String,
    pub suggestions: Vec<String>,
}

/// Handler for similar-title suggestions.
///
/// Upstream failures show up as an empty list rather than an error.
pub async fn similar(
    State(state): State<AppState>,
    Query(params): Query<SuggestionQuery>,
) -> AppResult<Json<SuggestionsResponse>> {
    let title = params.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::InvalidInput(
            "Suggestion title cannot be empty".to_string(),
        ));
    }
    let media_type = params.media_type.unwrap_or(MediaType::Film);

    let suggestions = match &state.suggestions {
        Some(provider) => match provider.similar(&title, media_type).await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(error = %e, title = %title, "No suggestions for title");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    Ok(Json(SuggestionsResponse { title, suggestions }))
}
