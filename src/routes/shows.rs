use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{MediaType, NormalizedItem, ShowDetails, WatchProviders},
    routes::AppState,
};

/// `/shows/{media_type}/{id}`: media type first, then the TMDB id
#[derive(Debug, Deserialize)]
pub struct ShowPath {
    media_type: String,
    id: u64,
}

impl ShowPath {
    fn media_type(&self) -> AppResult<MediaType> {
        MediaType::from_upstream(&self.media_type).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Unknown media type '{}', expected movie or tv",
                self.media_type
            ))
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RegionQuery {
    region: Option<String>,
}

/// Handler for title details
pub async fn details(
    State(state): State<AppState>,
    Path(path): Path<ShowPath>,
) -> AppResult<Json<ShowDetails>> {
    let media_type = path.media_type()?;
    let details = state.metadata.show_details(media_type, path.id).await?;
    Ok(Json(details))
}

/// Handler for watch providers of a title in one region
pub async fn watch_providers(
    State(state): State<AppState>,
    Path(path): Path<ShowPath>,
    Query(params): Query<RegionQuery>,
) -> AppResult<Json<WatchProviders>> {
    let media_type = path.media_type()?;
    let region = params
        .region
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| state.default_region.clone());

    let providers = state
        .metadata
        .watch_providers(media_type, path.id, &region)
        .await?;
    Ok(Json(providers))
}

/// Handler for titles similar to the given one
pub async fn recommendations(
    State(state): State<AppState>,
    Path(path): Path<ShowPath>,
) -> AppResult<Json<Vec<NormalizedItem>>> {
    let media_type = path.media_type()?;
    let items = state.metadata.recommendations(media_type, path.id).await?;
    Ok(Json(items))
}
