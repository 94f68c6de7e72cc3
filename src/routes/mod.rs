use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod queue;
pub mod search;
pub mod shows;
pub mod state;
pub mod suggestions;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Paginated search sessions
        .route("/search/sessions", post(search::create_session))
        .route(
            "/search/sessions/:id",
            get(search::get_session).delete(search::delete_session),
        )
        .route("/search/sessions/:id/next", post(search::next_page))
        .route("/search/sessions/:id/query", put(search::change_query))
        // Title lookups
        .route("/shows/:media_type/:id", get(shows::details))
        .route("/shows/:media_type/:id/providers", get(shows::watch_providers))
        .route(
            "/shows/:media_type/:id/recommendations",
            get(shows::recommendations),
        )
        .route("/suggestions", get(suggestions::similar))
        // Watch queue
        .route(
            "/queue",
            get(queue::list).post(queue::add).delete(queue::clear),
        )
        .route("/queue/:id", axum::routing::delete(queue::remove))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
