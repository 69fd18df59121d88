// HTTP API - axum router over the content resolver, projections and editor

pub mod blogs;
pub mod listing;
pub mod payload;
pub mod quizzes;
pub mod snippets;
pub mod tags;
pub mod technologies;
pub mod topics;
pub mod tutorials;

use axum::{
    http::{header, HeaderMap},
    middleware,
    routing::{get, MethodRouter},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::app_state::AppState;
use crate::error::AppError;
use crate::infrastructure::viewer_context_middleware;
use crate::services::MediaContext;

/// Full application router: content API behind the viewer middleware, static media, tracing and CORS.
pub fn create_content_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .merge(technologies::routes())
        .merge(tutorials::routes())
        .merge(topics::routes())
        .merge(blogs::routes())
        .merge(snippets::routes())
        .merge(quizzes::routes())
        .merge(tags::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            viewer_context_middleware,
        ))
        .with_state(state.clone());

    let media = ServeDir::new(&state.config.media.root);
    let media_prefix = state.config.media.url_path.trim_matches('/');
    let router = if media_prefix.is_empty() {
        api.fallback_service(media)
    } else {
        api.nest_service(&format!("/{}", media_prefix), media)
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Register `path` with and without a trailing slash.
pub(crate) fn route_both(
    router: Router<AppState>,
    path: &str,
    method_router: MethodRouter<AppState>,
) -> Router<AppState> {
    router
        .route(path, method_router.clone())
        .route(&format!("{}/", path), method_router)
}

pub(crate) fn media_context(state: &AppState, headers: &HeaderMap) -> MediaContext {
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok());
    MediaContext::for_request(host, proto, &state.config.media)
}

pub(crate) fn not_found() -> AppError {
    AppError::NotFound("Not found.".to_string())
}

/// Numeric primary key from a path segment; anything else cannot match a row.
pub(crate) fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim().parse::<i64>().map_err(|_| not_found())
}

/// Add extra keys to a projected object.
pub(crate) fn with_fields(mut body: Value, fields: Vec<(&str, Value)>) -> Value {
    if let Value::Object(map) = &mut body {
        for (key, value) in fields {
            map.insert(key.to_string(), value);
        }
    }
    body
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "techlearn" }))
}
