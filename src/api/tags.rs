// Tag endpoints - vocabulary listing and tag browsing by kind

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::debug;

use super::{media_context, route_both};
use crate::app_state::AppState;
use crate::core::TagSelector;
use crate::error::{AppError, AppResult};
use crate::models::Tag;
use crate::services::projection::project_all;
use crate::services::ProjectionLevel;

pub fn routes() -> Router<AppState> {
    let router = route_both(Router::new(), "/tags", get(list_tags));
    route_both(router, "/tags/{tag_slug}/{kind}", get(browse))
}

async fn list_tags(State(state): State<AppState>) -> AppResult<Json<Vec<Tag>>> {
    Ok(Json(state.store.list_tags().await?))
}

/// Full projections of every entity of `kind` carrying the tag.
/// Unknown kinds yield an empty list; an unknown tag under a known kind is 404.
async fn browse(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((tag_slug, kind)): Path<(String, String)>,
) -> AppResult<Json<Value>> {
    let selector = TagSelector::parse(&kind);
    if selector == TagSelector::Empty {
        debug!(tag = %tag_slug, kind = %kind, "Tag browse for unsupported kind");
        return Ok(Json(json!([])));
    }

    if state.store.tag_by_slug(&tag_slug).await?.is_none() {
        return Err(AppError::NotFound(format!("Tag '{}' not found.", tag_slug)));
    }

    let records = state.resolver.tagged(&tag_slug, selector).await?;
    let projected = project_all(
        state.store.as_ref(),
        records,
        ProjectionLevel::Full,
        &media_context(&state, &headers),
    )
    .await?;
    Ok(Json(Value::Array(projected)))
}
