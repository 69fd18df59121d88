// Blog post endpoints - list, retrieve, privileged writes

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::listing::{FilterKind, FilterSpec, ListParams, ListingPolicy};
use super::payload::Payload;
use super::{media_context, not_found, route_both};
use crate::app_state::AppState;
use crate::core::ContentKind;
use crate::error::AppResult;
use crate::infrastructure::{ListQuery, Staff};
use crate::models::{BlogPost, BlogPostInput};
use crate::services::projection::project_one;
use crate::services::{ContentRecord, WriteMode};

pub const LISTING: ListingPolicy = ListingPolicy {
    visible_only: true,
    search_fields: &["title", "excerpt", "content"],
    filters: &[
        FilterSpec::new("technology", FilterKind::Technology),
        FilterSpec::new("is_published", FilterKind::Bool),
    ],
    ordering_fields: &["published_date"],
};

pub fn routes() -> Router<AppState> {
    let router = route_both(Router::new(), "/blogs", get(list).post(create));
    route_both(
        router,
        "/blogs/{slug}",
        get(retrieve).put(replace).patch(patch).delete(destroy),
    )
}

async fn find(state: &AppState, slug: &str, visible_only: bool) -> AppResult<BlogPost> {
    let base = if visible_only {
        ListQuery::visible()
    } else {
        ListQuery::all()
    };
    state
        .store
        .blog_posts(&base.filter("slug", slug))
        .await?
        .first()
        .ok_or_else(not_found)
}

async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Value>> {
    let store = state.store.as_ref();
    let listing = LISTING.prepare(store, &params, &state.config.pagination).await?;
    let page = store.blog_posts(&listing.query).await?;
    listing
        .respond(store, page.map(ContentRecord::from), &media_context(&state, &headers))
        .await
}

async fn retrieve(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> AppResult<Json<Value>> {
    let post = find(&state, &slug, true).await?;
    let body = project_one(state.store.as_ref(), post.into(), &media_context(&state, &headers)).await?;
    Ok(Json(body))
}

async fn create(
    State(state): State<AppState>,
    Staff(author): Staff,
    headers: HeaderMap,
    Payload(input): Payload<BlogPostInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let created = state.editor.create_blog_post(&author, input).await?;
    let body = project_one(state.store.as_ref(), created.into(), &media_context(&state, &headers)).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

async fn replace(
    state: State<AppState>,
    _staff: Staff,
    headers: HeaderMap,
    slug: Path<String>,
    Payload(input): Payload<BlogPostInput>,
) -> AppResult<Json<Value>> {
    update(state, headers, slug, input, WriteMode::Replace).await
}

async fn patch(
    state: State<AppState>,
    _staff: Staff,
    headers: HeaderMap,
    slug: Path<String>,
    Payload(input): Payload<BlogPostInput>,
) -> AppResult<Json<Value>> {
    update(state, headers, slug, input, WriteMode::Partial).await
}

async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    input: BlogPostInput,
    mode: WriteMode,
) -> AppResult<Json<Value>> {
    let existing = find(&state, &slug, false).await?;
    let updated = state.editor.update_blog_post(&existing, input, mode).await?;
    let body = project_one(state.store.as_ref(), updated.into(), &media_context(&state, &headers)).await?;
    Ok(Json(body))
}

async fn destroy(
    State(state): State<AppState>,
    _staff: Staff,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    let existing = find(&state, &slug, false).await?;
    state.editor.delete(ContentKind::Blog, existing.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
