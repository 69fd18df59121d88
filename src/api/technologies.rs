// Technology endpoints - list, retrieve with minimal children, privileged writes

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::listing::{FilterKind, FilterSpec, ListParams, ListingPolicy};
use super::payload::Payload;
use super::{media_context, not_found, route_both, with_fields};
use crate::app_state::AppState;
use crate::core::ContentKind;
use crate::error::AppResult;
use crate::infrastructure::{ListQuery, Staff};
use crate::models::{Technology, TechnologyInput};
use crate::services::projection::{project_all, project_one};
use crate::services::{ContentRecord, ProjectionLevel, WriteMode};

pub const LISTING: ListingPolicy = ListingPolicy {
    visible_only: true,
    search_fields: &["name", "description"],
    filters: &[FilterSpec::new("is_active", FilterKind::Bool)],
    ordering_fields: &["name", "created_at"],
};

pub fn routes() -> Router<AppState> {
    let router = route_both(Router::new(), "/technologies", get(list).post(create));
    route_both(
        router,
        "/technologies/{slug}",
        get(retrieve).put(replace).patch(patch).delete(destroy),
    )
}

async fn find(state: &AppState, slug: &str, visible_only: bool) -> AppResult<Technology> {
    let base = if visible_only {
        ListQuery::visible()
    } else {
        ListQuery::all()
    };
    state
        .store
        .technologies(&base.filter("slug", slug))
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
    let page = store.technologies(&listing.query).await?;
    listing
        .respond(store, page.map(ContentRecord::from), &media_context(&state, &headers))
        .await
}

/// Full technology plus minimal projections of its visible tutorials, blog posts and snippets.
async fn retrieve(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> AppResult<Json<Value>> {
    let store = state.store.as_ref();
    let media = media_context(&state, &headers);
    let technology = find(&state, &slug, true).await?;
    let children = state.resolver.technology_children(&technology).await?;

    let tutorials = project_all(
        store,
        children.tutorials.into_iter().map(ContentRecord::from).collect(),
        ProjectionLevel::Minimal,
        &media,
    )
    .await?;
    let blog_posts = project_all(
        store,
        children.blog_posts.into_iter().map(ContentRecord::from).collect(),
        ProjectionLevel::Minimal,
        &media,
    )
    .await?;
    let code_snippets = project_all(
        store,
        children.code_snippets.into_iter().map(ContentRecord::from).collect(),
        ProjectionLevel::Minimal,
        &media,
    )
    .await?;

    let body = project_one(store, technology.into(), &media).await?;
    Ok(Json(with_fields(
        body,
        vec![
            ("tutorials", Value::Array(tutorials)),
            ("blog_posts", Value::Array(blog_posts)),
            ("code_snippets", Value::Array(code_snippets)),
        ],
    )))
}

async fn create(
    State(state): State<AppState>,
    _staff: Staff,
    headers: HeaderMap,
    Payload(input): Payload<TechnologyInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let created = state.editor.create_technology(input).await?;
    let body = project_one(state.store.as_ref(), created.into(), &media_context(&state, &headers)).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

async fn replace(
    state: State<AppState>,
    _staff: Staff,
    headers: HeaderMap,
    slug: Path<String>,
    Payload(input): Payload<TechnologyInput>,
) -> AppResult<Json<Value>> {
    update(state, headers, slug, input, WriteMode::Replace).await
}

async fn patch(
    state: State<AppState>,
    _staff: Staff,
    headers: HeaderMap,
    slug: Path<String>,
    Payload(input): Payload<TechnologyInput>,
) -> AppResult<Json<Value>> {
    update(state, headers, slug, input, WriteMode::Partial).await
}

async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    input: TechnologyInput,
    mode: WriteMode,
) -> AppResult<Json<Value>> {
    let existing = find(&state, &slug, false).await?;
    let updated = state.editor.update_technology(&existing, input, mode).await?;
    let body = project_one(state.store.as_ref(), updated.into(), &media_context(&state, &headers)).await?;
    Ok(Json(body))
}

async fn destroy(
    State(state): State<AppState>,
    _staff: Staff,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    let existing = find(&state, &slug, false).await?;
    state.editor.delete(ContentKind::Technology, existing.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
