// Code snippet endpoints - list, retrieve, privileged writes

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
use crate::models::{CodeSnippet, CodeSnippetInput};
use crate::services::projection::project_one;
use crate::services::{ContentRecord, WriteMode};

const LANGUAGES: &[&str] = &[
    "python",
    "javascript",
    "java",
    "csharp",
    "go",
    "ruby",
    "php",
    "html",
    "css",
    "sql",
];

pub const LISTING: ListingPolicy = ListingPolicy {
    visible_only: true,
    search_fields: &["title", "description", "code"],
    filters: &[
        FilterSpec::new("technology", FilterKind::Technology),
        FilterSpec::new("language", FilterKind::Choice(LANGUAGES)),
        FilterSpec::new("is_public", FilterKind::Bool),
    ],
    ordering_fields: &["created_at"],
};

pub fn routes() -> Router<AppState> {
    let router = route_both(Router::new(), "/snippets", get(list).post(create));
    route_both(
        router,
        "/snippets/{slug}",
        get(retrieve).put(replace).patch(patch).delete(destroy),
    )
}

async fn find(state: &AppState, slug: &str, visible_only: bool) -> AppResult<CodeSnippet> {
    let base = if visible_only {
        ListQuery::visible()
    } else {
        ListQuery::all()
    };
    state
        .store
        .code_snippets(&base.filter("slug", slug))
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
    let page = store.code_snippets(&listing.query).await?;
    listing
        .respond(store, page.map(ContentRecord::from), &media_context(&state, &headers))
        .await
}

async fn retrieve(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> AppResult<Json<Value>> {
    let snippet = find(&state, &slug, true).await?;
    let body = project_one(state.store.as_ref(), snippet.into(), &media_context(&state, &headers)).await?;
    Ok(Json(body))
}

async fn create(
    State(state): State<AppState>,
    Staff(author): Staff,
    headers: HeaderMap,
    Payload(input): Payload<CodeSnippetInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let created = state.editor.create_code_snippet(&author, input).await?;
    let body = project_one(state.store.as_ref(), created.into(), &media_context(&state, &headers)).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

async fn replace(
    state: State<AppState>,
    _staff: Staff,
    headers: HeaderMap,
    slug: Path<String>,
    Payload(input): Payload<CodeSnippetInput>,
) -> AppResult<Json<Value>> {
    update(state, headers, slug, input, WriteMode::Replace).await
}

async fn patch(
    state: State<AppState>,
    _staff: Staff,
    headers: HeaderMap,
    slug: Path<String>,
    Payload(input): Payload<CodeSnippetInput>,
) -> AppResult<Json<Value>> {
    update(state, headers, slug, input, WriteMode::Partial).await
}

async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    input: CodeSnippetInput,
    mode: WriteMode,
) -> AppResult<Json<Value>> {
    let existing = find(&state, &slug, false).await?;
    let updated = state.editor.update_code_snippet(&existing, input, mode).await?;
    let body = project_one(state.store.as_ref(), updated.into(), &media_context(&state, &headers)).await?;
    Ok(Json(body))
}

async fn destroy(
    State(state): State<AppState>,
    _staff: Staff,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    let existing = find(&state, &slug, false).await?;
    state.editor.delete(ContentKind::Snippet, existing.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
