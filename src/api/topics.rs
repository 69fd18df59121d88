// Topic endpoints - list, retrieve with quiz questions, privileged writes
// Topic slugs are only unique per tutorial; `?tutorial=<slug>` picks the tutorial.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use super::listing::{FilterKind, FilterSpec, ListParams, ListingPolicy};
use super::payload::Payload;
use super::{media_context, not_found, route_both, with_fields};
use crate::app_state::AppState;
use crate::core::ContentKind;
use crate::error::AppResult;
use crate::infrastructure::{ListQuery, OrderTerm, Staff};
use crate::models::{Topic, TopicInput};
use crate::services::projection::{project_one, question_full};
use crate::services::{ContentRecord, WriteMode};

pub const LISTING: ListingPolicy = ListingPolicy {
    visible_only: false,
    search_fields: &["title", "content"],
    filters: &[
        FilterSpec::new("tutorial", FilterKind::Tutorial),
        FilterSpec::new("is_free", FilterKind::Bool),
    ],
    ordering_fields: &[],
};

#[derive(Debug, Default, Deserialize)]
pub struct TopicLookup {
    pub tutorial: Option<String>,
}

pub fn routes() -> Router<AppState> {
    let router = route_both(Router::new(), "/topics", get(list).post(create));
    route_both(
        router,
        "/topics/{slug}",
        get(retrieve).put(replace).patch(patch).delete(destroy),
    )
}

/// Topic by slug, scoped to a tutorial when one is named, otherwise the oldest match.
async fn find(state: &AppState, slug: &str, lookup: &TopicLookup) -> AppResult<Topic> {
    let mut query = ListQuery::all()
        .filter("slug", slug)
        .order_by(vec![OrderTerm::asc("id")]);
    if let Some(tutorial) = lookup.tutorial.as_deref().filter(|t| !t.is_empty()) {
        query = query.filter("tutorial", tutorial);
    }
    state
        .store
        .topics(&query.window(1, 0))
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
    let page = store.topics(&listing.query).await?;
    listing
        .respond(store, page.map(ContentRecord::from), &media_context(&state, &headers))
        .await
}

/// Full topic plus its quiz questions with nested answers.
async fn retrieve(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Query(lookup): Query<TopicLookup>,
) -> AppResult<Json<Value>> {
    let topic = find(&state, &slug, &lookup).await?;
    let questions = state.resolver.topic_questions(&topic).await?;
    let questions: Vec<Value> = questions.iter().map(question_full).collect();

    let body = project_one(state.store.as_ref(), topic.into(), &media_context(&state, &headers)).await?;
    Ok(Json(with_fields(body, vec![("questions", Value::Array(questions))])))
}

async fn create(
    State(state): State<AppState>,
    _staff: Staff,
    headers: HeaderMap,
    Payload(input): Payload<TopicInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let created = state.editor.create_topic(input).await?;
    let body = project_one(state.store.as_ref(), created.into(), &media_context(&state, &headers)).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

async fn replace(
    state: State<AppState>,
    _staff: Staff,
    headers: HeaderMap,
    slug: Path<String>,
    lookup: Query<TopicLookup>,
    Payload(input): Payload<TopicInput>,
) -> AppResult<Json<Value>> {
    update(state, headers, slug, lookup, input, WriteMode::Replace).await
}

async fn patch(
    state: State<AppState>,
    _staff: Staff,
    headers: HeaderMap,
    slug: Path<String>,
    lookup: Query<TopicLookup>,
    Payload(input): Payload<TopicInput>,
) -> AppResult<Json<Value>> {
    update(state, headers, slug, lookup, input, WriteMode::Partial).await
}

async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Query(lookup): Query<TopicLookup>,
    input: TopicInput,
    mode: WriteMode,
) -> AppResult<Json<Value>> {
    let existing = find(&state, &slug, &lookup).await?;
    let updated = state.editor.update_topic(&existing, input, mode).await?;
    let body = project_one(state.store.as_ref(), updated.into(), &media_context(&state, &headers)).await?;
    Ok(Json(body))
}

async fn destroy(
    State(state): State<AppState>,
    _staff: Staff,
    Path(slug): Path<String>,
    Query(lookup): Query<TopicLookup>,
) -> AppResult<StatusCode> {
    let existing = find(&state, &slug, &lookup).await?;
    state.editor.delete(ContentKind::Topic, existing.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
