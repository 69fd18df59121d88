// Quiz endpoints - read-only questions (with answers) and answers

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::listing::{ListParams, ListingPolicy};
use super::{not_found, parse_id, route_both};
use crate::app_state::AppState;
use crate::error::AppResult;
use crate::infrastructure::ListQuery;
use crate::services::projection::{answer_full, question_full};

pub const QUESTION_LISTING: ListingPolicy = ListingPolicy {
    visible_only: false,
    search_fields: &[],
    filters: &[],
    ordering_fields: &[],
};

pub const ANSWER_LISTING: ListingPolicy = QUESTION_LISTING;

pub fn routes() -> Router<AppState> {
    let router = route_both(Router::new(), "/questions", get(list_questions));
    let router = route_both(router, "/questions/{id}", get(retrieve_question));
    let router = route_both(router, "/answers", get(list_answers));
    route_both(router, "/answers/{id}", get(retrieve_answer))
}

async fn list_questions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Value>> {
    let store = state.store.as_ref();
    let listing = QUESTION_LISTING
        .prepare(store, &params, &state.config.pagination)
        .await?;
    let page = store.questions(&listing.query).await?;
    listing.page.check(page.total)?;

    let questions = state.resolver.with_answers(page.items).await?;
    let results = questions.iter().map(question_full).collect();
    Ok(Json(listing.page.envelope(page.total, results)))
}

async fn retrieve_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id)?;
    let question = state
        .store
        .questions(&ListQuery::all().filter("id", id))
        .await?
        .first()
        .ok_or_else(not_found)?;
    let mut entries = state.resolver.with_answers(vec![question]).await?;
    let entry = entries.pop().ok_or_else(not_found)?;
    Ok(Json(question_full(&entry)))
}

async fn list_answers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Value>> {
    let store = state.store.as_ref();
    let listing = ANSWER_LISTING
        .prepare(store, &params, &state.config.pagination)
        .await?;
    let page = store.answers(&listing.query).await?;
    listing.page.check(page.total)?;

    let results = page.items.iter().map(answer_full).collect();
    Ok(Json(listing.page.envelope(page.total, results)))
}

async fn retrieve_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id)?;
    let answer = state
        .store
        .answers(&ListQuery::all().filter("id", id))
        .await?
        .first()
        .ok_or_else(not_found)?;
    Ok(Json(answer_full(&answer)))
}
