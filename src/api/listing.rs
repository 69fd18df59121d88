// Listing policy - visibility, filters, search, ordering and pagination for list endpoints

use axum::Json;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::config::PaginationConfig;
use crate::error::{AppError, AppResult, FieldErrors};
use crate::infrastructure::{ContentStore, ListQuery, OrderTerm, Page};
use crate::services::projection::{self, ContentRecord, MediaContext, ProjectionLevel};

pub type ListParams = HashMap<String, String>;

#[derive(Debug, Clone, Copy)]
pub enum FilterKind {
    Bool,
    Choice(&'static [&'static str]),
    /// Value is a technology slug; unknown slugs are rejected.
    Technology,
    /// Value is a tutorial slug; unknown slugs are rejected.
    Tutorial,
}

#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub param: &'static str,
    pub field: &'static str,
    pub kind: FilterKind,
}

impl FilterSpec {
    pub const fn new(param: &'static str, kind: FilterKind) -> Self {
        Self {
            param,
            field: param,
            kind,
        }
    }
}

/// What a list endpoint lets callers narrow and sort by.
#[derive(Debug, Clone, Copy)]
pub struct ListingPolicy {
    pub visible_only: bool,
    pub search_fields: &'static [&'static str],
    pub filters: &'static [FilterSpec],
    pub ordering_fields: &'static [&'static str],
}

/// A prepared list request: the store query plus the requested page.
#[derive(Debug, Clone)]
pub struct Listing {
    pub query: ListQuery,
    pub page: PageRequest,
}

impl ListingPolicy {
    pub async fn prepare(
        &self,
        store: &dyn ContentStore,
        params: &ListParams,
        pagination: &PaginationConfig,
    ) -> AppResult<Listing> {
        let mut query = if self.visible_only {
            ListQuery::visible()
        } else {
            ListQuery::all()
        };

        let mut errors = FieldErrors::new();
        for spec in self.filters {
            let Some(raw) = params.get(spec.param).map(|v| v.trim()).filter(|v| !v.is_empty()) else {
                continue;
            };
            match spec.kind {
                FilterKind::Bool => match parse_bool(raw) {
                    Some(value) => query = query.filter(spec.field, value),
                    None => errors.add(spec.param, "Must be a valid boolean."),
                },
                FilterKind::Choice(allowed) => {
                    if allowed.contains(&raw) {
                        query = query.filter(spec.field, raw);
                    } else {
                        errors.add(
                            spec.param,
                            format!("Select a valid choice. {} is not one of the available choices.", raw),
                        );
                    }
                }
                FilterKind::Technology | FilterKind::Tutorial => {
                    let by_slug = ListQuery::all().filter("slug", raw);
                    let exists = match spec.kind {
                        FilterKind::Technology => store.technologies(&by_slug).await?.total > 0,
                        _ => store.tutorials(&by_slug).await?.total > 0,
                    };
                    if exists {
                        query = query.filter(spec.field, raw);
                    } else {
                        errors.add(
                            spec.param,
                            "Select a valid choice. That choice is not one of the available choices.",
                        );
                    }
                }
            }
        }
        errors.into_result()?;

        if let Some(raw) = params.get("search") {
            query = query.search(search_terms(raw), self.search_fields);
        }
        if let Some(raw) = params.get("ordering") {
            query = query.order_by(self.ordering(raw));
        }

        let page = PageRequest::from_params(params, pagination)?;
        query = query.window(page.page_size, page.offset());
        Ok(Listing { query, page })
    }

    /// Requested ordering terms that are on the allow-list; the rest are dropped.
    pub fn ordering(&self, raw: &str) -> Vec<OrderTerm> {
        raw.split(',')
            .map(str::trim)
            .filter_map(|term| {
                let (name, descending) = match term.strip_prefix('-') {
                    Some(name) => (name, true),
                    None => (term, false),
                };
                self.ordering_fields
                    .iter()
                    .copied()
                    .find(|allowed| *allowed == name)
                    .map(|field| OrderTerm {
                        field,
                        descending,
                    })
            })
            .collect()
    }
}

impl Listing {
    /// Project one page of content records into the list envelope.
    pub async fn respond(
        &self,
        store: &dyn ContentStore,
        page: Page<ContentRecord>,
        media: &MediaContext,
    ) -> AppResult<Json<Value>> {
        self.page.check(page.total)?;
        let results = projection::project_all(store, page.items, ProjectionLevel::Full, media).await?;
        Ok(Json(self.page.envelope(page.total, results)))
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn search_terms(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

fn invalid_page() -> AppError {
    AppError::NotFound("Invalid page.".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    pub fn from_params(params: &ListParams, config: &PaginationConfig) -> AppResult<Self> {
        let page = match params.get("page").map(|raw| raw.trim()) {
            None | Some("") => 1,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|page| *page >= 1)
                .ok_or_else(invalid_page)?,
        };
        let page_size = params
            .get("page_size")
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|size| *size > 0)
            .map(|size| size.min(config.max_page_size))
            .unwrap_or(config.page_size);
        Ok(Self { page, page_size })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// The first page always exists; later pages must start inside the result set.
    pub fn check(&self, total: i64) -> AppResult<()> {
        if self.page > 1 && self.offset() >= total {
            return Err(invalid_page());
        }
        Ok(())
    }

    pub fn envelope(&self, total: i64, results: Vec<Value>) -> Value {
        json!({
            "count": total,
            "page": self.page,
            "page_size": self.page_size,
            "results": results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: ListingPolicy = ListingPolicy {
        visible_only: true,
        search_fields: &["title", "content"],
        filters: &[],
        ordering_fields: &["published_date", "views"],
    };

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn pagination() -> PaginationConfig {
        PaginationConfig {
            page_size: 20,
            max_page_size: 100,
        }
    }

    #[test]
    fn test_ordering_ignores_unknown_fields() {
        let terms = POLICY.ordering("-views, title ,published_date,-password");
        assert_eq!(
            terms,
            vec![OrderTerm::desc("views"), OrderTerm::asc("published_date")]
        );
        assert!(POLICY.ordering("title").is_empty());
    }

    #[test]
    fn test_search_terms_split_on_whitespace_and_commas() {
        assert_eq!(search_terms("  go  basics,intro "), vec!["go", "basics", "intro"]);
        assert!(search_terms("   ").is_empty());
    }

    #[test]
    fn test_parse_bool_variants() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_page_request_defaults_and_caps() {
        let default = PageRequest::from_params(&params(&[]), &pagination()).unwrap();
        assert_eq!(default, PageRequest { page: 1, page_size: 20 });

        let capped = PageRequest::from_params(&params(&[("page", "3"), ("page_size", "500")]), &pagination()).unwrap();
        assert_eq!(capped, PageRequest { page: 3, page_size: 100 });
        assert_eq!(capped.offset(), 200);

        let junk_size = PageRequest::from_params(&params(&[("page_size", "-4")]), &pagination()).unwrap();
        assert_eq!(junk_size.page_size, 20);
    }

    #[test]
    fn test_invalid_page_numbers_are_not_found() {
        for bad in ["0", "-1", "abc"] {
            let result = PageRequest::from_params(&params(&[("page", bad)]), &pagination());
            assert!(matches!(result, Err(AppError::NotFound(_))), "page={}", bad);
        }
    }

    #[test]
    fn test_page_past_the_end() {
        let first = PageRequest { page: 1, page_size: 10 };
        assert!(first.check(0).is_ok());
        let second = PageRequest { page: 2, page_size: 10 };
        assert!(second.check(11).is_ok());
        assert!(second.check(10).is_err());
    }
}
