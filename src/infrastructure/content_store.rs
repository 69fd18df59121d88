// Content Store - query interface over the entity store and tag index
// Handlers and services only see this trait; SqliteContentStore implements it.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::core::ContentKind;
use crate::error::AppResult;
use crate::models::{
    Answer, BlogPost, CodeSnippet, NewAnswer, NewBlogPost, NewCodeSnippet, NewQuestion,
    NewTechnology, NewTopic, NewTutorial, NewUser, Question, Tag, Technology, Topic, Tutorial,
    User,
};

/// Typed value for an equality filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: &'static str,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerm {
    pub field: &'static str,
    pub descending: bool,
}

impl OrderTerm {
    pub fn asc(field: &'static str) -> Self {
        Self { field, descending: false }
    }

    pub fn desc(field: &'static str) -> Self {
        Self { field, descending: true }
    }
}

/// Whitespace-separated terms; each must match at least one of `fields`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpec {
    pub terms: Vec<String>,
    pub fields: &'static [&'static str],
}

/// Collection scan over one entity kind. Field names are logical names
/// (`slug`, `technology`, `published_date`, ...) that the store maps to columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub visible_only: bool,
    pub filters: Vec<FieldFilter>,
    pub search: Option<SearchSpec>,
    pub tag: Option<String>,
    /// Empty means the kind's natural order.
    pub ordering: Vec<OrderTerm>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    /// Every row regardless of visibility.
    pub fn all() -> Self {
        Self::default()
    }

    /// Only rows passing the kind's visibility predicate.
    pub fn visible() -> Self {
        Self {
            visible_only: true,
            ..Self::default()
        }
    }

    pub fn filter(mut self, field: &'static str, value: impl Into<FilterValue>) -> Self {
        self.filters.push(FieldFilter {
            field,
            value: value.into(),
        });
        self
    }

    pub fn tagged(mut self, tag_slug: impl Into<String>) -> Self {
        self.tag = Some(tag_slug.into());
        self
    }

    pub fn search(mut self, terms: Vec<String>, fields: &'static [&'static str]) -> Self {
        if !terms.is_empty() && !fields.is_empty() {
            self.search = Some(SearchSpec { terms, fields });
        }
        self
    }

    pub fn order_by(mut self, ordering: Vec<OrderTerm>) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn window(mut self, limit: i64, offset: i64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }
}

/// One window of a collection scan plus the unwindowed row count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn first(self) -> Option<T> {
        self.items.into_iter().next()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    // Accounts
    async fn user_by_token(&self, token: &str) -> AppResult<Option<User>>;
    /// Insert, or refresh the existing row with the same username.
    async fn save_user(&self, user: NewUser) -> AppResult<User>;

    // Collection scans
    async fn technologies(&self, query: &ListQuery) -> AppResult<Page<Technology>>;
    async fn tutorials(&self, query: &ListQuery) -> AppResult<Page<Tutorial>>;
    async fn topics(&self, query: &ListQuery) -> AppResult<Page<Topic>>;
    async fn blog_posts(&self, query: &ListQuery) -> AppResult<Page<BlogPost>>;
    async fn code_snippets(&self, query: &ListQuery) -> AppResult<Page<CodeSnippet>>;
    async fn questions(&self, query: &ListQuery) -> AppResult<Page<Question>>;
    async fn answers(&self, query: &ListQuery) -> AppResult<Page<Answer>>;

    /// Answers of several questions, grouped by question id, each group in display order.
    async fn answers_for(&self, question_ids: &[i64]) -> AppResult<HashMap<i64, Vec<Answer>>>;

    // Writes. `tags` replaces the tag set; `None` on update leaves it untouched.
    async fn insert_technology(&self, new: NewTechnology, tags: &[String]) -> AppResult<Technology>;
    async fn update_technology(&self, technology: &Technology, tags: Option<&[String]>) -> AppResult<Technology>;
    async fn insert_tutorial(&self, new: NewTutorial, tags: &[String]) -> AppResult<Tutorial>;
    async fn update_tutorial(&self, tutorial: &Tutorial, tags: Option<&[String]>) -> AppResult<Tutorial>;
    async fn insert_topic(&self, new: NewTopic, tags: &[String]) -> AppResult<Topic>;
    async fn update_topic(&self, topic: &Topic, tags: Option<&[String]>) -> AppResult<Topic>;
    async fn insert_blog_post(&self, new: NewBlogPost, tags: &[String]) -> AppResult<BlogPost>;
    async fn update_blog_post(&self, post: &BlogPost, tags: Option<&[String]>) -> AppResult<BlogPost>;
    async fn insert_code_snippet(&self, new: NewCodeSnippet, tags: &[String]) -> AppResult<CodeSnippet>;
    async fn update_code_snippet(&self, snippet: &CodeSnippet, tags: Option<&[String]>) -> AppResult<CodeSnippet>;
    async fn insert_question(&self, new: NewQuestion) -> AppResult<Question>;
    async fn insert_answer(&self, new: NewAnswer) -> AppResult<Answer>;
    /// Deletes the row and, by cascade, everything it owns. False when nothing matched.
    async fn delete_content(&self, kind: ContentKind, id: i64) -> AppResult<bool>;

    // Tag index
    async fn list_tags(&self) -> AppResult<Vec<Tag>>;
    async fn tag_by_slug(&self, slug: &str) -> AppResult<Option<Tag>>;
    /// Tag names per entity id, sorted by name.
    async fn tag_names(&self, kind: ContentKind, ids: &[i64]) -> AppResult<HashMap<i64, Vec<String>>>;

    async fn is_empty(&self) -> AppResult<bool>;
}
