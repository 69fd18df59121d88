use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use std::fmt;

/// A topic inside a tutorial. Slugs are unique per tutorial only.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Topic {
    pub id: i64,
    pub tutorial_id: i64,
    pub tutorial_slug: String,
    pub tutorial_title: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub video_url: Option<String>,
    #[sqlx(rename = "sort_order")]
    pub order: i64,
    pub code_snippet: String,
    pub is_free: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.tutorial_title, self.title)
    }
}

#[derive(Debug, Clone)]
pub struct NewTopic {
    pub tutorial_id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub video_url: Option<String>,
    pub order: i64,
    pub code_snippet: String,
    pub is_free: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicInput {
    /// Tutorial slug.
    pub tutorial: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub order: Option<i64>,
    pub code_snippet: Option<String>,
    pub is_free: Option<bool>,
    pub tags: Option<Vec<String>>,
}
