use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct BlogPost {
    pub id: i64,
    pub technology_id: i64,
    pub technology_slug: String,
    pub technology_name: String,
    pub title: String,
    pub slug: String,
    pub author_id: i64,
    pub author_username: String,
    pub excerpt: String,
    pub content: String,
    pub thumbnail: String,
    pub is_published: bool,
    pub published_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for BlogPost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.technology_name, self.title)
    }
}

#[derive(Debug, Clone)]
pub struct NewBlogPost {
    pub technology_id: i64,
    pub title: String,
    pub slug: String,
    pub author_id: i64,
    pub excerpt: String,
    pub content: String,
    pub thumbnail: String,
    pub is_published: bool,
    pub published_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogPostInput {
    pub technology: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub thumbnail: Option<String>,
    pub is_published: Option<bool>,
    pub published_date: Option<String>,
    pub tags: Option<Vec<String>>,
}
