use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == value)
    }
}

/// A tutorial joined with its technology and author references.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Tutorial {
    pub id: i64,
    pub technology_id: i64,
    pub technology_slug: String,
    pub technology_name: String,
    pub title: String,
    pub slug: String,
    pub author_id: i64,
    pub author_username: String,
    pub content: String,
    pub difficulty: Difficulty,
    pub video_url: Option<String>,
    pub thumbnail: String,
    pub is_published: bool,
    pub published_date: Option<DateTime<Utc>>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Tutorial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.technology_name, self.title)
    }
}

#[derive(Debug, Clone)]
pub struct NewTutorial {
    pub technology_id: i64,
    pub title: String,
    pub slug: String,
    pub author_id: i64,
    pub content: String,
    pub difficulty: Difficulty,
    pub video_url: Option<String>,
    pub thumbnail: String,
    pub is_published: bool,
    pub published_date: Option<DateTime<Utc>>,
    pub views: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TutorialInput {
    /// Technology slug.
    pub technology: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub difficulty: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail: Option<String>,
    pub is_published: Option<bool>,
    /// RFC 3339 timestamp.
    pub published_date: Option<String>,
    pub views: Option<i64>,
    pub tags: Option<Vec<String>>,
}
