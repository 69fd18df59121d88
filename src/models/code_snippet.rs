use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
    Java,
    Csharp,
    Go,
    Ruby,
    Php,
    Html,
    Css,
    Sql,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::Python,
        Language::Javascript,
        Language::Java,
        Language::Csharp,
        Language::Go,
        Language::Ruby,
        Language::Php,
        Language::Html,
        Language::Css,
        Language::Sql,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Java => "java",
            Language::Csharp => "csharp",
            Language::Go => "go",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Html => "html",
            Language::Css => "css",
            Language::Sql => "sql",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == value)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CodeSnippet {
    pub id: i64,
    pub technology_id: i64,
    pub technology_slug: String,
    pub technology_name: String,
    pub title: String,
    pub slug: String,
    pub author_id: i64,
    pub author_username: String,
    pub description: String,
    pub code: String,
    pub language: Language,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for CodeSnippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.technology_name,
            self.title,
            self.language.as_str()
        )
    }
}

#[derive(Debug, Clone)]
pub struct NewCodeSnippet {
    pub technology_id: i64,
    pub title: String,
    pub slug: String,
    pub author_id: i64,
    pub description: String,
    pub code: String,
    pub language: Language,
    pub is_public: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodeSnippetInput {
    pub technology: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub language: Option<String>,
    pub is_public: Option<bool>,
    pub tags: Option<Vec<String>>,
}
