use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use std::fmt;

/// A row from the `technologies` table. Parent of tutorials, blog posts and snippets.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Technology {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub logo: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct NewTechnology {
    pub name: String,
    pub slug: String,
    pub logo: String,
    pub description: String,
    pub is_active: bool,
}

/// Write payload for create, full update and partial update.
/// The slug is only read on create.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TechnologyInput {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub tags: Option<Vec<String>>,
}
