use serde::Serialize;
use sqlx::FromRow;

/// One label of the shared tag vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}
