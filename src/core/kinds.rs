// Content kinds - closed enumeration shared by the tag index, resolver and projections

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every taggable entity kind. The string form is the discriminant stored in
/// the shared `tagged_items` join table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Technology,
    Tutorial,
    Topic,
    Blog,
    Snippet,
}

impl ContentKind {
    pub const ALL: [ContentKind; 5] = [
        ContentKind::Technology,
        ContentKind::Tutorial,
        ContentKind::Topic,
        ContentKind::Blog,
        ContentKind::Snippet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Technology => "technology",
            ContentKind::Tutorial => "tutorial",
            ContentKind::Topic => "topic",
            ContentKind::Blog => "blog",
            ContentKind::Snippet => "snippet",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Backing table name.
    pub fn table(self) -> &'static str {
        match self {
            ContentKind::Technology => "technologies",
            ContentKind::Tutorial => "tutorials",
            ContentKind::Topic => "topics",
            ContentKind::Blog => "blog_posts",
            ContentKind::Snippet => "code_snippets",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind segment accepted by tag browsing. Anything outside the four
/// browseable kinds becomes `Empty`, which resolves to no results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSelector {
    Technology,
    Tutorial,
    Blog,
    Snippet,
    Empty,
}

impl TagSelector {
    pub fn parse(segment: &str) -> Self {
        match segment {
            "technology" => TagSelector::Technology,
            "tutorial" => TagSelector::Tutorial,
            "blog" => TagSelector::Blog,
            "snippet" => TagSelector::Snippet,
            _ => TagSelector::Empty,
        }
    }

    pub fn kind(self) -> Option<ContentKind> {
        match self {
            TagSelector::Technology => Some(ContentKind::Technology),
            TagSelector::Tutorial => Some(ContentKind::Tutorial),
            TagSelector::Blog => Some(ContentKind::Blog),
            TagSelector::Snippet => Some(ContentKind::Snippet),
            TagSelector::Empty => None,
        }
    }
}

impl From<&str> for TagSelector {
    fn from(segment: &str) -> Self {
        Self::parse(segment)
    }
}
