// Projection - per-kind JSON output records at full or minimal detail
// Pure functions of (record, level, tags, media context); no store access
// except `project_all`, which batch-loads tag names first.

use serde_json::{json, Value};
use std::collections::HashMap;

use crate::config::MediaConfig;
use crate::core::ContentKind;
use crate::error::AppResult;
use crate::infrastructure::ContentStore;
use crate::models::{
    Answer, BlogPost, CodeSnippet, QuestionWithAnswers, Technology, Topic, Tutorial,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionLevel {
    Full,
    Minimal,
}

/// One row of any taggable kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentRecord {
    Technology(Technology),
    Tutorial(Tutorial),
    Topic(Topic),
    Blog(BlogPost),
    Snippet(CodeSnippet),
}

impl ContentRecord {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentRecord::Technology(_) => ContentKind::Technology,
            ContentRecord::Tutorial(_) => ContentKind::Tutorial,
            ContentRecord::Topic(_) => ContentKind::Topic,
            ContentRecord::Blog(_) => ContentKind::Blog,
            ContentRecord::Snippet(_) => ContentKind::Snippet,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            ContentRecord::Technology(r) => r.id,
            ContentRecord::Tutorial(r) => r.id,
            ContentRecord::Topic(r) => r.id,
            ContentRecord::Blog(r) => r.id,
            ContentRecord::Snippet(r) => r.id,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            ContentRecord::Technology(r) => &r.slug,
            ContentRecord::Tutorial(r) => &r.slug,
            ContentRecord::Topic(r) => &r.slug,
            ContentRecord::Blog(r) => &r.slug,
            ContentRecord::Snippet(r) => &r.slug,
        }
    }
}

impl From<Technology> for ContentRecord {
    fn from(value: Technology) -> Self {
        ContentRecord::Technology(value)
    }
}

impl From<Tutorial> for ContentRecord {
    fn from(value: Tutorial) -> Self {
        ContentRecord::Tutorial(value)
    }
}

impl From<Topic> for ContentRecord {
    fn from(value: Topic) -> Self {
        ContentRecord::Topic(value)
    }
}

impl From<BlogPost> for ContentRecord {
    fn from(value: BlogPost) -> Self {
        ContentRecord::Blog(value)
    }
}

impl From<CodeSnippet> for ContentRecord {
    fn from(value: CodeSnippet) -> Self {
        ContentRecord::Snippet(value)
    }
}

/// Origin and media prefix used to turn stored media paths into absolute URLs.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaContext {
    origin: String,
    media_path: String,
}

impl MediaContext {
    pub fn new(origin: &str, media_path: &str) -> Self {
        let trimmed = media_path.trim_matches('/');
        let media_path = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", trimmed)
        };
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            media_path,
        }
    }

    /// Origin from the request's `Host` (and `X-Forwarded-Proto`), else the configured base URL.
    pub fn for_request(host: Option<&str>, forwarded_proto: Option<&str>, config: &MediaConfig) -> Self {
        match host.map(str::trim).filter(|h| !h.is_empty()) {
            Some(host) => {
                let scheme = forwarded_proto
                    .and_then(|p| p.split(',').next())
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .unwrap_or("http");
                Self::new(&format!("{}://{}", scheme, host), &config.url_path)
            }
            None => Self::new(&config.public_base_url, &config.url_path),
        }
    }

    /// Absolute URL for a stored media path, `null` when nothing is stored.
    pub fn url(&self, path: &str) -> Value {
        let path = path.trim();
        if path.is_empty() {
            return Value::Null;
        }
        if path.starts_with("http://") || path.starts_with("https://") {
            return Value::String(path.to_string());
        }
        Value::String(format!(
            "{}{}{}",
            self.origin,
            self.media_path,
            path.trim_start_matches('/')
        ))
    }
}

/// Total dispatch from record kind and level to its projection.
pub fn project(record: &ContentRecord, level: ProjectionLevel, tags: &[String], media: &MediaContext) -> Value {
    match (record, level) {
        (ContentRecord::Technology(r), ProjectionLevel::Full) => technology_full(r, tags, media),
        (ContentRecord::Technology(r), ProjectionLevel::Minimal) => json!({
            "name": r.name,
            "slug": r.slug,
        }),
        (ContentRecord::Tutorial(r), ProjectionLevel::Full) => tutorial_full(r, tags, media),
        (ContentRecord::Tutorial(r), ProjectionLevel::Minimal) => json!({
            "title": r.title,
            "slug": r.slug,
            "thumbnail": media.url(&r.thumbnail),
        }),
        (ContentRecord::Topic(r), ProjectionLevel::Full) => topic_full(r, tags),
        (ContentRecord::Topic(r), ProjectionLevel::Minimal) => minimal_title(&r.title, &r.slug),
        (ContentRecord::Blog(r), ProjectionLevel::Full) => blog_full(r, tags, media),
        (ContentRecord::Blog(r), ProjectionLevel::Minimal) => minimal_title(&r.title, &r.slug),
        (ContentRecord::Snippet(r), ProjectionLevel::Full) => snippet_full(r, tags),
        (ContentRecord::Snippet(r), ProjectionLevel::Minimal) => minimal_title(&r.title, &r.slug),
    }
}

/// Project records of one kind, loading their tag names in a single query
/// when the level includes tags.
pub async fn project_all(
    store: &dyn ContentStore,
    records: Vec<ContentRecord>,
    level: ProjectionLevel,
    media: &MediaContext,
) -> AppResult<Vec<Value>> {
    let mut ids_by_kind: HashMap<ContentKind, Vec<i64>> = HashMap::new();
    if level == ProjectionLevel::Full {
        for record in &records {
            ids_by_kind.entry(record.kind()).or_default().push(record.id());
        }
    }

    let mut tags: HashMap<(ContentKind, i64), Vec<String>> = HashMap::new();
    for (kind, ids) in ids_by_kind {
        for (id, names) in store.tag_names(kind, &ids).await? {
            tags.insert((kind, id), names);
        }
    }

    Ok(records
        .iter()
        .map(|record| {
            let record_tags = tags
                .get(&(record.kind(), record.id()))
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            project(record, level, record_tags, media)
        })
        .collect())
}

/// Full projection of a single record.
pub async fn project_one(store: &dyn ContentStore, record: ContentRecord, media: &MediaContext) -> AppResult<Value> {
    let mut projected = project_all(store, vec![record], ProjectionLevel::Full, media).await?;
    Ok(projected.pop().unwrap_or(Value::Null))
}

fn minimal_title(title: &str, slug: &str) -> Value {
    json!({ "title": title, "slug": slug })
}

fn technology_full(r: &Technology, tags: &[String], media: &MediaContext) -> Value {
    json!({
        "id": r.id,
        "name": r.name,
        "slug": r.slug,
        "logo": media.url(&r.logo),
        "description": r.description,
        "is_active": r.is_active,
        "tags": tags,
        "created_at": r.created_at,
        "updated_at": r.updated_at,
    })
}

fn tutorial_full(r: &Tutorial, tags: &[String], media: &MediaContext) -> Value {
    json!({
        "id": r.id,
        "technology": r.technology_slug,
        "title": r.title,
        "slug": r.slug,
        "author": r.author_username,
        "content": r.content,
        "difficulty": r.difficulty,
        "video_url": r.video_url,
        "thumbnail": media.url(&r.thumbnail),
        "is_published": r.is_published,
        "published_date": r.published_date,
        "views": r.views,
        "tags": tags,
        "created_at": r.created_at,
        "updated_at": r.updated_at,
    })
}

fn topic_full(r: &Topic, tags: &[String]) -> Value {
    json!({
        "id": r.id,
        "tutorial": r.tutorial_slug,
        "title": r.title,
        "slug": r.slug,
        "content": r.content,
        "video_url": r.video_url,
        "order": r.order,
        "code_snippet": r.code_snippet,
        "is_free": r.is_free,
        "tags": tags,
        "created_at": r.created_at,
        "updated_at": r.updated_at,
    })
}

fn blog_full(r: &BlogPost, tags: &[String], media: &MediaContext) -> Value {
    json!({
        "id": r.id,
        "technology": r.technology_slug,
        "title": r.title,
        "slug": r.slug,
        "author": r.author_username,
        "excerpt": r.excerpt,
        "content": r.content,
        "thumbnail": media.url(&r.thumbnail),
        "is_published": r.is_published,
        "published_date": r.published_date,
        "tags": tags,
        "created_at": r.created_at,
        "updated_at": r.updated_at,
    })
}

fn snippet_full(r: &CodeSnippet, tags: &[String]) -> Value {
    json!({
        "id": r.id,
        "technology": r.technology_slug,
        "title": r.title,
        "slug": r.slug,
        "author": r.author_username,
        "description": r.description,
        "code": r.code,
        "language": r.language,
        "is_public": r.is_public,
        "tags": tags,
        "created_at": r.created_at,
        "updated_at": r.updated_at,
    })
}

pub fn answer_full(answer: &Answer) -> Value {
    json!({
        "id": answer.id,
        "text": answer.text,
        "is_correct": answer.is_correct,
        "order": answer.order,
    })
}

pub fn question_full(entry: &QuestionWithAnswers) -> Value {
    let q = &entry.question;
    json!({
        "id": q.id,
        "text": q.text,
        "explanation": q.explanation,
        "difficulty": q.difficulty,
        "created_at": q.created_at,
        "updated_at": q.updated_at,
        "answers": entry.answers.iter().map(answer_full).collect::<Vec<_>>(),
    })
}
