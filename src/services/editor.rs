// Content Editor - write-side validation, slug derivation and persistence
// Collects every field problem before touching the store, then writes once.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::info;

use crate::core::{derive_slug, is_valid_slug, ContentKind};
use crate::error::{AppError, AppResult, FieldErrors};
use crate::infrastructure::{ContentStore, ListQuery};
use crate::models::{
    BlogPost, BlogPostInput, CodeSnippet, CodeSnippetInput, Difficulty, Language, NewBlogPost,
    NewCodeSnippet, NewTechnology, NewTopic, NewTutorial, Technology, TechnologyInput, Topic,
    TopicInput, Tutorial, TutorialInput, User,
};

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
const NON_NEGATIVE: &str = "Ensure this value is greater than or equal to 0.";
const INVALID_SLUG: &str =
    "Enter a valid \"slug\" consisting of letters, numbers, underscores or hyphens.";
const INVALID_DATETIME: &str =
    "Datetime has wrong format. Use one of these formats instead: YYYY-MM-DDThh:mm[:ss[.uuuuuu]][+HH:MM|-HH:MM|Z].";
const TUTORIAL_MIN_CONTENT: usize = 100;
const TAG_MAX_LEN: usize = 100;
const URL_MAX_LEN: usize = 200;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)https?://[^\s/?#]+(?:[/?#]\S*)?$").expect("url pattern is valid")
});

/// PUT replaces every writable field (missing required fields are errors,
/// missing optional fields fall back to defaults). PATCH keeps what is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Replace,
    Partial,
}

/// Field resolution for one write, accumulating validation messages.
struct Draft {
    mode: WriteMode,
    errors: FieldErrors,
}

impl Draft {
    fn new(mode: WriteMode) -> Self {
        Self {
            mode,
            errors: FieldErrors::new(),
        }
    }

    fn finish(self) -> AppResult<()> {
        self.errors.into_result()
    }

    /// Required field absent from the payload: keep the stored value on PATCH, error otherwise.
    fn keep<T: Default>(&mut self, field: &str, current: Option<T>) -> T {
        match (self.mode, current) {
            (WriteMode::Partial, Some(value)) => value,
            _ => {
                self.errors.add(field, REQUIRED);
                T::default()
            }
        }
    }

    fn optional<T>(&self, incoming: Option<T>, current: Option<T>, default: T) -> T {
        match (incoming, self.mode, current) {
            (Some(value), _, _) => value,
            (None, WriteMode::Partial, Some(value)) => value,
            _ => default,
        }
    }

    fn max_len(&mut self, field: &str, value: &str, max_len: usize) {
        if value.chars().count() > max_len {
            self.errors.add(
                field,
                format!("Ensure this field has no more than {} characters.", max_len),
            );
        }
    }

    fn required_text(
        &mut self,
        field: &str,
        incoming: Option<String>,
        current: Option<&str>,
        max_len: Option<usize>,
    ) -> String {
        match incoming {
            Some(value) => {
                if value.trim().is_empty() {
                    self.errors.add(field, BLANK);
                } else if let Some(max_len) = max_len {
                    self.max_len(field, &value, max_len);
                }
                value
            }
            None => self.keep(field, current.map(str::to_string)),
        }
    }

    fn optional_text(&mut self, incoming: Option<String>, current: Option<&str>) -> String {
        self.optional(incoming, current.map(str::to_string), String::new())
    }

    fn choice<T>(
        &mut self,
        field: &str,
        incoming: Option<String>,
        current: Option<T>,
        default: Option<T>,
        parse: fn(&str) -> Option<T>,
        placeholder: T,
    ) -> T {
        match incoming {
            Some(raw) => parse(&raw).unwrap_or_else(|| {
                self.errors
                    .add(field, format!("\"{}\" is not a valid choice.", raw));
                placeholder
            }),
            None => match (self.mode, current, default) {
                (WriteMode::Partial, Some(value), _) => value,
                (_, _, Some(default)) => default,
                _ => {
                    self.errors.add(field, REQUIRED);
                    placeholder
                }
            },
        }
    }

    fn non_negative(&mut self, field: &str, incoming: Option<i64>, current: Option<i64>) -> i64 {
        if matches!(incoming, Some(value) if value < 0) {
            self.errors.add(field, NON_NEGATIVE);
        }
        self.optional(incoming, current, 0)
    }

    /// Optional URL; an empty string clears it.
    fn url(&mut self, field: &str, incoming: Option<String>, current: Option<Option<String>>) -> Option<String> {
        match incoming {
            Some(raw) => {
                let raw = raw.trim().to_string();
                if raw.is_empty() {
                    return None;
                }
                if !URL_PATTERN.is_match(&raw) {
                    self.errors.add(field, "Enter a valid URL.");
                }
                self.max_len(field, &raw, URL_MAX_LEN);
                Some(raw)
            }
            None => self.optional(None, current, None),
        }
    }

    /// Optional RFC 3339 timestamp; an empty string clears it.
    fn datetime(
        &mut self,
        field: &str,
        incoming: Option<String>,
        current: Option<Option<DateTime<Utc>>>,
    ) -> Option<DateTime<Utc>> {
        match incoming {
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => match DateTime::parse_from_rfc3339(raw.trim()) {
                Ok(parsed) => Some(parsed.with_timezone(&Utc)),
                Err(_) => {
                    self.errors.add(field, INVALID_DATETIME);
                    None
                }
            },
            None => self.optional(None, current, None),
        }
    }

    /// Trimmed, de-duplicated tag names; `None` when the payload carries no tags.
    fn tags(&mut self, incoming: Option<Vec<String>>) -> Option<Vec<String>> {
        let names = incoming?;
        let mut cleaned: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.trim().to_string();
            if name.is_empty() || cleaned.contains(&name) {
                continue;
            }
            if name.chars().count() > TAG_MAX_LEN {
                self.max_len("tags", &name, TAG_MAX_LEN);
                continue;
            }
            cleaned.push(name);
        }
        Some(cleaned)
    }

    /// Slug for a record being created.
    fn new_slug(&mut self, explicit: Option<String>, prefix: Option<&str>, title: &str, max_len: usize) -> String {
        let explicit = explicit.filter(|slug| !slug.trim().is_empty());
        let slug = derive_slug(explicit.as_deref(), prefix, title);
        if explicit.is_some() && !is_valid_slug(&slug) {
            self.errors.add("slug", INVALID_SLUG);
        } else if slug.is_empty() && !title.trim().is_empty() {
            self.errors.add("slug", INVALID_SLUG);
        }
        self.max_len("slug", &slug, max_len);
        slug
    }
}

fn clashes<T>(items: &[T], id_of: impl Fn(&T) -> i64, exclude: Option<i64>) -> bool {
    items.iter().any(|item| Some(id_of(item)) != exclude)
}

fn missing_slug(slug: &str) -> String {
    format!("Object with slug={} does not exist.", slug)
}

#[derive(Clone)]
pub struct ContentEditor {
    store: Arc<dyn ContentStore>,
}

impl ContentEditor {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Parent technology named by slug in a write payload. Visibility does not apply.
    async fn technology_ref(&self, draft: &mut Draft, incoming: Option<String>, has_current: bool) -> AppResult<Option<Technology>> {
        match incoming {
            Some(slug) if slug.trim().is_empty() => {
                draft.errors.add("technology", BLANK);
                Ok(None)
            }
            Some(slug) => {
                let found = self
                    .store
                    .technologies(&ListQuery::all().filter("slug", slug.trim()))
                    .await?
                    .first();
                if found.is_none() {
                    draft.errors.add("technology", missing_slug(slug.trim()));
                }
                Ok(found)
            }
            None => {
                if draft.mode == WriteMode::Replace || !has_current {
                    draft.errors.add("technology", REQUIRED);
                }
                Ok(None)
            }
        }
    }

    async fn tutorial_ref(&self, draft: &mut Draft, incoming: Option<String>, has_current: bool) -> AppResult<Option<Tutorial>> {
        match incoming {
            Some(slug) if slug.trim().is_empty() => {
                draft.errors.add("tutorial", BLANK);
                Ok(None)
            }
            Some(slug) => {
                let found = self
                    .store
                    .tutorials(&ListQuery::all().filter("slug", slug.trim()))
                    .await?
                    .first();
                if found.is_none() {
                    draft.errors.add("tutorial", missing_slug(slug.trim()));
                }
                Ok(found)
            }
            None => {
                if draft.mode == WriteMode::Replace || !has_current {
                    draft.errors.add("tutorial", REQUIRED);
                }
                Ok(None)
            }
        }
    }

    pub async fn create_technology(&self, input: TechnologyInput) -> AppResult<Technology> {
        self.save_technology(None, input, WriteMode::Replace).await
    }

    pub async fn update_technology(&self, existing: &Technology, input: TechnologyInput, mode: WriteMode) -> AppResult<Technology> {
        self.save_technology(Some(existing), input, mode).await
    }

    async fn save_technology(&self, existing: Option<&Technology>, input: TechnologyInput, mode: WriteMode) -> AppResult<Technology> {
        let mut draft = Draft::new(mode);
        let name = draft.required_text("name", input.name, existing.map(|t| t.name.as_str()), Some(100));
        let logo = draft.required_text("logo", input.logo, existing.map(|t| t.logo.as_str()), Some(100));
        let description = draft.required_text(
            "description",
            input.description,
            existing.map(|t| t.description.as_str()),
            None,
        );
        let is_active = draft.optional(input.is_active, existing.map(|t| t.is_active), true);
        let tags = draft.tags(input.tags);
        let slug = match existing {
            Some(current) => current.slug.clone(),
            None => draft.new_slug(input.slug, None, &name, 100),
        };

        let exclude = existing.map(|t| t.id);
        if !draft.errors.contains("name") {
            let same_name = self.store.technologies(&ListQuery::all().filter("name", name.as_str())).await?;
            if clashes(&same_name.items, |t| t.id, exclude) {
                draft.errors.add("name", "technology with this name already exists.");
            }
        }
        if existing.is_none() && !draft.errors.contains("slug") && !slug.is_empty() {
            let same_slug = self.store.technologies(&ListQuery::all().filter("slug", slug.as_str())).await?;
            if clashes(&same_slug.items, |t| t.id, None) {
                draft.errors.add("slug", "technology with this slug already exists.");
            }
        }
        draft.finish()?;

        match existing {
            None => {
                let created = self
                    .store
                    .insert_technology(
                        NewTechnology {
                            name,
                            slug,
                            logo,
                            description,
                            is_active,
                        },
                        &tags.unwrap_or_default(),
                    )
                    .await?;
                info!(kind = %ContentKind::Technology, slug = %created.slug, "Created content");
                Ok(created)
            }
            Some(current) => {
                let changed = Technology {
                    name,
                    logo,
                    description,
                    is_active,
                    ..current.clone()
                };
                let updated = self.store.update_technology(&changed, tags.as_deref()).await?;
                info!(kind = %ContentKind::Technology, slug = %updated.slug, "Updated content");
                Ok(updated)
            }
        }
    }

    pub async fn create_tutorial(&self, author: &User, input: TutorialInput) -> AppResult<Tutorial> {
        self.save_tutorial(Some(author), None, input, WriteMode::Replace).await
    }

    pub async fn update_tutorial(&self, existing: &Tutorial, input: TutorialInput, mode: WriteMode) -> AppResult<Tutorial> {
        self.save_tutorial(None, Some(existing), input, mode).await
    }

    async fn save_tutorial(
        &self,
        author: Option<&User>,
        existing: Option<&Tutorial>,
        input: TutorialInput,
        mode: WriteMode,
    ) -> AppResult<Tutorial> {
        let mut draft = Draft::new(mode);
        let technology = self
            .technology_ref(&mut draft, input.technology, existing.is_some())
            .await?;
        let technology_id = technology
            .as_ref()
            .map(|t| t.id)
            .or(existing.map(|t| t.technology_id))
            .unwrap_or_default();
        let title = draft.required_text("title", input.title, existing.map(|t| t.title.as_str()), Some(200));
        let content = draft.required_text("content", input.content, existing.map(|t| t.content.as_str()), None);
        if !draft.errors.contains("content") && content.chars().count() < TUTORIAL_MIN_CONTENT {
            draft.errors.add(
                "content",
                format!("Ensure this field has at least {} characters.", TUTORIAL_MIN_CONTENT),
            );
        }
        let difficulty = draft.choice(
            "difficulty",
            input.difficulty,
            existing.map(|t| t.difficulty),
            Some(Difficulty::Beginner),
            Difficulty::parse,
            Difficulty::Beginner,
        );
        let video_url = draft.url("video_url", input.video_url, existing.map(|t| t.video_url.clone()));
        let thumbnail = draft.required_text(
            "thumbnail",
            input.thumbnail,
            existing.map(|t| t.thumbnail.as_str()),
            Some(100),
        );
        let is_published = draft.optional(input.is_published, existing.map(|t| t.is_published), false);
        let published_date = draft.datetime(
            "published_date",
            input.published_date,
            existing.map(|t| t.published_date),
        );
        let views = draft.non_negative("views", input.views, existing.map(|t| t.views));
        let tags = draft.tags(input.tags);
        let slug = match existing {
            Some(current) => current.slug.clone(),
            None => draft.new_slug(
                input.slug,
                technology.as_ref().map(|t| t.slug.as_str()),
                &title,
                200,
            ),
        };

        let exclude = existing.map(|t| t.id);
        if existing.is_none() && !draft.errors.contains("slug") && !slug.is_empty() {
            let same_slug = self.store.tutorials(&ListQuery::all().filter("slug", slug.as_str())).await?;
            if clashes(&same_slug.items, |t| t.id, None) {
                draft.errors.add("slug", "tutorial with this slug already exists.");
            }
        }
        if draft.errors.is_empty() {
            let same_title = self
                .store
                .tutorials(
                    &ListQuery::all()
                        .filter("technology_id", technology_id)
                        .filter("title", title.as_str()),
                )
                .await?;
            if clashes(&same_title.items, |t| t.id, exclude) {
                draft.errors.add(
                    "non_field_errors",
                    "The fields technology, title must make a unique set.",
                );
            }
        }
        draft.finish()?;

        let published_date = match (is_published, published_date) {
            (true, None) => Some(Utc::now()),
            (_, date) => date,
        };

        match (existing, author) {
            (Some(current), _) => {
                let changed = Tutorial {
                    technology_id,
                    title,
                    content,
                    difficulty,
                    video_url,
                    thumbnail,
                    is_published,
                    published_date,
                    views,
                    ..current.clone()
                };
                let updated = self.store.update_tutorial(&changed, tags.as_deref()).await?;
                info!(kind = %ContentKind::Tutorial, slug = %updated.slug, "Updated content");
                Ok(updated)
            }
            (None, Some(author)) => {
                let created = self
                    .store
                    .insert_tutorial(
                        NewTutorial {
                            technology_id,
                            title,
                            slug,
                            author_id: author.id,
                            content,
                            difficulty,
                            video_url,
                            thumbnail,
                            is_published,
                            published_date,
                            views,
                        },
                        &tags.unwrap_or_default(),
                    )
                    .await?;
                info!(kind = %ContentKind::Tutorial, slug = %created.slug, author = %author.username, "Created content");
                Ok(created)
            }
            (None, None) => Err(AppError::Internal(
                "tutorial create without an author".to_string(),
            )),
        }
    }

    pub async fn create_topic(&self, input: TopicInput) -> AppResult<Topic> {
        self.save_topic(None, input, WriteMode::Replace).await
    }

    pub async fn update_topic(&self, existing: &Topic, input: TopicInput, mode: WriteMode) -> AppResult<Topic> {
        self.save_topic(Some(existing), input, mode).await
    }

    async fn save_topic(&self, existing: Option<&Topic>, input: TopicInput, mode: WriteMode) -> AppResult<Topic> {
        let mut draft = Draft::new(mode);
        let tutorial = self
            .tutorial_ref(&mut draft, input.tutorial, existing.is_some())
            .await?;
        let tutorial_id = tutorial
            .as_ref()
            .map(|t| t.id)
            .or(existing.map(|t| t.tutorial_id))
            .unwrap_or_default();
        let title = draft.required_text("title", input.title, existing.map(|t| t.title.as_str()), Some(200));
        let content = draft.required_text("content", input.content, existing.map(|t| t.content.as_str()), None);
        let video_url = draft.url("video_url", input.video_url, existing.map(|t| t.video_url.clone()));
        let order = draft.non_negative("order", input.order, existing.map(|t| t.order));
        let code_snippet = draft.optional_text(input.code_snippet, existing.map(|t| t.code_snippet.as_str()));
        let is_free = draft.optional(input.is_free, existing.map(|t| t.is_free), true);
        let tags = draft.tags(input.tags);
        let slug = match existing {
            Some(current) => current.slug.clone(),
            None => draft.new_slug(input.slug, None, &title, 200),
        };

        if draft.errors.is_empty() {
            let same_slug = self
                .store
                .topics(
                    &ListQuery::all()
                        .filter("tutorial_id", tutorial_id)
                        .filter("slug", slug.as_str()),
                )
                .await?;
            if clashes(&same_slug.items, |t| t.id, existing.map(|t| t.id)) {
                draft.errors.add(
                    "non_field_errors",
                    "The fields tutorial, slug must make a unique set.",
                );
            }
        }
        draft.finish()?;

        match existing {
            None => {
                let created = self
                    .store
                    .insert_topic(
                        NewTopic {
                            tutorial_id,
                            title,
                            slug,
                            content,
                            video_url,
                            order,
                            code_snippet,
                            is_free,
                        },
                        &tags.unwrap_or_default(),
                    )
                    .await?;
                info!(kind = %ContentKind::Topic, slug = %created.slug, tutorial = %created.tutorial_slug, "Created content");
                Ok(created)
            }
            Some(current) => {
                let changed = Topic {
                    tutorial_id,
                    title,
                    content,
                    video_url,
                    order,
                    code_snippet,
                    is_free,
                    ..current.clone()
                };
                let updated = self.store.update_topic(&changed, tags.as_deref()).await?;
                info!(kind = %ContentKind::Topic, slug = %updated.slug, "Updated content");
                Ok(updated)
            }
        }
    }

    pub async fn create_blog_post(&self, author: &User, input: BlogPostInput) -> AppResult<BlogPost> {
        self.save_blog_post(Some(author), None, input, WriteMode::Replace).await
    }

    pub async fn update_blog_post(&self, existing: &BlogPost, input: BlogPostInput, mode: WriteMode) -> AppResult<BlogPost> {
        self.save_blog_post(None, Some(existing), input, mode).await
    }

    async fn save_blog_post(
        &self,
        author: Option<&User>,
        existing: Option<&BlogPost>,
        input: BlogPostInput,
        mode: WriteMode,
    ) -> AppResult<BlogPost> {
        let mut draft = Draft::new(mode);
        let technology = self
            .technology_ref(&mut draft, input.technology, existing.is_some())
            .await?;
        let technology_id = technology
            .as_ref()
            .map(|t| t.id)
            .or(existing.map(|p| p.technology_id))
            .unwrap_or_default();
        let title = draft.required_text("title", input.title, existing.map(|p| p.title.as_str()), Some(200));
        let excerpt = draft.required_text("excerpt", input.excerpt, existing.map(|p| p.excerpt.as_str()), Some(300));
        let content = draft.required_text("content", input.content, existing.map(|p| p.content.as_str()), None);
        let thumbnail = draft.required_text(
            "thumbnail",
            input.thumbnail,
            existing.map(|p| p.thumbnail.as_str()),
            Some(100),
        );
        let is_published = draft.optional(input.is_published, existing.map(|p| p.is_published), false);
        let published_date = draft.datetime(
            "published_date",
            input.published_date,
            existing.map(|p| p.published_date),
        );
        let tags = draft.tags(input.tags);
        let slug = match existing {
            Some(current) => current.slug.clone(),
            None => draft.new_slug(
                input.slug,
                technology.as_ref().map(|t| t.slug.as_str()),
                &title,
                200,
            ),
        };

        if existing.is_none() && !draft.errors.contains("slug") && !slug.is_empty() {
            let same_slug = self.store.blog_posts(&ListQuery::all().filter("slug", slug.as_str())).await?;
            if clashes(&same_slug.items, |p| p.id, None) {
                draft.errors.add("slug", "blog post with this slug already exists.");
            }
        }
        draft.finish()?;

        let published_date = match (is_published, published_date) {
            (true, None) => Some(Utc::now()),
            (_, date) => date,
        };

        match (existing, author) {
            (Some(current), _) => {
                let changed = BlogPost {
                    technology_id,
                    title,
                    excerpt,
                    content,
                    thumbnail,
                    is_published,
                    published_date,
                    ..current.clone()
                };
                let updated = self.store.update_blog_post(&changed, tags.as_deref()).await?;
                info!(kind = %ContentKind::Blog, slug = %updated.slug, "Updated content");
                Ok(updated)
            }
            (None, Some(author)) => {
                let created = self
                    .store
                    .insert_blog_post(
                        NewBlogPost {
                            technology_id,
                            title,
                            slug,
                            author_id: author.id,
                            excerpt,
                            content,
                            thumbnail,
                            is_published,
                            published_date,
                        },
                        &tags.unwrap_or_default(),
                    )
                    .await?;
                info!(kind = %ContentKind::Blog, slug = %created.slug, author = %author.username, "Created content");
                Ok(created)
            }
            (None, None) => Err(AppError::Internal(
                "blog post create without an author".to_string(),
            )),
        }
    }

    pub async fn create_code_snippet(&self, author: &User, input: CodeSnippetInput) -> AppResult<CodeSnippet> {
        self.save_code_snippet(Some(author), None, input, WriteMode::Replace).await
    }

    pub async fn update_code_snippet(&self, existing: &CodeSnippet, input: CodeSnippetInput, mode: WriteMode) -> AppResult<CodeSnippet> {
        self.save_code_snippet(None, Some(existing), input, mode).await
    }

    async fn save_code_snippet(
        &self,
        author: Option<&User>,
        existing: Option<&CodeSnippet>,
        input: CodeSnippetInput,
        mode: WriteMode,
    ) -> AppResult<CodeSnippet> {
        let mut draft = Draft::new(mode);
        let technology = self
            .technology_ref(&mut draft, input.technology, existing.is_some())
            .await?;
        let technology_id = technology
            .as_ref()
            .map(|t| t.id)
            .or(existing.map(|s| s.technology_id))
            .unwrap_or_default();
        let title = draft.required_text("title", input.title, existing.map(|s| s.title.as_str()), Some(150));
        let description = draft.required_text(
            "description",
            input.description,
            existing.map(|s| s.description.as_str()),
            None,
        );
        let code = draft.required_text("code", input.code, existing.map(|s| s.code.as_str()), None);
        let language = draft.choice(
            "language",
            input.language,
            existing.map(|s| s.language),
            None,
            Language::parse,
            Language::Python,
        );
        let is_public = draft.optional(input.is_public, existing.map(|s| s.is_public), true);
        let tags = draft.tags(input.tags);
        let slug = match existing {
            Some(current) => current.slug.clone(),
            None => draft.new_slug(
                input.slug,
                technology.as_ref().map(|t| t.slug.as_str()),
                &title,
                150,
            ),
        };

        if existing.is_none() && !draft.errors.contains("slug") && !slug.is_empty() {
            let same_slug = self.store.code_snippets(&ListQuery::all().filter("slug", slug.as_str())).await?;
            if clashes(&same_slug.items, |s| s.id, None) {
                draft.errors.add("slug", "code snippet with this slug already exists.");
            }
        }
        draft.finish()?;

        match (existing, author) {
            (Some(current), _) => {
                let changed = CodeSnippet {
                    technology_id,
                    title,
                    description,
                    code,
                    language,
                    is_public,
                    ..current.clone()
                };
                let updated = self.store.update_code_snippet(&changed, tags.as_deref()).await?;
                info!(kind = %ContentKind::Snippet, slug = %updated.slug, "Updated content");
                Ok(updated)
            }
            (None, Some(author)) => {
                let created = self
                    .store
                    .insert_code_snippet(
                        NewCodeSnippet {
                            technology_id,
                            title,
                            slug,
                            author_id: author.id,
                            description,
                            code,
                            language,
                            is_public,
                        },
                        &tags.unwrap_or_default(),
                    )
                    .await?;
                info!(kind = %ContentKind::Snippet, slug = %created.slug, author = %author.username, "Created content");
                Ok(created)
            }
            (None, None) => Err(AppError::Internal(
                "code snippet create without an author".to_string(),
            )),
        }
    }

    /// Delete a record and everything it owns.
    pub async fn delete(&self, kind: ContentKind, id: i64) -> AppResult<()> {
        if !self.store.delete_content(kind, id).await? {
            return Err(AppError::NotFound("Not found.".to_string()));
        }
        info!(%kind, id, "Deleted content");
        Ok(())
    }
}
