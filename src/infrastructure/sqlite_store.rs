// SQLite Content Store - sqlx-backed implementation of ContentStore
// Relational tables per kind, one shared tag join table keyed by (tag, kind, entity).

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    FromRow, QueryBuilder, Row, Transaction,
};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, info};

use crate::core::{slugify, ContentKind};
use crate::error::{AppError, AppResult};
use crate::infrastructure::content_store::{ContentStore, FilterValue, ListQuery, OrderTerm, Page};
use crate::models::{
    Answer, BlogPost, CodeSnippet, NewAnswer, NewBlogPost, NewCodeSnippet, NewQuestion,
    NewTechnology, NewTopic, NewTutorial, NewUser, Question, Tag, Technology, Topic, Tutorial,
    User,
};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL DEFAULT '',
        first_name TEXT NOT NULL DEFAULT '',
        last_name TEXT NOT NULL DEFAULT '',
        is_staff INTEGER NOT NULL DEFAULT 0,
        api_token TEXT UNIQUE,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS technologies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        slug TEXT NOT NULL UNIQUE,
        logo TEXT NOT NULL,
        description TEXT NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tutorials (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        technology_id INTEGER NOT NULL REFERENCES technologies(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        content TEXT NOT NULL,
        difficulty TEXT NOT NULL DEFAULT 'beginner',
        video_url TEXT,
        thumbnail TEXT NOT NULL,
        is_published INTEGER NOT NULL DEFAULT 0,
        published_date TEXT,
        views INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (technology_id, title)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS topics (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tutorial_id INTEGER NOT NULL REFERENCES tutorials(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        slug TEXT NOT NULL,
        content TEXT NOT NULL,
        video_url TEXT,
        sort_order INTEGER NOT NULL DEFAULT 0,
        code_snippet TEXT NOT NULL DEFAULT '',
        is_free INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (tutorial_id, slug)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS blog_posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        technology_id INTEGER NOT NULL REFERENCES technologies(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        excerpt TEXT NOT NULL,
        content TEXT NOT NULL,
        thumbnail TEXT NOT NULL,
        is_published INTEGER NOT NULL DEFAULT 0,
        published_date TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS code_snippets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        technology_id INTEGER NOT NULL REFERENCES technologies(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        description TEXT NOT NULL,
        code TEXT NOT NULL,
        language TEXT NOT NULL,
        is_public INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS questions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        topic_id INTEGER NOT NULL REFERENCES topics(id) ON DELETE CASCADE,
        text TEXT NOT NULL,
        explanation TEXT NOT NULL,
        difficulty TEXT NOT NULL DEFAULT 'M',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS answers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        question_id INTEGER NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
        text TEXT NOT NULL,
        is_correct INTEGER NOT NULL DEFAULT 0,
        sort_order INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (question_id, text)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        slug TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tagged_items (
        tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
        entity_kind TEXT NOT NULL,
        entity_id INTEGER NOT NULL,
        PRIMARY KEY (tag_id, entity_kind, entity_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tagged_items_entity ON tagged_items(entity_kind, entity_id)",
    "CREATE INDEX IF NOT EXISTS idx_tutorials_technology ON tutorials(technology_id)",
    "CREATE INDEX IF NOT EXISTS idx_topics_tutorial ON topics(tutorial_id, sort_order)",
    "CREATE INDEX IF NOT EXISTS idx_blog_posts_technology ON blog_posts(technology_id)",
    "CREATE INDEX IF NOT EXISTS idx_code_snippets_technology ON code_snippets(technology_id)",
    "CREATE INDEX IF NOT EXISTS idx_questions_topic ON questions(topic_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_answers_question ON answers(question_id, sort_order)",
    // Tag links have no foreign key to their polymorphic target; these
    // triggers also fire for rows removed by ON DELETE CASCADE.
    r#"
    CREATE TRIGGER IF NOT EXISTS trg_technologies_untag AFTER DELETE ON technologies
    BEGIN
        DELETE FROM tagged_items WHERE entity_kind = 'technology' AND entity_id = OLD.id;
    END
    "#,
    r#"
    CREATE TRIGGER IF NOT EXISTS trg_tutorials_untag AFTER DELETE ON tutorials
    BEGIN
        DELETE FROM tagged_items WHERE entity_kind = 'tutorial' AND entity_id = OLD.id;
    END
    "#,
    r#"
    CREATE TRIGGER IF NOT EXISTS trg_topics_untag AFTER DELETE ON topics
    BEGIN
        DELETE FROM tagged_items WHERE entity_kind = 'topic' AND entity_id = OLD.id;
    END
    "#,
    r#"
    CREATE TRIGGER IF NOT EXISTS trg_blog_posts_untag AFTER DELETE ON blog_posts
    BEGIN
        DELETE FROM tagged_items WHERE entity_kind = 'blog' AND entity_id = OLD.id;
    END
    "#,
    r#"
    CREATE TRIGGER IF NOT EXISTS trg_code_snippets_untag AFTER DELETE ON code_snippets
    BEGIN
        DELETE FROM tagged_items WHERE entity_kind = 'snippet' AND entity_id = OLD.id;
    END
    "#,
];

/// How one kind is read: its joined FROM clause, projected columns,
/// visibility predicate, logical field → column map and natural order.
struct TableSpec {
    name: &'static str,
    from: &'static str,
    columns: &'static str,
    visibility: Option<&'static str>,
    tag_kind: Option<ContentKind>,
    fields: &'static [(&'static str, &'static str)],
    natural_order: &'static [OrderTerm],
}

impl TableSpec {
    fn column(&self, field: &str) -> AppResult<&'static str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
            .ok_or_else(|| {
                AppError::Internal(format!("Unknown field '{}' for {}", field, self.name))
            })
    }
}

const TECHNOLOGIES: TableSpec = TableSpec {
    name: "technologies",
    from: "technologies t",
    columns: "t.id, t.name, t.slug, t.logo, t.description, t.is_active, t.created_at, t.updated_at",
    visibility: Some("t.is_active = 1"),
    tag_kind: Some(ContentKind::Technology),
    fields: &[
        ("id", "t.id"),
        ("name", "t.name"),
        ("slug", "t.slug"),
        ("description", "t.description"),
        ("is_active", "t.is_active"),
        ("created_at", "t.created_at"),
    ],
    natural_order: &[OrderTerm { field: "name", descending: false }],
};

const TUTORIALS: TableSpec = TableSpec {
    name: "tutorials",
    from: "tutorials t \
           JOIN technologies tech ON tech.id = t.technology_id \
           JOIN users u ON u.id = t.author_id",
    columns: "t.id, t.technology_id, tech.slug AS technology_slug, tech.name AS technology_name, \
              t.title, t.slug, t.author_id, u.username AS author_username, t.content, \
              t.difficulty, t.video_url, t.thumbnail, t.is_published, t.published_date, \
              t.views, t.created_at, t.updated_at",
    visibility: Some("t.is_published = 1"),
    tag_kind: Some(ContentKind::Tutorial),
    fields: &[
        ("id", "t.id"),
        ("technology_id", "t.technology_id"),
        ("technology", "tech.slug"),
        ("title", "t.title"),
        ("slug", "t.slug"),
        ("content", "t.content"),
        ("difficulty", "t.difficulty"),
        ("is_published", "t.is_published"),
        ("published_date", "t.published_date"),
        ("views", "t.views"),
        ("created_at", "t.created_at"),
    ],
    natural_order: &[OrderTerm { field: "published_date", descending: true }],
};

const TOPICS: TableSpec = TableSpec {
    name: "topics",
    from: "topics t JOIN tutorials tu ON tu.id = t.tutorial_id",
    columns: "t.id, t.tutorial_id, tu.slug AS tutorial_slug, tu.title AS tutorial_title, \
              t.title, t.slug, t.content, t.video_url, t.sort_order, t.code_snippet, \
              t.is_free, t.created_at, t.updated_at",
    visibility: None,
    tag_kind: Some(ContentKind::Topic),
    fields: &[
        ("id", "t.id"),
        ("tutorial_id", "t.tutorial_id"),
        ("tutorial", "tu.slug"),
        ("title", "t.title"),
        ("slug", "t.slug"),
        ("content", "t.content"),
        ("is_free", "t.is_free"),
        ("order", "t.sort_order"),
    ],
    natural_order: &[OrderTerm { field: "order", descending: false }],
};

const BLOG_POSTS: TableSpec = TableSpec {
    name: "blog_posts",
    from: "blog_posts t \
           JOIN technologies tech ON tech.id = t.technology_id \
           JOIN users u ON u.id = t.author_id",
    columns: "t.id, t.technology_id, tech.slug AS technology_slug, tech.name AS technology_name, \
              t.title, t.slug, t.author_id, u.username AS author_username, t.excerpt, \
              t.content, t.thumbnail, t.is_published, t.published_date, t.created_at, \
              t.updated_at",
    visibility: Some("t.is_published = 1"),
    tag_kind: Some(ContentKind::Blog),
    fields: &[
        ("id", "t.id"),
        ("technology_id", "t.technology_id"),
        ("technology", "tech.slug"),
        ("title", "t.title"),
        ("slug", "t.slug"),
        ("excerpt", "t.excerpt"),
        ("content", "t.content"),
        ("is_published", "t.is_published"),
        ("published_date", "t.published_date"),
        ("created_at", "t.created_at"),
    ],
    natural_order: &[OrderTerm { field: "published_date", descending: true }],
};

const CODE_SNIPPETS: TableSpec = TableSpec {
    name: "code_snippets",
    from: "code_snippets t \
           JOIN technologies tech ON tech.id = t.technology_id \
           JOIN users u ON u.id = t.author_id",
    columns: "t.id, t.technology_id, tech.slug AS technology_slug, tech.name AS technology_name, \
              t.title, t.slug, t.author_id, u.username AS author_username, t.description, \
              t.code, t.language, t.is_public, t.created_at, t.updated_at",
    visibility: Some("t.is_public = 1"),
    tag_kind: Some(ContentKind::Snippet),
    fields: &[
        ("id", "t.id"),
        ("technology_id", "t.technology_id"),
        ("technology", "tech.slug"),
        ("title", "t.title"),
        ("slug", "t.slug"),
        ("description", "t.description"),
        ("code", "t.code"),
        ("language", "t.language"),
        ("is_public", "t.is_public"),
        ("created_at", "t.created_at"),
    ],
    natural_order: &[OrderTerm { field: "created_at", descending: true }],
};

const QUESTIONS: TableSpec = TableSpec {
    name: "questions",
    from: "questions t JOIN topics tp ON tp.id = t.topic_id",
    columns: "t.id, t.topic_id, tp.title AS topic_title, t.text, t.explanation, t.difficulty, \
              t.created_at, t.updated_at",
    visibility: None,
    tag_kind: None,
    fields: &[
        ("id", "t.id"),
        ("topic_id", "t.topic_id"),
        ("created_at", "t.created_at"),
    ],
    natural_order: &[OrderTerm { field: "created_at", descending: false }],
};

const ANSWERS: TableSpec = TableSpec {
    name: "answers",
    from: "answers t JOIN questions q ON q.id = t.question_id",
    columns: "t.id, t.question_id, q.text AS question_text, t.text, t.is_correct, t.sort_order, \
              t.created_at, t.updated_at",
    visibility: None,
    tag_kind: None,
    fields: &[
        ("id", "t.id"),
        ("question_id", "t.question_id"),
        ("text", "t.text"),
        ("order", "t.sort_order"),
    ],
    natural_order: &[OrderTerm { field: "order", descending: false }],
};

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, is_staff, created_at";

/// SQLite implementation of the content store
pub struct SqliteContentStore {
    pool: SqlitePool,
}

impl SqliteContentStore {
    /// Open (creating if missing) the database at `url` and make sure the schema exists.
    /// In-memory databases are pinned to one never-recycled connection so the
    /// data outlives individual checkouts.
    pub async fn connect(url: &str, max_connections: u32) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::Configuration(format!("Invalid database URL {}: {}", url, e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(max_connections)
                .connect_with(options)
                .await?
        };

        let store = Self { pool };
        store.initialize().await?;
        info!(url, in_memory, "Content store ready");
        Ok(store)
    }

    pub async fn new_in_memory() -> AppResult<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    /// Create tables, indexes and triggers when they do not exist yet.
    pub async fn initialize(&self) -> AppResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn fetch_page<T>(&self, spec: &TableSpec, query: &ListQuery) -> AppResult<Page<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM ");
        count_qb.push(spec.from);
        push_conditions(&mut count_qb, spec, query)?;
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT ");
        qb.push(spec.columns);
        qb.push(" FROM ");
        qb.push(spec.from);
        push_conditions(&mut qb, spec, query)?;
        push_ordering(&mut qb, spec, &query.ordering)?;
        if let Some(limit) = query.limit {
            qb.push(" LIMIT ");
            qb.push_bind(limit);
            qb.push(" OFFSET ");
            qb.push_bind(query.offset.unwrap_or(0));
        }

        let items = qb.build_query_as::<T>().fetch_all(&self.pool).await?;
        debug!(table = spec.name, total, returned = items.len(), "Collection scan");
        Ok(Page { items, total })
    }

    async fn user_by_id(&self, id: i64) -> AppResult<User> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }
}

fn push_conditions(
    qb: &mut QueryBuilder<'_, Sqlite>,
    spec: &TableSpec,
    query: &ListQuery,
) -> AppResult<()> {
    qb.push(" WHERE 1 = 1");

    if query.visible_only {
        if let Some(predicate) = spec.visibility {
            qb.push(" AND ");
            qb.push(predicate);
        }
    }

    for filter in &query.filters {
        qb.push(" AND ");
        qb.push(spec.column(filter.field)?);
        qb.push(" = ");
        match &filter.value {
            FilterValue::Bool(value) => qb.push_bind(*value),
            FilterValue::Int(value) => qb.push_bind(*value),
            FilterValue::Text(value) => qb.push_bind(value.clone()),
        };
    }

    if let Some(search) = &query.search {
        for term in &search.terms {
            let pattern = format!("%{}%", escape_like(term));
            qb.push(" AND (");
            for (idx, field) in search.fields.iter().enumerate() {
                if idx > 0 {
                    qb.push(" OR ");
                }
                qb.push(spec.column(field)?);
                qb.push(" LIKE ");
                qb.push_bind(pattern.clone());
                qb.push(" ESCAPE '\\'");
            }
            qb.push(")");
        }
    }

    if let Some(tag) = &query.tag {
        let kind = spec.tag_kind.ok_or_else(|| {
            AppError::Internal(format!("{} rows cannot be tagged", spec.name))
        })?;
        qb.push(
            " AND EXISTS (SELECT 1 FROM tagged_items ti JOIN tags g ON g.id = ti.tag_id \
             WHERE ti.entity_id = t.id AND ti.entity_kind = ",
        );
        qb.push_bind(kind.as_str());
        qb.push(" AND g.slug = ");
        qb.push_bind(tag.clone());
        qb.push(")");
    }

    Ok(())
}

fn push_ordering(
    qb: &mut QueryBuilder<'_, Sqlite>,
    spec: &TableSpec,
    ordering: &[OrderTerm],
) -> AppResult<()> {
    let terms = if ordering.is_empty() {
        spec.natural_order
    } else {
        ordering
    };
    qb.push(" ORDER BY ");
    for term in terms {
        qb.push(spec.column(term.field)?);
        qb.push(if term.descending { " DESC, " } else { " ASC, " });
    }
    // Stable tie-break so equal sort keys page deterministically.
    qb.push("t.id ASC");
    Ok(())
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn expect_written<T>(page: Page<T>, table: &str, id: i64) -> AppResult<T> {
    page.first()
        .ok_or_else(|| AppError::Internal(format!("{} row {} missing after write", table, id)))
}

fn ensure_updated(rows_affected: u64, table: &str, id: i64) -> AppResult<()> {
    if rows_affected == 0 {
        return Err(AppError::NotFound(format!("{} row {} not found", table, id)));
    }
    Ok(())
}

/// Resolve a tag name to its id, creating the tag with a unique slug if needed.
async fn ensure_tag(tx: &mut Transaction<'_, Sqlite>, name: &str) -> AppResult<i64> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM tags WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut **tx)
        .await?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let base = match slugify(name) {
        slug if slug.is_empty() => "tag".to_string(),
        slug => slug,
    };
    let mut candidate = base.clone();
    let mut suffix = 1;
    loop {
        let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM tags WHERE slug = ?")
            .bind(candidate.as_str())
            .fetch_optional(&mut **tx)
            .await?;
        if taken.is_none() {
            break;
        }
        candidate = format!("{}_{}", base, suffix);
        suffix += 1;
    }

    let id = sqlx::query("INSERT INTO tags (name, slug) VALUES (?, ?)")
        .bind(name)
        .bind(candidate.as_str())
        .execute(&mut **tx)
        .await?
        .last_insert_rowid();
    debug!(tag = name, slug = %candidate, "Created tag");
    Ok(id)
}

async fn replace_tags(
    tx: &mut Transaction<'_, Sqlite>,
    kind: ContentKind,
    entity_id: i64,
    names: &[String],
) -> AppResult<()> {
    sqlx::query("DELETE FROM tagged_items WHERE entity_kind = ? AND entity_id = ?")
        .bind(kind.as_str())
        .bind(entity_id)
        .execute(&mut **tx)
        .await?;

    for name in names {
        let tag_id = ensure_tag(tx, name).await?;
        sqlx::query(
            "INSERT OR IGNORE INTO tagged_items (tag_id, entity_kind, entity_id) VALUES (?, ?, ?)",
        )
        .bind(tag_id)
        .bind(kind.as_str())
        .bind(entity_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl ContentStore for SqliteContentStore {
    async fn user_by_token(&self, token: &str) -> AppResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE api_token = ?", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn save_user(&self, user: NewUser) -> AppResult<User> {
        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
            .bind(user.username.as_str())
            .fetch_optional(&self.pool)
            .await?;

        let id = match existing {
            Some(id) => {
                sqlx::query(
                    "UPDATE users SET email = ?, first_name = ?, last_name = ?, is_staff = ?, api_token = ? WHERE id = ?",
                )
                .bind(user.email)
                .bind(user.first_name)
                .bind(user.last_name)
                .bind(user.is_staff)
                .bind(user.api_token)
                .bind(id)
                .execute(&self.pool)
                .await?;
                id
            }
            None => sqlx::query(
                "INSERT INTO users (username, email, first_name, last_name, is_staff, api_token, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(user.username)
            .bind(user.email)
            .bind(user.first_name)
            .bind(user.last_name)
            .bind(user.is_staff)
            .bind(user.api_token)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .last_insert_rowid(),
        };

        self.user_by_id(id).await
    }

    async fn technologies(&self, query: &ListQuery) -> AppResult<Page<Technology>> {
        self.fetch_page(&TECHNOLOGIES, query).await
    }

    async fn tutorials(&self, query: &ListQuery) -> AppResult<Page<Tutorial>> {
        self.fetch_page(&TUTORIALS, query).await
    }

    async fn topics(&self, query: &ListQuery) -> AppResult<Page<Topic>> {
        self.fetch_page(&TOPICS, query).await
    }

    async fn blog_posts(&self, query: &ListQuery) -> AppResult<Page<BlogPost>> {
        self.fetch_page(&BLOG_POSTS, query).await
    }

    async fn code_snippets(&self, query: &ListQuery) -> AppResult<Page<CodeSnippet>> {
        self.fetch_page(&CODE_SNIPPETS, query).await
    }

    async fn questions(&self, query: &ListQuery) -> AppResult<Page<Question>> {
        self.fetch_page(&QUESTIONS, query).await
    }

    async fn answers(&self, query: &ListQuery) -> AppResult<Page<Answer>> {
        self.fetch_page(&ANSWERS, query).await
    }

    async fn answers_for(&self, question_ids: &[i64]) -> AppResult<HashMap<i64, Vec<Answer>>> {
        let mut grouped: HashMap<i64, Vec<Answer>> = HashMap::new();
        if question_ids.is_empty() {
            return Ok(grouped);
        }

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT ");
        qb.push(ANSWERS.columns);
        qb.push(" FROM ");
        qb.push(ANSWERS.from);
        qb.push(" WHERE t.question_id IN (");
        let mut separated = qb.separated(", ");
        for id in question_ids {
            separated.push_bind(*id);
        }
        qb.push(") ORDER BY t.question_id, t.sort_order, t.id");

        let answers = qb.build_query_as::<Answer>().fetch_all(&self.pool).await?;
        for answer in answers {
            grouped.entry(answer.question_id).or_default().push(answer);
        }
        Ok(grouped)
    }

    async fn insert_technology(&self, new: NewTechnology, tags: &[String]) -> AppResult<Technology> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let id = sqlx::query(
            "INSERT INTO technologies (name, slug, logo, description, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new.name)
        .bind(new.slug)
        .bind(new.logo)
        .bind(new.description)
        .bind(new.is_active)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        replace_tags(&mut tx, ContentKind::Technology, id, tags).await?;
        tx.commit().await?;

        expect_written(self.technologies(&ListQuery::all().filter("id", id)).await?, "technologies", id)
    }

    async fn update_technology(&self, technology: &Technology, tags: Option<&[String]>) -> AppResult<Technology> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE technologies SET name = ?, logo = ?, description = ?, is_active = ?, updated_at = ? WHERE id = ?",
        )
        .bind(technology.name.as_str())
        .bind(technology.logo.as_str())
        .bind(technology.description.as_str())
        .bind(technology.is_active)
        .bind(Utc::now())
        .bind(technology.id)
        .execute(&mut *tx)
        .await?;
        ensure_updated(result.rows_affected(), "technologies", technology.id)?;
        if let Some(tags) = tags {
            replace_tags(&mut tx, ContentKind::Technology, technology.id, tags).await?;
        }
        tx.commit().await?;

        expect_written(
            self.technologies(&ListQuery::all().filter("id", technology.id)).await?,
            "technologies",
            technology.id,
        )
    }

    async fn insert_tutorial(&self, new: NewTutorial, tags: &[String]) -> AppResult<Tutorial> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let id = sqlx::query(
            "INSERT INTO tutorials (technology_id, title, slug, author_id, content, difficulty, video_url, thumbnail, is_published, published_date, views, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new.technology_id)
        .bind(new.title)
        .bind(new.slug)
        .bind(new.author_id)
        .bind(new.content)
        .bind(new.difficulty)
        .bind(new.video_url)
        .bind(new.thumbnail)
        .bind(new.is_published)
        .bind(new.published_date)
        .bind(new.views)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        replace_tags(&mut tx, ContentKind::Tutorial, id, tags).await?;
        tx.commit().await?;

        expect_written(self.tutorials(&ListQuery::all().filter("id", id)).await?, "tutorials", id)
    }

    async fn update_tutorial(&self, tutorial: &Tutorial, tags: Option<&[String]>) -> AppResult<Tutorial> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE tutorials SET technology_id = ?, title = ?, content = ?, difficulty = ?, video_url = ?, thumbnail = ?, \
             is_published = ?, published_date = ?, views = ?, updated_at = ? WHERE id = ?",
        )
        .bind(tutorial.technology_id)
        .bind(tutorial.title.as_str())
        .bind(tutorial.content.as_str())
        .bind(tutorial.difficulty)
        .bind(tutorial.video_url.clone())
        .bind(tutorial.thumbnail.as_str())
        .bind(tutorial.is_published)
        .bind(tutorial.published_date)
        .bind(tutorial.views)
        .bind(Utc::now())
        .bind(tutorial.id)
        .execute(&mut *tx)
        .await?;
        ensure_updated(result.rows_affected(), "tutorials", tutorial.id)?;
        if let Some(tags) = tags {
            replace_tags(&mut tx, ContentKind::Tutorial, tutorial.id, tags).await?;
        }
        tx.commit().await?;

        expect_written(
            self.tutorials(&ListQuery::all().filter("id", tutorial.id)).await?,
            "tutorials",
            tutorial.id,
        )
    }

    async fn insert_topic(&self, new: NewTopic, tags: &[String]) -> AppResult<Topic> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let id = sqlx::query(
            "INSERT INTO topics (tutorial_id, title, slug, content, video_url, sort_order, code_snippet, is_free, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new.tutorial_id)
        .bind(new.title)
        .bind(new.slug)
        .bind(new.content)
        .bind(new.video_url)
        .bind(new.order)
        .bind(new.code_snippet)
        .bind(new.is_free)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        replace_tags(&mut tx, ContentKind::Topic, id, tags).await?;
        tx.commit().await?;

        expect_written(self.topics(&ListQuery::all().filter("id", id)).await?, "topics", id)
    }

    async fn update_topic(&self, topic: &Topic, tags: Option<&[String]>) -> AppResult<Topic> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE topics SET tutorial_id = ?, title = ?, content = ?, video_url = ?, sort_order = ?, code_snippet = ?, \
             is_free = ?, updated_at = ? WHERE id = ?",
        )
        .bind(topic.tutorial_id)
        .bind(topic.title.as_str())
        .bind(topic.content.as_str())
        .bind(topic.video_url.clone())
        .bind(topic.order)
        .bind(topic.code_snippet.as_str())
        .bind(topic.is_free)
        .bind(Utc::now())
        .bind(topic.id)
        .execute(&mut *tx)
        .await?;
        ensure_updated(result.rows_affected(), "topics", topic.id)?;
        if let Some(tags) = tags {
            replace_tags(&mut tx, ContentKind::Topic, topic.id, tags).await?;
        }
        tx.commit().await?;

        expect_written(self.topics(&ListQuery::all().filter("id", topic.id)).await?, "topics", topic.id)
    }

    async fn insert_blog_post(&self, new: NewBlogPost, tags: &[String]) -> AppResult<BlogPost> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let id = sqlx::query(
            "INSERT INTO blog_posts (technology_id, title, slug, author_id, excerpt, content, thumbnail, is_published, published_date, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new.technology_id)
        .bind(new.title)
        .bind(new.slug)
        .bind(new.author_id)
        .bind(new.excerpt)
        .bind(new.content)
        .bind(new.thumbnail)
        .bind(new.is_published)
        .bind(new.published_date)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        replace_tags(&mut tx, ContentKind::Blog, id, tags).await?;
        tx.commit().await?;

        expect_written(self.blog_posts(&ListQuery::all().filter("id", id)).await?, "blog_posts", id)
    }

    async fn update_blog_post(&self, post: &BlogPost, tags: Option<&[String]>) -> AppResult<BlogPost> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE blog_posts SET technology_id = ?, title = ?, excerpt = ?, content = ?, thumbnail = ?, is_published = ?, \
             published_date = ?, updated_at = ? WHERE id = ?",
        )
        .bind(post.technology_id)
        .bind(post.title.as_str())
        .bind(post.excerpt.as_str())
        .bind(post.content.as_str())
        .bind(post.thumbnail.as_str())
        .bind(post.is_published)
        .bind(post.published_date)
        .bind(Utc::now())
        .bind(post.id)
        .execute(&mut *tx)
        .await?;
        ensure_updated(result.rows_affected(), "blog_posts", post.id)?;
        if let Some(tags) = tags {
            replace_tags(&mut tx, ContentKind::Blog, post.id, tags).await?;
        }
        tx.commit().await?;

        expect_written(self.blog_posts(&ListQuery::all().filter("id", post.id)).await?, "blog_posts", post.id)
    }

    async fn insert_code_snippet(&self, new: NewCodeSnippet, tags: &[String]) -> AppResult<CodeSnippet> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let id = sqlx::query(
            "INSERT INTO code_snippets (technology_id, title, slug, author_id, description, code, language, is_public, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new.technology_id)
        .bind(new.title)
        .bind(new.slug)
        .bind(new.author_id)
        .bind(new.description)
        .bind(new.code)
        .bind(new.language)
        .bind(new.is_public)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        replace_tags(&mut tx, ContentKind::Snippet, id, tags).await?;
        tx.commit().await?;

        expect_written(self.code_snippets(&ListQuery::all().filter("id", id)).await?, "code_snippets", id)
    }

    async fn update_code_snippet(&self, snippet: &CodeSnippet, tags: Option<&[String]>) -> AppResult<CodeSnippet> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE code_snippets SET technology_id = ?, title = ?, description = ?, code = ?, language = ?, is_public = ?, \
             updated_at = ? WHERE id = ?",
        )
        .bind(snippet.technology_id)
        .bind(snippet.title.as_str())
        .bind(snippet.description.as_str())
        .bind(snippet.code.as_str())
        .bind(snippet.language)
        .bind(snippet.is_public)
        .bind(Utc::now())
        .bind(snippet.id)
        .execute(&mut *tx)
        .await?;
        ensure_updated(result.rows_affected(), "code_snippets", snippet.id)?;
        if let Some(tags) = tags {
            replace_tags(&mut tx, ContentKind::Snippet, snippet.id, tags).await?;
        }
        tx.commit().await?;

        expect_written(
            self.code_snippets(&ListQuery::all().filter("id", snippet.id)).await?,
            "code_snippets",
            snippet.id,
        )
    }

    async fn insert_question(&self, new: NewQuestion) -> AppResult<Question> {
        let now = Utc::now();
        let id = sqlx::query(
            "INSERT INTO questions (topic_id, text, explanation, difficulty, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(new.topic_id)
        .bind(new.text)
        .bind(new.explanation)
        .bind(new.difficulty)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        expect_written(self.questions(&ListQuery::all().filter("id", id)).await?, "questions", id)
    }

    async fn insert_answer(&self, new: NewAnswer) -> AppResult<Answer> {
        let now = Utc::now();
        let id = sqlx::query(
            "INSERT INTO answers (question_id, text, is_correct, sort_order, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(new.question_id)
        .bind(new.text)
        .bind(new.is_correct)
        .bind(new.order)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        expect_written(self.answers(&ListQuery::all().filter("id", id)).await?, "answers", id)
    }

    async fn delete_content(&self, kind: ContentKind, id: i64) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?", kind.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_tags(&self) -> AppResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(tags)
    }

    async fn tag_by_slug(&self, slug: &str) -> AppResult<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tag)
    }

    async fn tag_names(&self, kind: ContentKind, ids: &[i64]) -> AppResult<HashMap<i64, Vec<String>>> {
        let mut names: HashMap<i64, Vec<String>> = HashMap::new();
        if ids.is_empty() {
            return Ok(names);
        }

        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT ti.entity_id, g.name FROM tagged_items ti JOIN tags g ON g.id = ti.tag_id WHERE ti.entity_kind = ",
        );
        qb.push_bind(kind.as_str());
        qb.push(" AND ti.entity_id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        qb.push(") ORDER BY g.name");

        let rows = qb.build().fetch_all(&self.pool).await?;
        for row in rows {
            let entity_id: i64 = row.get("entity_id");
            let name: String = row.get("name");
            names.entry(entity_id).or_default().push(name);
        }
        Ok(names)
    }

    async fn is_empty(&self) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM technologies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count == 0)
    }
}
