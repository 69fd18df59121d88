// Shared harness: in-process router over an in-memory store with two accounts.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use techlearn::{
    create_content_router, infrastructure::SqliteContentStore, models::NewUser, AppState, Config,
};

pub const ADMIN_TOKEN: &str = "admin-token";
pub const READER_TOKEN: &str = "reader-token";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub async fn spawn_app() -> TestApp {
    let store = Arc::new(SqliteContentStore::new_in_memory().await.unwrap());
    let state = AppState::with_store(store, Config::default());
    seed_accounts(&state).await;
    TestApp {
        router: create_content_router(state.clone()),
        state,
    }
}

pub async fn seed_accounts(state: &AppState) {
    for (username, is_staff, token) in [("admin", true, ADMIN_TOKEN), ("reader", false, READER_TOKEN)] {
        state
            .store
            .save_user(NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                is_staff,
                api_token: Some(token.to_string()),
                ..NewUser::default()
            })
            .await
            .unwrap();
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    /// Send a body verbatim, for payloads that are not valid JSON values.
    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        content_type: &str,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", content_type);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None, None).await
    }

    pub async fn admin(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(method, uri, Some(ADMIN_TOKEN), Some(body)).await
    }

    /// Create through the API as staff, asserting 201.
    pub async fn create(&self, uri: &str, body: Value) -> Value {
        let (status, created) = self.admin("POST", uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "POST {} failed: {}", uri, created);
        created
    }

    pub async fn technology(&self, name: &str, is_active: bool, tags: &[&str]) -> Value {
        self.create(
            "/technologies/",
            json!({
                "name": name,
                "logo": format!("tech_logos/{}.png", name.to_lowercase()),
                "description": format!("Learn {}", name),
                "is_active": is_active,
                "tags": tags,
            }),
        )
        .await
    }

    pub async fn tutorial(&self, technology: &str, title: &str, published: Option<&str>, tags: &[&str]) -> Value {
        self.create(
            "/tutorials/",
            json!({
                "technology": technology,
                "title": title,
                "content": format!("{} ", title).repeat(120 / (title.len() + 1) + 1),
                "thumbnail": "tutorial_thumbnails/cover.png",
                "is_published": published.is_some(),
                "published_date": published.unwrap_or(""),
                "tags": tags,
            }),
        )
        .await
    }

    pub async fn topic(&self, tutorial: &str, title: &str, order: i64) -> Value {
        self.create(
            "/topics/",
            json!({
                "tutorial": tutorial,
                "title": title,
                "content": format!("All about {}", title),
                "order": order,
            }),
        )
        .await
    }

    pub async fn blog(&self, technology: &str, title: &str, published: Option<&str>) -> Value {
        self.create(
            "/blogs/",
            json!({
                "technology": technology,
                "title": title,
                "excerpt": format!("{} in brief", title),
                "content": format!("{} in full", title),
                "thumbnail": "blog_thumbnails/cover.png",
                "is_published": published.is_some(),
                "published_date": published.unwrap_or(""),
            }),
        )
        .await
    }

    pub async fn snippet(&self, technology: &str, title: &str, is_public: bool) -> Value {
        self.create(
            "/snippets/",
            json!({
                "technology": technology,
                "title": title,
                "description": format!("{} example", title),
                "code": "fmt.Println(\"hi\")",
                "language": "go",
                "is_public": is_public,
            }),
        )
        .await
    }
}

pub fn slugs(items: &Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["slug"].as_str().unwrap().to_string())
        .collect()
}

pub fn result_slugs(page: &Value) -> Vec<String> {
    slugs(&page["results"])
}
