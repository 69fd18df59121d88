mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{result_slugs, slugs, spawn_app};

#[tokio::test]
async fn test_tag_browse_end_to_end() {
    let app = spawn_app().await;

    let go = app.technology("Go", true, &["beginner"]).await;
    assert_eq!(go["slug"], "go");
    let tutorial = app
        .tutorial("go", "Getting Started", Some("2024-01-10T09:00:00Z"), &["beginner"])
        .await;
    assert_eq!(tutorial["slug"], "go-getting-started");
    app.technology("Rust", true, &["systems"]).await;

    let (status, technologies) = app.get("/tags/beginner/technology/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slugs(&technologies), vec!["go"]);
    assert_eq!(technologies[0]["name"], "Go");
    assert_eq!(technologies[0]["tags"], json!(["beginner"]));

    let (status, tutorials) = app.get("/tags/beginner/tutorial/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slugs(&tutorials), vec!["go-getting-started"]);
    assert_eq!(tutorials[0]["technology"], "go");
}

#[tokio::test]
async fn test_tag_browse_edge_cases() {
    let app = spawn_app().await;
    app.technology("Go", true, &["beginner"]).await;

    // Unsupported kinds return an empty list even for unknown tags.
    let (status, body) = app.get("/tags/beginner/topic/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    let (status, body) = app.get("/tags/nope/widget").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    // Known tag, known kind, nothing tagged.
    let (status, body) = app.get("/tags/beginner/snippet/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = app.get("/tags/missing/technology/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Tag 'missing' not found.");
}

#[tokio::test]
async fn test_tag_vocabulary_listing() {
    let app = spawn_app().await;
    app.technology("Go", true, &["beginner", "Web Dev"]).await;
    app.technology("Rust", true, &["beginner"]).await;

    let (status, tags) = app.get("/tags/").await;
    assert_eq!(status, StatusCode::OK);
    let mut found = slugs(&tags);
    found.sort();
    assert_eq!(found, vec!["beginner", "web-dev"]);
}

#[tokio::test]
async fn test_technology_detail_embeds_minimal_children() {
    let app = spawn_app().await;
    app.technology("Go", true, &[]).await;
    app.tutorial("go", "Getting Started", Some("2024-01-10T09:00:00Z"), &[]).await;
    app.tutorial("go", "Draft Notes", None, &[]).await;
    app.blog("go", "Release Notes", Some("2024-02-01T00:00:00Z")).await;
    app.snippet("go", "Hello", true).await;
    app.snippet("go", "Secret", false).await;

    let (status, detail) = app.get("/technologies/go/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["name"], "Go");
    assert_eq!(detail["logo"], "http://localhost:8000/media/tech_logos/go.png");

    assert_eq!(slugs(&detail["tutorials"]), vec!["go-getting-started"]);
    let tutorial = &detail["tutorials"][0];
    assert!(tutorial.get("content").is_none());
    assert!(tutorial.get("tags").is_none());
    assert_eq!(tutorial["title"], "Getting Started");

    assert_eq!(slugs(&detail["blog_posts"]), vec!["go-release-notes"]);
    assert!(detail["blog_posts"][0].get("content").is_none());
    assert_eq!(slugs(&detail["code_snippets"]), vec!["go-hello"]);
    assert!(detail["code_snippets"][0].get("code").is_none());
}

#[tokio::test]
async fn test_tutorial_detail_embeds_full_topics() {
    let app = spawn_app().await;
    app.technology("Go", true, &[]).await;
    app.tutorial("go", "Getting Started", Some("2024-01-10T09:00:00Z"), &[]).await;
    app.topic("go-getting-started", "Variables", 2).await;
    app.topic("go-getting-started", "Install", 1).await;

    let (status, detail) = app.get("/tutorials/go-getting-started").await;
    assert_eq!(status, StatusCode::OK);
    assert!(detail["content"].as_str().unwrap().len() >= 100);
    assert_eq!(slugs(&detail["topics"]), vec!["install", "variables"]);
    assert_eq!(detail["topics"][0]["content"], "All about Install");
    assert_eq!(detail["topics"][0]["order"], 1);
}

#[tokio::test]
async fn test_lists_apply_visibility_and_ordering() {
    let app = spawn_app().await;
    app.technology("Go", true, &[]).await;
    app.technology("Zig", false, &[]).await;
    app.tutorial("go", "Alpha", Some("2024-01-01T00:00:00Z"), &[]).await;
    app.tutorial("go", "Beta", Some("2024-03-01T00:00:00Z"), &[]).await;
    app.tutorial("go", "Gamma", None, &[]).await;

    let (status, page) = app.get("/technologies/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_slugs(&page), vec!["go"]);
    let (status, _) = app.get("/technologies/zig/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Newest first by default.
    let (_, page) = app.get("/tutorials/").await;
    assert_eq!(page["count"], 2);
    assert_eq!(result_slugs(&page), vec!["go-beta", "go-alpha"]);

    let (_, page) = app.get("/tutorials/?ordering=published_date").await;
    assert_eq!(result_slugs(&page), vec!["go-alpha", "go-beta"]);

    // Terms outside the allow-list are ignored.
    let (status, page) = app.get("/tutorials/?ordering=title").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_slugs(&page), vec!["go-beta", "go-alpha"]);

    let (_, page) = app.get("/tutorials/?ordering=-title,published_date").await;
    assert_eq!(result_slugs(&page), vec!["go-alpha", "go-beta"]);
}

#[tokio::test]
async fn test_pagination_search_and_filters() {
    let app = spawn_app().await;
    app.technology("Go", true, &[]).await;
    app.technology("Python", true, &[]).await;
    for name in ["Loops", "Maps", "Channels"] {
        app.snippet("go", name, true).await;
    }
    app.snippet("python", "Comprehensions", true).await;

    let (status, page) = app.get("/snippets/?page_size=2&page=2&ordering=created_at").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 4);
    assert_eq!(page["page"], 2);
    assert_eq!(page["page_size"], 2);
    assert_eq!(result_slugs(&page), vec!["go-channels", "python-comprehensions"]);

    let (status, _) = app.get("/snippets/?page_size=2&page=3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = app.get("/snippets/?page=abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid page.");

    let (_, page) = app.get("/snippets/?technology=python").await;
    assert_eq!(result_slugs(&page), vec!["python-comprehensions"]);

    let (_, page) = app.get("/snippets/?search=maps").await;
    assert_eq!(result_slugs(&page), vec!["go-maps"]);

    let (status, body) = app.get("/snippets/?technology=cobol").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["technology"].is_array());

    let (status, body) = app.get("/snippets/?language=klingon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["language"].is_array());

    let (status, page) = app.get("/snippets/?language=go").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 4);
}

#[tokio::test]
async fn test_quiz_endpoints_nest_answers() {
    let app = spawn_app().await;
    techlearn::data_seeder::seed_sample_content(&app.state).await.unwrap();

    let (status, page) = app.get("/questions/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 1);
    let question = &page["results"][0];
    let answers = question["answers"].as_array().unwrap();
    assert_eq!(answers.len(), 3);
    assert_eq!(answers.iter().filter(|a| a["is_correct"] == Value::Bool(true)).count(), 1);

    let id = question["id"].as_i64().unwrap();
    let (status, detail) = app.get(&format!("/questions/{}/", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["text"], question["text"]);

    let (status, page) = app.get("/answers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 3);

    let (status, _) = app.get("/questions/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = app.get("/answers/abc/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found.");
}

#[tokio::test]
async fn test_health_and_trailing_slash_variants() {
    let app = spawn_app().await;
    app.technology("Go", true, &[]).await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    for uri in ["/technologies", "/technologies/", "/technologies/go", "/technologies/go/"] {
        let (status, _) = app.get(uri).await;
        assert_eq!(status, StatusCode::OK, "GET {}", uri);
    }
}

#[tokio::test]
async fn test_media_urls_follow_request_host() {
    let app = spawn_app().await;
    app.technology("Go", true, &[]).await;

    let request = axum::http::Request::builder()
        .uri("/technologies/go/")
        .header("host", "api.example.com")
        .header("x-forwarded-proto", "https")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let detail: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(detail["logo"], "https://api.example.com/media/tech_logos/go.png");
}

#[tokio::test]
async fn test_blog_list_hides_unpublished_posts() {
    let app = spawn_app().await;
    app.technology("Go", true, &[]).await;
    app.blog("go", "January Notes", Some("2024-01-15T00:00:00Z")).await;
    app.blog("go", "Unreleased Draft", None).await;
    app.blog("go", "March Notes", Some("2024-03-15T00:00:00Z")).await;
    app.blog("go", "Another Draft", None).await;

    let (status, page) = app.get("/blogs/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 2);
    assert_eq!(result_slugs(&page), vec!["go-march-notes", "go-january-notes"]);

    let (_, page) = app.get("/blogs/?ordering=published_date").await;
    assert_eq!(result_slugs(&page), vec!["go-january-notes", "go-march-notes"]);

    // Asking for unpublished rows cannot widen the visible set.
    let (status, page) = app.get("/blogs/?is_published=false").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 0);

    let (status, _) = app.get("/blogs/go-unreleased-draft/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_snippet_list_hides_private_snippets() {
    let app = spawn_app().await;
    app.technology("Go", true, &[]).await;
    app.snippet("go", "First", true).await;
    app.snippet("go", "Hidden", false).await;
    app.snippet("go", "Second", true).await;
    app.snippet("go", "Also Hidden", false).await;

    let (status, page) = app.get("/snippets/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 2);
    assert_eq!(result_slugs(&page), vec!["go-second", "go-first"]);

    let (_, page) = app.get("/snippets/?ordering=created_at").await;
    assert_eq!(result_slugs(&page), vec!["go-first", "go-second"]);

    let (_, page) = app.get("/snippets/?search=hidden").await;
    assert_eq!(page["count"], 0);

    let (status, _) = app.get("/snippets/go-hidden/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_technology_list_hides_inactive() {
    let app = spawn_app().await;
    app.technology("Rust", true, &[]).await;
    app.technology("Cobol", false, &[]).await;
    app.technology("Go", true, &[]).await;

    let (_, page) = app.get("/technologies/").await;
    assert_eq!(result_slugs(&page), vec!["go", "rust"]);

    let (_, page) = app.get("/technologies/?ordering=-name").await;
    assert_eq!(result_slugs(&page), vec!["rust", "go"]);
}

#[tokio::test]
async fn test_tag_browse_includes_hidden_content() {
    let app = spawn_app().await;
    app.technology("Go", true, &["legacy"]).await;
    app.technology("Cobol", false, &["legacy"]).await;
    app.tutorial("go", "Old Tricks", None, &["legacy"]).await;
    app.tutorial("go", "Modern Go", Some("2024-05-01T00:00:00Z"), &["legacy"]).await;
    app.snippet("go", "Private Hack", false).await;
    app.blog("go", "Unsent Letter", None).await;
    for uri in ["/snippets/go-private-hack/", "/blogs/go-unsent-letter/"] {
        let (status, _) = app.admin("PATCH", uri, json!({ "tags": ["legacy"] })).await;
        assert_eq!(status, StatusCode::OK, "PATCH {}", uri);
    }

    let (_, technologies) = app.get("/tags/legacy/technology/").await;
    assert_eq!(slugs(&technologies), vec!["cobol", "go"]);
    assert_eq!(technologies[0]["is_active"], false);

    let (_, tutorials) = app.get("/tags/legacy/tutorial/").await;
    let mut found = slugs(&tutorials);
    found.sort();
    assert_eq!(found, vec!["go-modern-go", "go-old-tricks"]);

    let (_, snippets) = app.get("/tags/legacy/snippet/").await;
    assert_eq!(slugs(&snippets), vec!["go-private-hack"]);
    assert_eq!(snippets[0]["is_public"], false);

    let (_, posts) = app.get("/tags/legacy/blog/").await;
    assert_eq!(slugs(&posts), vec!["go-unsent-letter"]);

    // The list endpoints still hide the same rows.
    let (_, page) = app.get("/tutorials/").await;
    assert_eq!(result_slugs(&page), vec!["go-modern-go"]);
}
