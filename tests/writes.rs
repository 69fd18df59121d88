mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{result_slugs, slugs, spawn_app, ADMIN_TOKEN, READER_TOKEN};

fn go_payload() -> serde_json::Value {
    json!({
        "name": "Go",
        "logo": "tech_logos/go.png",
        "description": "Learn Go",
    })
}

#[tokio::test]
async fn test_writes_require_staff() {
    let app = spawn_app().await;

    let (status, body) = app.send("POST", "/technologies/", None, Some(go_payload())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication credentials were not provided.");

    let (status, body) = app
        .send("POST", "/technologies/", Some(READER_TOKEN), Some(go_payload()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You do not have permission to perform this action.");

    let (status, body) = app
        .send("GET", "/technologies/", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token.");

    // Reads stay open to authenticated non-staff viewers.
    let (status, _) = app.send("GET", "/technologies/", Some(READER_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, page) = app.get("/technologies/").await;
    assert_eq!(page["count"], 0);
}

#[tokio::test]
async fn test_create_returns_full_projection() {
    let app = spawn_app().await;
    let (status, created) = app
        .send("POST", "/technologies", Some(ADMIN_TOKEN), Some(go_payload()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["slug"], "go");
    assert_eq!(created["is_active"], true);
    assert_eq!(created["tags"], json!([]));

    let (status, body) = app.admin("POST", "/technologies/", go_payload()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["name"].is_array());
}

#[tokio::test]
async fn test_validation_reports_every_field() {
    let app = spawn_app().await;
    app.technology("Go", true, &[]).await;

    let (status, body) = app
        .admin(
            "POST",
            "/tutorials/",
            json!({
                "technology": "go",
                "title": "",
                "content": "too short",
                "difficulty": "expert",
                "video_url": "not a url",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = &body["fields"];
    for field in ["title", "content", "difficulty", "video_url", "thumbnail"] {
        assert!(fields[field].is_array(), "missing error for {}: {}", field, body);
    }
    assert_eq!(fields["difficulty"][0], "\"expert\" is not a valid choice.");

    let (status, body) = app
        .admin(
            "POST",
            "/snippets/",
            json!({
                "technology": "cobol",
                "title": "Hello",
                "description": "d",
                "code": "x",
                "language": "go",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["technology"][0], "Object with slug=cobol does not exist.");
}

#[tokio::test]
async fn test_slug_is_immutable_on_update() {
    let app = spawn_app().await;
    app.technology("Go", true, &["beginner"]).await;

    let (status, updated) = app
        .admin(
            "PATCH",
            "/technologies/go/",
            json!({ "name": "Golang", "slug": "golang" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Golang");
    assert_eq!(updated["slug"], "go");
    assert_eq!(updated["tags"], json!(["beginner"]));

    let (status, replaced) = app
        .admin(
            "PUT",
            "/technologies/go",
            json!({
                "name": "Go",
                "logo": "tech_logos/gopher.png",
                "description": "Back again",
                "slug": "other",
                "tags": ["systems"],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["slug"], "go");
    assert_eq!(replaced["description"], "Back again");
    assert_eq!(replaced["tags"], json!(["systems"]));

    // PUT without required fields is rejected.
    let (status, body) = app
        .admin("PUT", "/technologies/go/", json!({ "name": "Go" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["logo"].is_array());

    let (_, page) = app.get("/tags/beginner/technology/").await;
    assert_eq!(page, json!([]));
}

#[tokio::test]
async fn test_delete_cascades_to_children_and_tags() {
    let app = spawn_app().await;
    app.technology("Go", true, &["beginner"]).await;
    app.tutorial("go", "Getting Started", Some("2024-01-10T09:00:00Z"), &["beginner"]).await;
    app.topic("go-getting-started", "Install", 1).await;
    app.snippet("go", "Hello", true).await;

    let (status, body) = app.send("DELETE", "/technologies/go/", Some(ADMIN_TOKEN), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    for uri in ["/technologies/go/", "/tutorials/go-getting-started/", "/snippets/go-hello/"] {
        let (status, _) = app.get(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "GET {}", uri);
    }
    let (_, page) = app.get("/topics/").await;
    assert_eq!(page["count"], 0);

    let (status, tagged) = app.get("/tags/beginner/tutorial/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tagged, json!([]));

    let (status, _) = app.send("DELETE", "/technologies/go/", Some(ADMIN_TOKEN), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unpublished_content_hidden_but_editable() {
    let app = spawn_app().await;
    app.technology("Go", true, &[]).await;
    app.tutorial("go", "Draft Notes", None, &[]).await;

    let (status, _) = app.get("/tutorials/go-draft-notes/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, published) = app
        .admin("PATCH", "/tutorials/go-draft-notes/", json!({ "is_published": true }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(published["is_published"], true);
    assert!(published["published_date"].is_string());

    let (status, detail) = app.get("/tutorials/go-draft-notes/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["title"], "Draft Notes");
}

#[tokio::test]
async fn test_topic_lookup_scoped_by_tutorial() {
    let app = spawn_app().await;
    app.technology("Go", true, &[]).await;
    app.tutorial("go", "Basics", Some("2024-01-01T00:00:00Z"), &[]).await;
    app.tutorial("go", "Advanced", Some("2024-02-01T00:00:00Z"), &[]).await;
    app.topic("go-basics", "Intro", 1).await;
    app.topic("go-advanced", "Intro", 1).await;

    let (status, body) = app
        .admin(
            "POST",
            "/topics/",
            json!({ "tutorial": "go-basics", "title": "Intro", "content": "again" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["non_field_errors"].is_array());

    let (status, topic) = app.get("/topics/intro/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(topic["tutorial"], "go-basics");
    assert_eq!(topic["questions"], json!([]));

    let (status, topic) = app.get("/topics/intro/?tutorial=go-advanced").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(topic["tutorial"], "go-advanced");

    let (status, updated) = app
        .admin(
            "PATCH",
            "/topics/intro/?tutorial=go-advanced",
            json!({ "content": "Updated" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["content"], "Updated");

    let (_, page) = app.get("/topics/?tutorial=go-basics").await;
    assert_eq!(result_slugs(&page), vec!["intro"]);
    assert_eq!(page["results"][0]["content"], "All about Intro");

    let (_, detail) = app.get("/tutorials/go-advanced/").await;
    assert_eq!(slugs(&detail["topics"]), vec!["intro"]);
    assert_eq!(detail["topics"][0]["content"], "Updated");
}

#[tokio::test]
async fn test_author_recorded_from_viewer() {
    let app = spawn_app().await;
    app.technology("Go", true, &[]).await;
    let post = app.blog("go", "Release Notes", Some("2024-02-01T00:00:00Z")).await;
    assert_eq!(post["author"], "admin");
    let snippet = app.snippet("go", "Hello", true).await;
    assert_eq!(snippet["author"], "admin");
}

#[tokio::test]
async fn test_malformed_body_reports_fields() {
    let app = spawn_app().await;

    let mut payload = go_payload();
    payload["is_active"] = json!("yes");
    let (status, body) = app.admin("POST", "/technologies/", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["fields"]["is_active"].is_array(), "{}", body);

    let (status, body) = app
        .admin("POST", "/topics/", json!({ "tutorial": "x", "title": "t", "content": "c", "order": "first" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["order"].is_array(), "{}", body);

    let (status, body) = app
        .send_raw("POST", "/technologies/", Some(ADMIN_TOKEN), "application/json", "{\"name\": ")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["non_field_errors"].is_array(), "{}", body);

    let (status, body) = app
        .send_raw("POST", "/technologies/", Some(ADMIN_TOKEN), "text/plain", "name=Go")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (_, page) = app.get("/technologies/").await;
    assert_eq!(page["count"], 0);
}

#[tokio::test]
async fn test_privilege_checked_before_body() {
    let app = spawn_app().await;
    app.technology("Go", true, &[]).await;

    let (status, body) = app
        .send("POST", "/technologies/", None, Some(json!({ "name": 5 })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication credentials were not provided.");

    let (status, _) = app
        .send_raw("PATCH", "/technologies/go/", Some(READER_TOKEN), "application/json", "not json")
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send("PUT", "/tutorials/go-anything/", None, Some(json!({ "views": "many" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send("DELETE", "/technologies/go/", Some(READER_TOKEN), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
