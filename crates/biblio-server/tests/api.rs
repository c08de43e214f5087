//! HTTP-level behavior of the biblio API.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use biblio_core::BibliographyService;
use biblio_server::{app, create_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn router() -> Router {
    let service = BibliographyService::in_memory().await.unwrap();
    create_router(Arc::new(AppState::new(service)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get_raw(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn create_thesis(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/projects",
        Some(json!({ "name": "Thesis", "description": "PhD", "password": "abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_and_fetch_project_without_password() {
    let app = router().await;
    let id = create_thesis(&app).await;

    let (status, body) = send(&app, "GET", &format!("/projects?project_id={}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Thesis");
    assert_eq!(body["description"], "PhD");
    assert!(body.get("password").is_none());

    let (status, body) = send(&app, "GET", "/projects", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert!(list[0].get("password").is_none());
}

#[tokio::test]
async fn wrong_password_is_401_and_missing_project_is_404() {
    let app = router().await;
    let id = create_thesis(&app).await;

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/projects?project_id={}&password=wrong", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid password");

    let missing = biblio_core::new_id();
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/projects?project_id={}&password=abc", missing),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/projects?project_id={}&password=abc", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project deleted");

    let exists = format!("/projects/exists?project_id={}", id);
    let (status, body) = send(&app, "GET", &exists, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], false);
}

#[tokio::test]
async fn update_project_checks_old_password() {
    let app = router().await;
    let id = create_thesis(&app).await;

    let update = |old: &str| {
        json!({
            "id": id,
            "old_password": old,
            "name": "Dissertation",
            "description": "Final",
            "password": "new",
        })
    };

    let (status, _) = send(&app, "PUT", "/projects", Some(update("nope"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "PUT", "/projects", Some(update("abc"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Dissertation");
}

#[tokio::test]
async fn missing_field_is_400() {
    let app = router().await;
    let (status, body) = send(
        &app,
        "POST",
        "/projects",
        Some(json!({ "name": "No password", "description": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("password"));
}

#[tokio::test]
async fn malformed_project_id_is_400() {
    let app = router().await;
    let (status, _) = send(&app, "GET", "/projects/not-a-uuid/sources", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/projects/exists?project_id=Projects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], false);
}

#[tokio::test]
async fn source_crud_over_http() {
    let app = router().await;
    let id = create_thesis(&app).await;
    let sources = format!("/projects/{}/sources", id);

    let payload = json!({
        "tag": "A1",
        "url": "http://x",
        "author": "Doe",
        "title": "Paper",
        "date_accessed": "2024-01-01",
        "date_published": "2023-01-01",
    });
    let (status, created) = send(&app, "POST", &sources, Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    let source_id = created["id"].as_str().unwrap().to_string();

    let one = format!("{}/{}", sources, source_id);
    let (status, fetched) = send(&app, "GET", &one, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let mut replacement = created.clone();
    replacement["title"] = json!("Revised");
    let (status, updated) = send(&app, "PUT", &sources, Some(replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Revised");

    let (status, list) = send(&app, "GET", &sources, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "DELETE", &one, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Source deleted");

    let (status, _) = send(&app, "GET", &one, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_project_id_is_409() {
    let app = router().await;
    let id = biblio_core::new_id();
    let body = json!({ "id": id, "name": "A", "description": "", "password": "p" });

    let (status, _) = send(&app, "POST", "/projects", Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "POST", "/projects", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn wrongly_typed_json_field_is_400_with_message() {
    let app = router().await;
    let (status, body) = send(
        &app,
        "POST",
        "/projects",
        Some(json!({ "name": 5, "description": "d", "password": "p" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("name"));
    let (_, list) = send(&app, "GET", "/projects", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_query_parameter_is_400_with_message() {
    let app = router().await;
    let id = create_thesis(&app).await;

    let uri = format!("/projects?project_id={}", id);
    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("password"));

    let (status, body) = send(&app, "GET", "/projects/exists", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    // Nothing was deleted
    let exists = format!("/projects/exists?project_id={}", id);
    let (_, body) = send(&app, "GET", &exists, None).await;
    assert_eq!(body["exists"], true);
}

#[tokio::test]
async fn frontend_served_behind_api_routes() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>biblio</h1>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log(1);").unwrap();

    let service = BibliographyService::in_memory().await.unwrap();
    let app = app(Arc::new(AppState::new(service)), dir.path());

    let (status, page) = get_raw(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page, "<h1>biblio</h1>");
    let (status, script) = get_raw(&app, "/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(script, "console.log(1);");

    let (status, body) = send(&app, "GET", "/projects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = get_raw(&app, "/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
