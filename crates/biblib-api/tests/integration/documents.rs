//! Document changes, metadata updates and deletion.

use axum::http::StatusCode;
use biblib_api::error::{DUPLICATE_LIBRARY_NAME_ERROR, MISSING_DOCUMENT_ERROR};
use serde_json::json;

use crate::common::TestApp;

const OWNER: u64 = 10;
const OTHER: u64 = 11;

#[tokio::test]
async fn create_seeds_documents_and_defaults() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            "POST",
            "/libraries",
            Some(OWNER),
            Some(json!({"bibcode": ["x", "y", "x"]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Untitled Library 1");
    assert_eq!(body["description"], "My ADS library");
    assert_eq!(body["public"], false);
    assert_eq!(body["bibcode"], json!(["x", "y"]));
}

#[tokio::test]
async fn duplicate_names_conflict() {
    let app = TestApp::new();
    app.create_library(OWNER, json!({"name": "Reading"})).await;
    let (status, body) = app
        .send("POST", "/libraries", Some(OWNER), Some(json!({"name": "Reading"})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], DUPLICATE_LIBRARY_NAME_ERROR.message);

    // The same name is fine for somebody else.
    app.create_library(OTHER, json!({"name": "Reading"})).await;
}

#[tokio::test]
async fn adding_twice_counts_once() {
    let app = TestApp::new();
    let id = app.create_library(OWNER, json!({"name": "dups"})).await;
    let uri = format!("/documents/{id}");

    let (_, first) = app
        .send("POST", &uri, Some(OWNER), Some(json!({"bibcode": "a", "action": "add"})))
        .await;
    let (_, second) = app
        .send(
            "POST",
            &uri,
            Some(OWNER),
            Some(json!({"bibcode": ["a", "b"], "action": "add"})),
        )
        .await;
    assert_eq!(first["number_added"], 1);
    assert_eq!(second["number_added"], 1);
}

#[tokio::test]
async fn document_requests_need_documents() {
    let app = TestApp::new();
    let id = app.create_library(OWNER, json!({"name": "empty"})).await;
    let (status, body) = app
        .send(
            "POST",
            &format!("/documents/{id}"),
            Some(OWNER),
            Some(json!({"action": "add"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], MISSING_DOCUMENT_ERROR.message);
}

#[tokio::test]
async fn metadata_update_returns_changed_fields() {
    let app = TestApp::new();
    let id = app.create_library(OWNER, json!({"name": "before"})).await;
    app.create_library(OWNER, json!({"name": "taken"})).await;
    let uri = format!("/documents/{id}");

    let (status, body) = app
        .send(
            "PUT",
            &uri,
            Some(OWNER),
            Some(json!({"name": "after", "public": true})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"name": "after", "public": true}));

    let (status, _) = app
        .send("PUT", &uri, Some(OWNER), Some(json!({"name": "taken"})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Public now, so an anonymous caller sees the new name.
    let (status, view) = app.send("GET", &format!("/libraries/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["metadata"]["name"], "after");
}

#[tokio::test]
async fn only_the_owner_may_delete() {
    let app = TestApp::new();
    let id = app.create_library(OWNER, json!({"name": "doomed"})).await;
    app.send("GET", "/libraries", Some(OTHER), None).await;

    // Even an admin may not delete.
    let (status, _) = app
        .send(
            "POST",
            &format!("/permissions/{id}"),
            Some(OWNER),
            Some(json!({"uid": OTHER, "permission": "admin", "value": true})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .send("DELETE", &format!("/documents/{id}"), Some(OTHER), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send("DELETE", &format!("/documents/{id}"), Some(OWNER), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (status, _) = app
        .send("GET", &format!("/libraries/{id}"), Some(OWNER), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, listed) = app.send("GET", "/libraries", Some(OTHER), None).await;
    assert_eq!(listed["libraries"], json!([]));
}

#[tokio::test]
async fn untitled_name_skips_one_still_in_use() {
    let app = TestApp::new();
    let first = app.create_library(OWNER, json!({})).await;
    app.create_library(OWNER, json!({})).await;

    let (status, _) = app
        .send("DELETE", &format!("/documents/{first}"), Some(OWNER), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, created) = app
        .send("POST", "/libraries", Some(OWNER), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["name"], "Untitled Library 3");

    let (status, body) = app
        .send(
            "POST",
            "/libraries",
            Some(OWNER),
            Some(json!({"name": "Untitled Library 2"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], DUPLICATE_LIBRARY_NAME_ERROR.message);
}
