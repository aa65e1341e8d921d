//! Granting, revoking and listing permissions.

use axum::http::StatusCode;
use biblib_api::error::{API_MISSING_USER_ERROR, NO_PERMISSION_ERROR};
use serde_json::json;

use crate::common::TestApp;

const OWNER: u64 = 20;
const READER: u64 = 21;
const WRITER: u64 = 22;

async fn grant(app: &TestApp, by: u64, id: &str, uid: u64, permission: &str, value: bool) -> StatusCode {
    let (status, _) = app
        .send(
            "POST",
            &format!("/permissions/{id}"),
            Some(by),
            Some(json!({"uid": uid, "permission": permission, "value": value})),
        )
        .await;
    status
}

async fn introduce(app: &TestApp, uid: u64) {
    let (status, _) = app.send("GET", "/libraries", Some(uid), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn read_grant_opens_a_private_library() {
    let app = TestApp::new();
    let id = app.create_library(OWNER, json!({"name": "secret"})).await;
    introduce(&app, READER).await;

    let view = format!("/libraries/{id}");
    let (status, _) = app.send("GET", &view, Some(READER), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(grant(&app, OWNER, &id, READER, "read", true).await, StatusCode::OK);
    let (status, body) = app.send("GET", &view, Some(READER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["permission"], "read");

    // Readers cannot write.
    let (status, _) = app
        .send(
            "POST",
            &format!("/documents/{id}"),
            Some(READER),
            Some(json!({"bibcode": ["a"], "action": "add"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(grant(&app, OWNER, &id, READER, "read", false).await, StatusCode::OK);
    let (status, _) = app.send("GET", &view, Some(READER), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn writer_can_add_documents() {
    let app = TestApp::new();
    let id = app.create_library(OWNER, json!({"name": "shared"})).await;
    introduce(&app, WRITER).await;
    assert_eq!(grant(&app, OWNER, &id, WRITER, "write", true).await, StatusCode::OK);

    let (status, body) = app
        .send(
            "POST",
            &format!("/documents/{id}"),
            Some(WRITER),
            Some(json!({"bibcode": ["a", "b"], "action": "add"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["number_added"], 2);

    // Writers may not manage permissions.
    assert_eq!(
        grant(&app, WRITER, &id, READER, "read", true).await,
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn writer_cannot_change_metadata() {
    let app = TestApp::new();
    let id = app.create_library(OWNER, json!({"name": "shared"})).await;
    introduce(&app, WRITER).await;
    assert_eq!(grant(&app, OWNER, &id, WRITER, "write", true).await, StatusCode::OK);

    let uri = format!("/documents/{id}");
    let (status, body) = app
        .send(
            "PUT",
            &uri,
            Some(WRITER),
            Some(json!({"name": "hijacked", "public": true})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], NO_PERMISSION_ERROR.message);

    let (status, view) = app
        .send("GET", &format!("/libraries/{id}"), Some(WRITER), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["metadata"]["name"], "shared");
    assert_eq!(view["metadata"]["public"], false);
}

#[tokio::test]
async fn listing_needs_admin() {
    let app = TestApp::new();
    let id = app.create_library(OWNER, json!({"name": "listed"})).await;
    introduce(&app, READER).await;
    grant(&app, OWNER, &id, READER, "read", true).await;

    let uri = format!("/permissions/{id}");
    let (status, body) = app.send("GET", &uri, Some(OWNER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {OWNER.to_string(): ["owner", "admin", "write", "read"]},
            {READER.to_string(): ["read"]}
        ])
    );

    let (status, body) = app.send("GET", &uri, Some(READER), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], NO_PERMISSION_ERROR.message);
}

#[tokio::test]
async fn admin_rules() {
    let app = TestApp::new();
    let id = app.create_library(OWNER, json!({"name": "ranks"})).await;
    introduce(&app, READER).await;
    introduce(&app, WRITER).await;

    assert_eq!(grant(&app, OWNER, &id, READER, "admin", true).await, StatusCode::OK);
    // An admin may hand out write but not admin.
    assert_eq!(grant(&app, READER, &id, WRITER, "write", true).await, StatusCode::OK);
    assert_eq!(
        grant(&app, READER, &id, WRITER, "admin", true).await,
        StatusCode::FORBIDDEN
    );
    // Nobody transfers ownership through the API.
    assert_eq!(
        grant(&app, OWNER, &id, WRITER, "owner", true).await,
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn unknown_target_user_is_reported() {
    let app = TestApp::new();
    let id = app.create_library(OWNER, json!({"name": "lonely"})).await;
    let (status, body) = app
        .send(
            "POST",
            &format!("/permissions/{id}"),
            Some(OWNER),
            Some(json!({"uid": 999, "permission": "read", "value": true})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], API_MISSING_USER_ERROR.message);
}
