//! Malformed requests and unknown libraries.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use biblib_api::error::{NO_PERMISSION_ERROR, WRONG_TYPE_ERROR};
use serde_json::json;
use tower::ServiceExt;

use crate::common::{TestApp, read_json};

const OWNER: u64 = 30;

#[tokio::test]
async fn unknown_and_malformed_ids_look_forbidden() {
    let app = TestApp::new();
    for id in ["AAAAAAAAAAAAAAAAAAAAAA", "not-a-library", "00000000-0000-0000-0000-000000000000"] {
        let (status, body) = app
            .send("GET", &format!("/libraries/{id}"), Some(OWNER), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "id {id}");
        assert_eq!(body["error"], NO_PERMISSION_ERROR.message);
    }
}

#[tokio::test]
async fn hyphenated_uuid_addresses_the_same_library() {
    let app = TestApp::new();
    let slug = app
        .create_library(OWNER, json!({"name": "either form"}))
        .await;
    let id = biblib_core::LibraryId::parse(&slug).unwrap();

    let (status, body) = app
        .send("GET", &format!("/libraries/{}", id.as_uuid()), Some(OWNER), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["id"], slug);
}

#[tokio::test]
async fn wrong_types_are_rejected() {
    let app = TestApp::new();
    let id = app.create_library(OWNER, json!({"name": "typed"})).await;

    let cases = [
        ("POST", "/libraries".to_string(), json!({"public": "yes"})),
        ("POST", format!("/documents/{id}"), json!({"bibcode": ["a"], "action": "shuffle"})),
        ("POST", format!("/documents/{id}"), json!({"bibcode": 12, "action": "add"})),
        ("PUT", format!("/documents/{id}"), json!({"name": "   "})),
        ("POST", format!("/permissions/{id}"), json!({"uid": "x", "permission": "read", "value": true})),
        ("POST", format!("/permissions/{id}"), json!({"uid": 1, "permission": "god", "value": true})),
    ];
    for (method, uri, body) in cases {
        let (status, reply) = app.send(method, &uri, Some(OWNER), Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri} {body}");
        assert_eq!(reply["error"], WRONG_TYPE_ERROR.message);
    }
}

#[tokio::test]
async fn non_json_body_is_wrong_type() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/libraries")
        .header("X-Adsws-Uid", OWNER.to_string())
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], WRONG_TYPE_ERROR.message);
}

#[tokio::test]
async fn garbage_user_header_is_rejected() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/libraries")
        .header("X-Adsws-Uid", "mallory")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json(response).await["error"].is_string());
}

#[tokio::test]
async fn largest_uid_is_served_by_both_backends() {
    let sqlite = biblib_storage::SqliteStore::connect("sqlite::memory:", 1)
        .await
        .unwrap();
    for app in [TestApp::new(), TestApp::with_store(std::sync::Arc::new(sqlite))] {
        let (status, body) = app.send("GET", "/libraries", Some(u64::MAX), None).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body, json!({"libraries": []}));

        app.create_library(u64::MAX, json!({"name": "big"})).await;
        let (status, body) = app.send("GET", "/libraries", Some(u64::MAX), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["libraries"][0]["permission"], "owner");
    }
}
