//! An anonymous caller meets a private and a public library.

use axum::http::StatusCode;
use biblib_api::error::NO_PERMISSION_ERROR;
use serde_json::json;

use crate::common::TestApp;

const DAVE: u64 = 2;

#[tokio::test]
async fn anonymous_user_sees_only_public_libraries() {
    let app = TestApp::new();

    let private_id = app
        .create_library(DAVE, json!({"name": "Dave's private library"}))
        .await;
    let public_id = app
        .create_library(
            DAVE,
            json!({"name": "Dave's public library", "public": true}),
        )
        .await;

    // Private: refused with the stock message.
    let (status, body) = app
        .send("GET", &format!("/libraries/{private_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], NO_PERMISSION_ERROR.message);

    // Public: readable without any user header.
    let (status, body) = app
        .send("GET", &format!("/libraries/{public_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["documents"].is_array());
    assert_eq!(body["metadata"]["name"], "Dave's public library");
    assert!(body["metadata"].get("permission").is_none());
}

#[tokio::test]
async fn resources_lists_exactly_one_scopeless_endpoint() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/resources", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let scopeless: Vec<&String> = body
        .as_object()
        .unwrap()
        .iter()
        .filter(|(_, info)| info["scopes"].as_array().unwrap().is_empty())
        .map(|(rule, _)| rule)
        .collect();
    assert_eq!(scopeless, vec!["/libraries/<string:library>"]);
}

#[tokio::test]
async fn anonymous_user_cannot_reach_scoped_endpoints() {
    let app = TestApp::new();
    let public_id = app
        .create_library(DAVE, json!({"name": "open", "public": true}))
        .await;

    let (status, body) = app.send("GET", "/libraries", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You did not supply enough user information.");

    let (status, _) = app
        .send(
            "POST",
            &format!("/documents/{public_id}"),
            None,
            Some(json!({"bibcode": ["2015A"], "action": "add"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
