//! A user curates a public job-hunting library that a colleague reads.

use axum::http::StatusCode;
use biblib_api::error::WRONG_TYPE_ERROR;
use serde_json::json;

use crate::common::TestApp;

const MARY: u64 = 1001;
const COLLEAGUE: u64 = 1002;

#[tokio::test]
async fn job_hunting_library_lifecycle() {
    let app = TestApp::new();

    // Create a public library; the name is echoed back.
    let (status, created) = app
        .send(
            "POST",
            "/libraries",
            Some(MARY),
            Some(json!({
                "name": "Job Hunting",
                "description": "Papers to read before interviews",
                "public": true
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["name"], "Job Hunting");
    assert_eq!(created["public"], true);
    assert_eq!(created["bibcode"], json!([]));

    // It shows up in her list.
    let (status, listed) = app.send("GET", "/libraries", Some(MARY), None).await;
    assert_eq!(status, StatusCode::OK);
    let library_id = listed["libraries"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(library_id, created["id"]);
    assert_eq!(listed["libraries"][0]["permission"], "owner");

    // Add, then remove, a document.
    let uri = format!("/documents/{library_id}");
    let (status, added) = app
        .send(
            "POST",
            &uri,
            Some(MARY),
            Some(json!({"bibcode": ["2015ApJ...800..001A"], "action": "add"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added, json!({"number_added": 1}));

    let (status, removed) = app
        .send(
            "POST",
            &uri,
            Some(MARY),
            Some(json!({"bibcode": ["2015ApJ...800..001A"], "action": "remove"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed, json!({"number_removed": 1}));

    // The library is empty again.
    let view = format!("/libraries/{library_id}");
    let (status, body) = app.send("GET", &view, Some(MARY), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documents"], json!([]));
    assert_eq!(body["metadata"]["permission"], "owner");

    // A colleague with no grant can read it because it is public.
    let (status, body) = app.send("GET", &view, Some(COLLEAGUE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["name"], "Job Hunting");

    // But cannot change it.
    let (status, _) = app
        .send(
            "POST",
            &uri,
            Some(COLLEAGUE),
            Some(json!({"bibcode": "2016A", "action": "add"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn job_epic_against_sqlite() {
    let store = biblib_storage::SqliteStore::connect("sqlite::memory:", 1)
        .await
        .unwrap();
    let app = TestApp::with_store(std::sync::Arc::new(store));

    let library_id = app
        .create_library(MARY, json!({"name": "Job Hunting", "public": true}))
        .await;
    let (status, added) = app
        .send(
            "POST",
            &format!("/documents/{library_id}"),
            Some(MARY),
            Some(json!({"bibcode": ["a", "b", "a"], "action": "add"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added["number_added"], 2);

    let (status, body) = app
        .send("GET", &format!("/libraries/{library_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documents"], json!(["a", "b"]));
}

#[tokio::test]
async fn job_epic_without_content_type() {
    let app = TestApp::new();

    let (status, created) = app
        .send_untyped(
            "POST",
            "/libraries",
            MARY,
            json!({"name": "Job", "description": "Interview prep", "public": true}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    let library_id = created["id"].as_str().unwrap().to_string();

    let uri = format!("/documents/{library_id}");
    let (status, added) = app
        .send_untyped("POST", &uri, MARY, json!({"bibcode": ["a", "b"], "action": "add"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added, json!({"number_added": 2}));

    let (status, renamed) = app
        .send_untyped("PUT", &uri, MARY, json!({"name": "Job 2024"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed, json!({"name": "Job 2024"}));

    let (status, _) = app.send("GET", "/libraries", Some(COLLEAGUE), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, granted) = app
        .send_untyped(
            "POST",
            &format!("/permissions/{library_id}"),
            MARY,
            json!({"uid": COLLEAGUE, "permission": "write", "value": true}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{granted}");

    // A body of the wrong shape is still refused.
    let (status, body) = app
        .send_untyped("POST", "/libraries", MARY, json!("name=Job"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], WRONG_TYPE_ERROR.message);
}
