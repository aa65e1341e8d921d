//! `/resources` introspection.

use axum::http::StatusCode;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn every_route_is_described() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/resources", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let table = body.as_object().unwrap();
    let mut rules: Vec<&str> = table.keys().map(String::as_str).collect();
    rules.sort_unstable();
    assert_eq!(
        rules,
        vec![
            "/documents/<string:library>",
            "/libraries",
            "/libraries/<string:library>",
            "/permissions/<string:library>",
        ]
    );

    let documents = &table["/documents/<string:library>"];
    assert_eq!(documents["methods"], json!(["POST", "PUT", "DELETE"]));
    assert_eq!(documents["scopes"], json!(["user"]));
    assert_eq!(documents["rate_limit"], json!([1000, 86400]));
    assert!(documents["description"].is_string());
}

#[tokio::test]
async fn advertised_methods_are_routed() {
    let app = TestApp::new();
    let (_, body) = app.send("GET", "/resources", None, None).await;

    for (rule, info) in body.as_object().unwrap() {
        let uri = rule.replace("<string:library>", "AAAAAAAAAAAAAAAAAAAAAA");
        for method in info["methods"].as_array().unwrap() {
            let method = method.as_str().unwrap();
            let (status, _) = app.send(method, &uri, Some(1), Some(json!({}))).await;
            assert_ne!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {rule}");
            assert_ne!(status, StatusCode::NOT_FOUND, "{method} {rule}");
        }
    }
}
