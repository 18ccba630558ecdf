//! The real HTTP client against a stub TestRail server.

mod support;

use pretty_assertions::assert_eq;
use rail_client::{ApiError, TestRailApi};
use rail_core::{EntityKind, EntitySelection};
use rail_migrate::{DataDir, ExportOptions, Exporter, fetch_tests_with_pagination};
use serde_json::json;
use support::StubServer;

#[tokio::test]
async fn requests_carry_basic_auth_and_api_path() {
    let stub = StubServer::start();
    stub.get("get_users", &json!([{ "id": 1, "email": "a@acme.test" }]));

    let users = stub.client().get("get_users").await.unwrap();

    assert_eq!(users, json!([{ "id": 1, "email": "a@acme.test" }]));
    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].action, "get_users");
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Basic cWFAYWNtZS50ZXN0OnNlY3JldA==")
    );
}

#[tokio::test]
async fn error_status_carries_the_response_body() {
    let stub = StubServer::start();
    stub.route("POST", "add_user", 400, r#"{"error":"Field :email is not a valid email address."}"#);

    let err = stub
        .client()
        .post("add_user", &json!({ "email": "nope" }))
        .await
        .unwrap_err();

    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("not a valid email"), "{message}");
        }
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_body_reads_as_null() {
    let stub = StubServer::start();
    stub.route("POST", "add_user_to_project/9", 200, "");

    let created = stub
        .client()
        .post("add_user_to_project/9", &json!({ "user_id": 3 }))
        .await
        .unwrap();

    assert!(created.is_null());
    assert_eq!(stub.posts()[0].body, Some(json!({ "user_id": 3 })));
}

#[tokio::test]
async fn pagination_follows_offsets_over_http() {
    let stub = StubServer::start();
    let full: Vec<_> = (0..250).map(|id| json!({ "id": id })).collect();
    stub.get("get_tests/5&offset=0&limit=250", &json!({ "tests": full }))
        .get("get_tests/5&offset=250&limit=250", &json!({ "tests": [{ "id": 250 }] }));

    let tests = fetch_tests_with_pagination(&stub.client(), "5").await;

    assert_eq!(tests.len(), 251);
    let actions: Vec<String> = stub.requests().into_iter().map(|r| r.action).collect();
    assert_eq!(
        actions,
        vec!["get_tests/5&offset=0&limit=250", "get_tests/5&offset=250&limit=250"]
    );
}

#[tokio::test]
async fn not_found_leaves_no_file() {
    let stub = StubServer::start();
    let dir = tempfile::tempdir().unwrap();
    let store = DataDir::new(dir.path());

    let summary = Exporter::new(
        stub.client(),
        store.clone(),
        ExportOptions {
            source_project: 2,
            selection: EntitySelection::only([EntityKind::Milestones]),
        },
    )
    .run()
    .await;

    assert_eq!(stub.requests()[0].action, "get_milestones/2&is_completed=0");
    assert!(!store.exists("milestones.json"));
    assert_eq!(summary.outcome(EntityKind::Milestones).unwrap().failed, 1);
}
