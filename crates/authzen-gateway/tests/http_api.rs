//! HTTP routes end to end against the axum router.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use authzen_core::PolicyStore;
use authzen_gateway::{app_state::AppState, config, router};

const SAMPLE: &str = r#"
version: 1
gateway:
  base_url: "https://pdp.example.com"
policies:
  - { subject: "user:alice", resource: "document:123", action: "read", effect: allow }
  - { subject: "user:alice", resource: "document:123", action: "write", effect: allow }
  - { subject: "user:bob", resource: "document:123", action: "read", effect: allow }
  - { subject: "user:bob", resource: "document:123", action: "write", effect: deny }
  - { subject: "user:charlie", resource: "document:123", action: "read", effect: deny }
"#;

fn sample_state() -> AppState {
    AppState::new(config::load_from_str(SAMPLE).unwrap())
}

fn app(state: &AppState) -> Router {
    router::build_router(state.clone())
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app.oneshot(req.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

#[tokio::test]
async fn evaluation_allow_and_default_deny() {
    let state = sample_state();

    let (status, body) = post(
        app(&state),
        "/access/v1/evaluation",
        json!({
            "subject": { "type": "user", "id": "user:alice" },
            "resource": { "type": "document", "id": "document:123" },
            "action": { "name": "read" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "decision": "ALLOW" }));

    let (status, body) = post(
        app(&state),
        "/access/v1/evaluation",
        json!({
            "subject": { "type": "user", "id": "user:alice" },
            "resource": { "type": "document", "id": "document:999" },
            "action": { "name": "read" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "decision": "DENY", "context": { "reason": "Access denied by policy" } })
    );
}

#[tokio::test]
async fn evaluation_validation_errors_are_400() {
    let state = sample_state();

    let (status, body) = post(
        app(&state),
        "/access/v1/evaluation",
        json!({
            "subject": { "type": "user", "id": "user:alice" },
            "resource": { "type": "document", "id": "document:123" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");

    let response = app(&state)
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/access/v1/evaluation")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(state
        .metrics()
        .render(&[])
        .contains("authzen_validation_errors_total{endpoint=\"evaluation\"} 2"));
}

#[tokio::test]
async fn evaluations_deny_on_first_deny() {
    let state = sample_state();
    let (status, body) = post(
        app(&state),
        "/access/v1/evaluations",
        json!({
            "subject": { "type": "user", "id": "user:bob" },
            "action": { "name": "read" },
            "evaluations": [
                { "resource": { "type": "document", "id": "document:123" } },
                { "resource": { "type": "document", "id": "document:123" }, "action": { "name": "write" } },
                { "resource": { "type": "document", "id": "document:123" } }
            ],
            "options": { "evaluations_semantic": "deny_on_first_deny" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "evaluations": [
            { "decision": "ALLOW" },
            { "decision": "DENY", "context": { "reason": "Access denied by policy" } }
        ]})
    );
}

#[tokio::test]
async fn evaluations_default_semantic_executes_all() {
    let state = sample_state();
    let (_, body) = post(
        app(&state),
        "/access/v1/evaluations",
        json!({
            "subject": { "type": "user", "id": "user:charlie" },
            "action": { "name": "read" },
            "evaluations": [
                { "resource": { "type": "document", "id": "document:123" } },
                { "resource": { "type": "document", "id": "document:456" } }
            ]
        }),
    )
    .await;
    assert_eq!(body["evaluations"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn evaluations_invalid_semantic_is_rejected() {
    let state = sample_state();
    let (status, body) = post(
        app(&state),
        "/access/v1/evaluations",
        json!({
            "subject": { "type": "user", "id": "user:alice" },
            "action": { "name": "read" },
            "evaluations": [{ "resource": { "type": "document", "id": "document:123" } }],
            "options": { "evaluations_semantic": "first_applicable" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_SEMANTIC");
    // rejected before any decision is recorded
    assert!(!state.metrics().render(&[]).contains("authzen_decisions_total{"));
}

#[tokio::test]
async fn search_endpoints() {
    let state = sample_state();

    let (status, body) = post(
        app(&state),
        "/access/v1/search/subject",
        json!({
            "subject": { "type": "user" },
            "resource": { "type": "document", "id": "document:123" },
            "action": { "name": "read" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "results": [
                { "type": "user", "id": "user:alice" },
                { "type": "user", "id": "user:bob" }
            ],
            "page": {}
        })
    );

    let (_, body) = post(
        app(&state),
        "/access/v1/search/resource",
        json!({
            "subject": { "type": "user", "id": "user:alice" },
            "resource": { "type": "document" },
            "action": { "name": "write" }
        }),
    )
    .await;
    assert_eq!(
        body["results"],
        json!([{ "type": "document", "id": "document:123" }])
    );

    let (_, body) = post(
        app(&state),
        "/access/v1/search/action",
        json!({
            "subject": { "type": "user", "id": "user:bob" },
            "resource": { "type": "document", "id": "document:123" }
        }),
    )
    .await;
    assert_eq!(body["results"], json!([{ "name": "read" }]));

    let (status, _) = post(
        app(&state),
        "/access/v1/search/action",
        json!({ "subject": { "type": "user", "id": "user:bob" } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn principal_variant_uses_the_same_engine() {
    let state = sample_state();

    let (status, body) = post(
        app(&state),
        "/v1/authorize",
        json!({
            "principal": { "id": "user:bob" },
            "resource": { "id": "document:123" },
            "action": "write"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "decision": "DENY", "reason": "Access denied by policy" }));

    let (status, body) = post(
        app(&state),
        "/v1/evaluations",
        json!({
            "principal": { "id": "user:charlie" },
            "action": "read",
            "evaluations": [
                { "resource": { "id": "document:123" } },
                { "resource": { "id": "document:123" }, "action": "write" }
            ],
            "semantic": "permit_on_first_permit"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["evaluations"].as_array().unwrap().len(), 2);

    let (status, body) = post(
        app(&state),
        "/v1/evaluations",
        json!({
            "principal": { "id": "user:alice" },
            "evaluations": [{ "resource": { "id": "document:123" } }],
            "semantic": "deny_overrides"
        }),
    )
    .await;
    // missing action is reported before the semantic
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "action name is required for evaluation 0");
}

#[tokio::test]
async fn principal_search_endpoints() {
    let state = sample_state();

    let (status, body) = post(
        app(&state),
        "/v1/search/subject",
        json!({ "resource": { "id": "document:123" }, "action": "read" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "results": [{ "id": "user:alice" }, { "id": "user:bob" }], "page": {} })
    );

    let (status, body) = post(
        app(&state),
        "/v1/search/resource",
        json!({ "principal": { "id": "user:alice" }, "action": "write" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([{ "id": "document:123" }]));

    // bob's write record is a deny, so only read is reported
    let (status, body) = post(
        app(&state),
        "/v1/search/action",
        json!({ "principal": { "id": "user:bob" }, "resource": { "id": "document:123" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!(["read"]));

    let (status, body) = post(
        app(&state),
        "/v1/search/action",
        json!({ "principal": { "id": "user:charlie" }, "resource": { "id": "document:123" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([]));

    let (status, body) = post(
        app(&state),
        "/v1/search/subject",
        json!({ "resource": { "id": "document:123" } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "bad request: action is required");
}

#[tokio::test]
async fn metadata_and_policy_listing() {
    let state = sample_state();

    let (status, body) = send(
        app(&state),
        Method::GET,
        "/.well-known/authzen-configuration",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["policy_decision_point"], "https://pdp.example.com");
    assert_eq!(
        body["access_evaluations_endpoint"],
        "https://pdp.example.com/access/v1/evaluations"
    );

    let (status, body) = send(app(&state), Method::GET, "/v1/policies", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 5);
    assert_eq!(
        list[3],
        json!({ "subject": "user:bob", "resource": "document:123", "action": "write", "effect": false })
    );
}

#[tokio::test]
async fn injected_stores_are_isolated() {
    let store = Arc::new(PolicyStore::new());
    store.add_policy("user:dana", "document:1", "read", true);
    let dana = AppState::with_store(
        config::load_from_str("version: 1\n").unwrap(),
        Arc::clone(&store),
    );
    let other = sample_state();

    let req = json!({
        "subject": { "type": "user", "id": "user:dana" },
        "resource": { "type": "document", "id": "document:1" },
        "action": { "name": "read" }
    });
    let (_, body) = post(app(&dana), "/access/v1/evaluation", req.clone()).await;
    assert_eq!(body["decision"], "ALLOW");
    let (_, body) = post(app(&other), "/access/v1/evaluation", req).await;
    assert_eq!(body["decision"], "DENY");

    // appends after startup are visible to the running router
    store.add_policy("user:dana", "document:2", "read", true);
    let (_, body) = post(
        app(&dana),
        "/access/v1/search/resource",
        json!({
            "subject": { "type": "user", "id": "user:dana" },
            "resource": { "type": "document" },
            "action": { "name": "read" }
        }),
    )
    .await;
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn ops_endpoints() {
    let state = sample_state();

    let (status, body) = send(app(&state), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let response = app(&state)
        .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    state.set_draining();
    let response = app(&state)
        .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let _ = post(
        app(&state),
        "/access/v1/evaluation",
        json!({
            "subject": { "type": "user", "id": "user:alice" },
            "resource": { "type": "document", "id": "document:123" },
            "action": { "name": "read" }
        }),
    )
    .await;

    let response = app(&state)
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("authzen_decisions_total{decision=\"ALLOW\",endpoint=\"evaluation\"} 1"));
    assert!(text.contains("authzen_http_requests_total{route=\"/access/v1/evaluation\"} 1"));
    assert!(text.contains("authzen_draining 1"));
    assert!(text.contains("authzen_policies_stored 5"));
}
