//! ApiClient tests against a live fake backend: request shaping, CSRF handling,
//! error normalization, and list envelopes.

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use mgsa_portal::api::{self, ApiClient, CallOptions, HttpTransport};
use mgsa_portal::errors::ClientError;
use common::*;

#[actix_web::test]
async fn test_get_returns_json_and_sends_content_type() {
    let portal = spawn_portal().await;
    portal.route("GET", "/api/tutorials/", 200, json!([{"id": 1, "title": "Algebra"}]));
    let (client, _) = http_client(&portal);

    let value = client.get(api::TUTORIALS).await.expect("get tutorials");
    assert_eq!(value, json!([{"id": 1, "title": "Algebra"}]));

    let reqs = portal.requests_to("GET", "/api/tutorials/");
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(reqs[0].csrf, None, "GET must not carry the CSRF header");
}

#[actix_web::test]
async fn test_unsafe_methods_carry_token_from_cookie() {
    let portal = spawn_portal().await;
    portal.issue_csrf_cookie("tok-from-server");
    portal.route("GET", "/api/auth/me/", 200, json!({"username": "liya", "role": "Student"}));
    portal.route("POST", "/api/tutorials/registrations/", 201, json!({"id": 10}));
    portal.route("DELETE", "/api/executive/posts/4/", 204, json!(null));
    let (client, _) = http_client(&portal);

    // The first response plants the cookie in the jar.
    client.get(api::AUTH_ME).await.expect("me");
    client
        .post(api::TUTORIAL_REGISTRATIONS, json!({"tutorial": 3}))
        .await
        .expect("register");
    let deleted = client.delete("/executive/posts/4/").await.expect("delete");
    assert_eq!(deleted, serde_json::Value::Null);

    let post = &portal.requests_to("POST", "/api/tutorials/registrations/")[0];
    assert_eq!(post.csrf.as_deref(), Some("tok-from-server"));
    assert_eq!(post.json(), json!({"tutorial": 3}));
    let delete = &portal.requests_to("DELETE", "/api/executive/posts/4/")[0];
    assert_eq!(delete.csrf.as_deref(), Some("tok-from-server"));
}

#[actix_web::test]
async fn test_seeded_cookie_is_used() {
    let portal = spawn_portal().await;
    portal.route("POST", "/api/executive/posts/", 201, json!({"id": 1}));
    let (client, transport) = http_client(&portal);
    transport.add_cookie("csrftoken=seeded; Path=/");

    client
        .post(api::EXECUTIVE_POSTS, json!({"title": "t", "content": "c"}))
        .await
        .expect("create");
    assert_eq!(
        portal.requests_to("POST", "/api/executive/posts/")[0].csrf.as_deref(),
        Some("seeded")
    );
}

#[actix_web::test]
async fn test_content_type_override_is_respected() {
    let portal = spawn_portal().await;
    portal.route("GET", "/api/posts/", 200, json!([]));
    let (client, _) = http_client(&portal);

    let options = CallOptions::default().with_header("content-type", "text/plain");
    client.call(api::POSTS, options).await.expect("get posts");
    assert_eq!(
        portal.requests_to("GET", "/api/posts/")[0].content_type.as_deref(),
        Some("text/plain")
    );
}

#[actix_web::test]
async fn test_non_success_status_is_request_error() {
    let portal = spawn_portal().await;
    portal.route("GET", "/api/analytics/dashboard-stats/", 403, json!({"success": false, "message": "Access denied"}));
    let (client, _) = http_client(&portal);

    let err = client.get(api::ADMIN_STATS).await.expect_err("should fail");
    match &err {
        ClientError::Request { status, status_text, .. } => {
            assert_eq!(*status, 403);
            assert_eq!(status_text, "Forbidden");
        }
        other => panic!("expected Request error, got {other:?}"),
    }
    assert_eq!(err.server_message(), Some("Access denied"));

    let missing = client.get("/nowhere/").await.expect_err("404");
    assert_eq!(missing.status(), Some(404));
}

#[actix_web::test]
async fn test_unreachable_server_is_network_error() {
    // Grab a free port, then close it so nothing is listening.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind")
        .local_addr()
        .expect("addr")
        .port();
    let site = format!("http://127.0.0.1:{port}");
    let transport = HttpTransport::new(&site, Duration::from_secs(2)).expect("transport");
    let client = ApiClient::new(Arc::new(transport), &site, "/api", "csrftoken");

    let err = client.get(api::AUTH_ME).await.expect_err("nothing listening");
    assert!(matches!(err, ClientError::Network(_)), "got {err:?}");
}

#[actix_web::test]
async fn test_site_calls_skip_api_prefix() {
    let portal = spawn_portal().await;
    portal.route("POST", "/login/submit/", 200, json!({"success": true}));
    let (client, _) = http_client(&portal);

    client
        .call_site(api::LOGIN_SUBMIT, CallOptions::post(json!({"username": "a", "password": "b"})))
        .await
        .expect("login");
    assert_eq!(portal.requests_to("POST", "/login/submit/").len(), 1);
    assert!(portal.requests_to("POST", "/api/login/submit/").is_empty());
}

#[actix_web::test]
async fn test_paginated_and_plain_lists_match() {
    let portal = spawn_portal().await;
    let items = json!([{"id": 1}, {"id": 2}]);
    portal.route("GET", "/api/tutorials/", 200, json!({"count": 2, "results": items.clone()}));
    portal.route("GET", "/api/posts/", 200, items);
    let (client, _) = http_client(&portal);

    let paged = api::records_from(client.get(api::TUTORIALS).await.expect("tutorials"));
    let plain = api::records_from(client.get(api::POSTS).await.expect("posts"));
    assert_eq!(paged, plain);
}
