use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::auth::{create_token, JwtConfig};
use crate::infrastructure::storage::fixtures::{user, user_aged};
use crate::infrastructure::InMemoryRepositoryProvider;
use crate::interfaces::http::common::StatusPolicy;
use crate::interfaces::http::create_api_router;

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "handler-test-secret".to_string(),
        expiration_hours: 1,
        issuer: "user-service".to_string(),
    }
}

fn app(provider: &InMemoryRepositoryProvider, policy: StatusPolicy) -> Router {
    create_api_router(Arc::new(provider.clone()), jwt_config(), policy)
}

fn bearer(is_admin: bool) -> String {
    let token = create_token(&Uuid::new_v4().to_string(), is_admin, &jwt_config()).unwrap();
    format!("Bearer {}", token)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(request).await.unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(auth: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::DELETE)
        .uri("/api/v1/user")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(body.into()).unwrap()
}

fn delete_body(id: Uuid) -> String {
    json!({ "id": id }).to_string()
}

// ── GetUsers ───────────────────────────────────────────────────────

#[tokio::test]
async fn list_returns_every_user_with_count() {
    let provider = InMemoryRepositoryProvider::with_users([
        user_aged("first@example.com", 20),
        user_aged("second@example.com", 10),
        user_aged("third@example.com", 0),
    ]);

    let (status, body) = send(app(&provider, StatusPolicy::Legacy), get("/api/v1/users")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], false);
    assert_eq!(body["msg"], Value::Null);
    assert_eq!(body["count"], 3);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 3);
    assert_eq!(users[0]["email"], "first@example.com");
    assert!(users[0].get("password_hash").is_none());
}

#[tokio::test]
async fn empty_list_is_not_found() {
    let provider = InMemoryRepositoryProvider::new();

    let (status, body) = send(app(&provider, StatusPolicy::Legacy), get("/api/v1/users")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"error": true, "msg": "users were not found", "count": 0, "users": null})
    );
}

#[tokio::test]
async fn list_query_error_is_404_in_legacy_and_500_in_strict() {
    let provider = InMemoryRepositoryProvider::with_users([user("a@example.com")]);
    provider.set_query_error(Some("no such table: users"));

    let (status, body) = send(app(&provider, StatusPolicy::Legacy), get("/api/v1/users")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "users were not found");

    let (status, body) = send(app(&provider, StatusPolicy::Strict), get("/api/v1/users")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["msg"], "Database error: no such table: users");
}

#[tokio::test]
async fn list_connection_error_is_500_with_error_text() {
    let provider = InMemoryRepositoryProvider::with_users([user("a@example.com")]);
    provider.set_connection_error(Some("connection refused"));

    let (status, body) = send(app(&provider, StatusPolicy::Legacy), get("/api/v1/users")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": true, "msg": "connection refused"}));
    assert_eq!(provider.open_count(), 0);
}

// ── GetUser ────────────────────────────────────────────────────────

#[tokio::test]
async fn get_present_user() {
    let alice = user("alice@example.com");
    let provider = InMemoryRepositoryProvider::with_users([alice.clone(), user("bob@example.com")]);

    let (status, body) = send(
        app(&provider, StatusPolicy::Legacy),
        get(&format!("/api/v1/user/{}", alice.id)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], false);
    assert_eq!(body["msg"], Value::Null);
    assert_eq!(body["user"]["id"], alice.id.to_string());
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["user_role"], "user");
}

#[tokio::test]
async fn get_absent_user_is_not_found() {
    let provider = InMemoryRepositoryProvider::with_users([user("alice@example.com")]);

    let (status, body) = send(
        app(&provider, StatusPolicy::Legacy),
        get(&format!("/api/v1/user/{}", Uuid::new_v4())),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"error": true, "msg": "user with the given ID is not found", "user": null})
    );
}

#[tokio::test]
async fn malformed_id_is_500_in_legacy_and_400_in_strict() {
    let provider = InMemoryRepositoryProvider::with_users([user("alice@example.com")]);

    let (status, body) = send(
        app(&provider, StatusPolicy::Legacy),
        get("/api/v1/user/not-a-uuid"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], true);
    assert!(!body["msg"].as_str().unwrap().is_empty());
    assert!(body.get("user").is_none());

    let (status, _) = send(
        app(&provider, StatusPolicy::Strict),
        get("/api/v1/user/not-a-uuid"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Parsing happens before a connection is requested.
    assert_eq!(provider.open_count(), 0);
}

#[tokio::test]
async fn get_connection_error_is_500_with_error_text() {
    let provider = InMemoryRepositoryProvider::new();
    provider.set_connection_error(Some("too many connections"));

    let (status, body) = send(
        app(&provider, StatusPolicy::Legacy),
        get(&format!("/api/v1/user/{}", Uuid::new_v4())),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": true, "msg": "too many connections"}));
}

#[tokio::test]
async fn get_query_error_is_404_in_legacy_and_500_in_strict() {
    let alice = user("alice@example.com");
    let provider = InMemoryRepositoryProvider::with_users([alice.clone()]);
    provider.set_query_error(Some("database is locked"));
    let uri = format!("/api/v1/user/{}", alice.id);

    let (status, body) = send(app(&provider, StatusPolicy::Legacy), get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["user"], Value::Null);

    let (status, body) = send(app(&provider, StatusPolicy::Strict), get(&uri)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["msg"], "Database error: database is locked");
}

#[tokio::test]
async fn connection_lost_during_query_is_500_under_both_policies() {
    let alice = user("alice@example.com");
    let provider = InMemoryRepositoryProvider::with_users([alice.clone()]);
    provider.set_connection_lost(Some("pool timed out while waiting for an open connection"));
    let user_uri = format!("/api/v1/user/{}", alice.id);

    for policy in [StatusPolicy::Legacy, StatusPolicy::Strict] {
        let (status, body) = send(app(&provider, policy), get("/api/v1/users")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": true, "msg": "pool timed out while waiting for an open connection"})
        );

        let (status, body) = send(app(&provider, policy), get(&user_uri)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": true, "msg": "pool timed out while waiting for an open connection"})
        );
    }
}

// ── DeleteUser ─────────────────────────────────────────────────────

#[tokio::test]
async fn admin_deletes_user_then_it_is_gone() {
    let alice = user("alice@example.com");
    let provider = InMemoryRepositoryProvider::with_users([alice.clone()]);
    let auth = bearer(true);

    let (status, body) = send(
        app(&provider, StatusPolicy::Legacy),
        delete(Some(&auth), delete_body(alice.id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": false, "msg": null}));
    assert!(!provider.contains(alice.id));

    let (status, _) = send(
        app(&provider, StatusPolicy::Legacy),
        get(&format!("/api/v1/user/{}", alice.id)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        app(&provider, StatusPolicy::Legacy),
        delete(Some(&auth), delete_body(alice.id)),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["msg"],
        format!("Not found: User with id={}", alice.id)
    );
}

#[tokio::test]
async fn delete_accepts_full_user_object() {
    let alice = user("alice@example.com");
    let provider = InMemoryRepositoryProvider::with_users([alice.clone()]);
    let body = json!({
        "id": alice.id,
        "email": alice.email,
        "user_status": 1,
        "user_role": "user"
    });

    let (status, _) = send(
        app(&provider, StatusPolicy::Legacy),
        delete(Some(&bearer(true)), body.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!provider.contains(alice.id));
}

#[tokio::test]
async fn non_admin_is_denied_without_opening_a_connection() {
    let alice = user("alice@example.com");
    let provider = InMemoryRepositoryProvider::with_users([alice.clone()]);

    for body in [delete_body(alice.id), "garbage".to_string()] {
        let (status, resp) = send(
            app(&provider, StatusPolicy::Legacy),
            delete(Some(&bearer(false)), body),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp, json!({"error": true, "msg": "permission denied"}));
    }

    assert!(provider.contains(alice.id));
    assert_eq!(provider.open_count(), 0);
}

#[tokio::test]
async fn non_admin_is_403_in_strict() {
    let alice = user("alice@example.com");
    let provider = InMemoryRepositoryProvider::with_users([alice.clone()]);

    let (status, body) = send(
        app(&provider, StatusPolicy::Strict),
        delete(Some(&bearer(false)), delete_body(alice.id)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["msg"], "permission denied");
}

#[tokio::test]
async fn admin_with_connection_error_gets_error_text() {
    let alice = user("alice@example.com");
    let provider = InMemoryRepositoryProvider::with_users([alice.clone()]);
    provider.set_connection_error(Some("pool timed out while waiting for an open connection"));

    // The connection is acquired before the body is looked at.
    let (status, body) = send(
        app(&provider, StatusPolicy::Legacy),
        delete(Some(&bearer(true)), "garbage"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["msg"],
        "pool timed out while waiting for an open connection"
    );
    assert!(provider.contains(alice.id));
}

#[tokio::test]
async fn malformed_body_is_500_in_legacy_and_400_in_strict() {
    let alice = user("alice@example.com");
    let provider = InMemoryRepositoryProvider::with_users([alice.clone()]);

    let (status, body) = send(
        app(&provider, StatusPolicy::Legacy),
        delete(Some(&bearer(true)), r#"{"id": "not-a-uuid"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], true);
    assert!(!body["msg"].as_str().unwrap().is_empty());

    let (status, _) = send(
        app(&provider, StatusPolicy::Strict),
        delete(Some(&bearer(true)), "{"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(provider.contains(alice.id));
}

#[tokio::test]
async fn delete_without_token_is_401() {
    let alice = user("alice@example.com");
    let provider = InMemoryRepositoryProvider::with_users([alice.clone()]);

    let (status, body) = send(
        app(&provider, StatusPolicy::Legacy),
        delete(None, delete_body(alice.id)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);
    assert_eq!(provider.open_count(), 0);
}

#[tokio::test]
async fn ill_shaped_admin_claim_is_401() {
    let alice = user("alice@example.com");
    let provider = InMemoryRepositoryProvider::with_users([alice.clone()]);
    let config = jwt_config();
    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "sub": "someone",
        "is_admin": "yes",
        "iat": now,
        "exp": now + 3600,
        "iss": config.issuer,
    });
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .unwrap();

    let (status, body) = send(
        app(&provider, StatusPolicy::Legacy),
        delete(Some(&format!("Bearer {}", token)), delete_body(alice.id)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["msg"],
        "Unauthenticated: claim 'is_admin' is not a boolean"
    );
    assert!(provider.contains(alice.id));
    assert_eq!(provider.open_count(), 0);
}
