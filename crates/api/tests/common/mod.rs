#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use reviews_api::auth::jwt::{issue_token, JwtConfig};
use reviews_api::config::ServerConfig;
use reviews_api::middleware::auth::ADMIN_ROLE;
use reviews_api::router::build_app_router;
use reviews_api::state::AppState;
use reviews_core::language::Language;
use reviews_core::slug::SlugPolicy;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// English as the site language and the built-in reserved slugs.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            issuer: "reviews".to_string(),
            token_ttl_mins: 15,
        },
        default_language: Language::English,
        slug_policy: SlugPolicy::default(),
    }
}

/// Build the full application router, as `main.rs` does, on the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState::new(pool, test_config()))
}

/// A user with a valid bearer token.
pub struct Actor {
    pub id: Uuid,
    pub token: String,
}

impl Actor {
    pub fn user() -> Self {
        Self::with_role("user")
    }

    pub fn admin() -> Self {
        Self::with_role(ADMIN_ROLE)
    }

    fn with_role(role: &str) -> Self {
        let id = Uuid::new_v4();
        let token = issue_token(id, role, &test_config().jwt).unwrap();
        Self { id, token }
    }
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    actor: &Actor,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(&actor.token), Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    actor: &Actor,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(&actor.token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, actor: &Actor) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(&actor.token), None).await
}

/// Send a write without any `Authorization` header.
pub async fn post_anonymous(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `Location` header of a redirect.
pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get("location")
        .expect("Missing Location header")
        .to_str()
        .unwrap()
}
