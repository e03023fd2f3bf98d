#![allow(dead_code)]

use std::sync::Arc;

use askboard_api::app::build_router;
use askboard_api::config::ServerConfig;
use askboard_api::middleware::user::USER_ID_HEADER;
use askboard_api::state::AppState;
use askboard_core::types::DbId;
use askboard_core::users::StaticUserDirectory;
use askboard_qa::QaFacade;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const ASKER: DbId = 1;
pub const HELPER: DbId = 2;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router, with the production middleware
/// stack, over the given pool. Display names come from a static directory.
pub fn build_test_app(pool: PgPool) -> Router {
    let users = StaticUserDirectory::new()
        .with_user(ASKER, "Asker")
        .with_user(HELPER, "Helper");
    let state = AppState {
        qa: Arc::new(QaFacade::new(pool.clone(), Arc::new(users))),
        pool,
        config: Arc::new(test_config()),
    };
    build_router(state).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user: Option<DbId>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_ID_HEADER, user.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_as(app: Router, uri: &str, user: DbId) -> Response<Body> {
    send(app, Method::GET, uri, Some(user), None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    user: DbId,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(user), Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    user: DbId,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(user), Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str, user: DbId) -> Response<Body> {
    send(app, Method::POST, uri, Some(user), None).await
}

pub async fn delete(app: Router, uri: &str, user: DbId) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(user), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
