#![allow(dead_code)]

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use chatusers::{
    chats::{self, ChatState, UserDirectory},
    db, res, users,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends one request through `app` and returns the status and JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

pub async fn user_app() -> Router {
    let db_pool = db::open_in_memory(res::USERS_SCHEMA).await.unwrap();
    users::service(db_pool)
}

/// Serves `app` on an ephemeral local port and returns its base url.
pub async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// A chat service backed by a live in-memory user service. Returns both apps.
pub async fn chat_app() -> (Router, Router) {
    let users = user_app().await;
    let user_service_url = spawn(users.clone()).await;

    let db_pool = db::open_in_memory(res::CHATS_SCHEMA).await.unwrap();
    let directory = UserDirectory::new(&user_service_url, LOOKUP_TIMEOUT).unwrap();

    (chats::service(ChatState { db_pool, users: directory }), users)
}

pub async fn create_user(users: &Router, username: &str) -> i64 {
    let (status, body) = send(
        users,
        Method::POST,
        "/user",
        Some(serde_json::json!({ "username": username, "email": format!("{username}@example.com") })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    body["user"]["id"].as_i64().unwrap()
}
