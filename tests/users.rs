mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{send, user_app};

#[tokio::test]
async fn create_assigns_fresh_ids() {
    let app = user_app().await;

    let (status, body) = send(&app, Method::POST, "/user", Some(json!({ "username": "ada", "email": "ada@example.com" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["username"], "ada");
    let first = body["user"]["id"].as_i64().unwrap();

    let (_, body) = send(&app, Method::POST, "/user", Some(json!({ "username": "grace", "email": "grace@example.com" }))).await;
    let second = body["user"]["id"].as_i64().unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn caller_supplied_id_is_ignored() {
    let app = user_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/user",
        Some(json!({ "id": 99, "username": "ada", "email": "ada@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["id"], 1);
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let app = user_app().await;
    send(&app, Method::POST, "/user", Some(json!({ "username": "ada", "email": "ada@example.com" }))).await;

    let (status, body) = send(&app, Method::POST, "/user", Some(json!({ "username": "ada", "email": "other@example.com" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username already exists");

    let (_, body) = send(&app, Method::GET, "/user", None).await;
    assert_eq!(body["users"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = user_app().await;
    send(&app, Method::POST, "/user", Some(json!({ "username": "ada", "email": "ada@example.com" }))).await;

    let (status, body) = send(&app, Method::POST, "/user", Some(json!({ "username": "lovelace", "email": "ada@example.com" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already exists");
}

#[tokio::test]
async fn missing_field_is_a_bad_request() {
    let app = user_app().await;

    let (status, body) = send(&app, Method::POST, "/user", Some(json!({ "username": "ada" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let app = user_app().await;

    let (status, body) = send(&app, Method::GET, "/user/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, _) = send(&app, Method::PUT, "/user/42", Some(json!({ "username": "x", "email": "x@example.com" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/user/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_a_bad_request() {
    let app = user_app().await;

    let (status, body) = send(&app, Method::GET, "/user/ada", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn update_then_get_reflects_the_update() {
    let app = user_app().await;
    let id = common::create_user(&app, "ada").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/user/{id}"),
        Some(json!({ "username": "countess", "email": "countess@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User updated successfully");

    let (status, body) = send(&app, Method::GET, &format!("/user/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"], json!({ "id": id, "username": "countess", "email": "countess@example.com" }));
}

#[tokio::test]
async fn update_onto_taken_username_is_rejected() {
    let app = user_app().await;
    common::create_user(&app, "ada").await;
    let grace = common::create_user(&app, "grace").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/user/{grace}"),
        Some(json!({ "username": "ada", "email": "grace@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username already exists");
}

#[tokio::test]
async fn update_onto_taken_email_is_rejected() {
    let app = user_app().await;
    common::create_user(&app, "ada").await;
    let grace = common::create_user(&app, "grace").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/user/{grace}"),
        Some(json!({ "username": "grace", "email": "ada@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already exists");

    let (_, body) = send(&app, Method::GET, &format!("/user/{grace}"), None).await;
    assert_eq!(body["user"]["email"], "grace@example.com");
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = user_app().await;
    let id = common::create_user(&app, "ada").await;

    let (status, body) = send(&app, Method::DELETE, &format!("/user/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let (status, _) = send(&app, Method::GET, &format!("/user/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_ordered_by_id() {
    let app = user_app().await;
    common::create_user(&app, "ada").await;
    common::create_user(&app, "grace").await;

    let (status, body) = send(&app, Method::GET, "/user", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["username"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, ["ada", "grace"]);
}
