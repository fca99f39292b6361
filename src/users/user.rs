use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::{AppError, AppResult, IdPath, JsonBody, db::User};

#[derive(Debug, Deserialize)]
pub(crate) struct UserFields {
    username: String,
    email: String,
}

#[debug_handler]
pub(crate) async fn list_users(
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Value>> {
    let users: Vec<User> = sqlx::query_as("SELECT id,username,email FROM users ORDER BY id")
        .fetch_all(&db_pool)
        .await?;

    Ok(Json(json!({ "users": users })))
}

#[debug_handler]
pub(crate) async fn get_user(
    IdPath(id): IdPath<i64>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Value>> {
    let user: User = sqlx::query_as("SELECT id,username,email FROM users WHERE id=?")
        .bind(id)
        .fetch_optional(&db_pool)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(Json(json!({ "user": user })))
}

#[debug_handler]
pub(crate) async fn create_user(
    State(db_pool): State<SqlitePool>,
    JsonBody(UserFields { username, email }): JsonBody<UserFields>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let user: User = sqlx::query_as("INSERT INTO users (username,email) VALUES (?,?) RETURNING id,username,email")
        .bind(&username)
        .bind(&email)
        .fetch_one(&db_pool)
        .await
        .map_err(duplicate_or)?;

    tracing::info!(user_id = user.id, username = %user.username, "user created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully", "user": user })),
    ))
}

#[debug_handler]
pub(crate) async fn update_user(
    IdPath(id): IdPath<i64>,
    State(db_pool): State<SqlitePool>,
    JsonBody(UserFields { username, email }): JsonBody<UserFields>,
) -> AppResult<Json<Value>> {
    let user: User = sqlx::query_as("UPDATE users SET username=?,email=? WHERE id=? RETURNING id,username,email")
        .bind(&username)
        .bind(&email)
        .bind(id)
        .fetch_optional(&db_pool)
        .await
        .map_err(duplicate_or)?
        .ok_or(AppError::NotFound("User"))?;

    tracing::info!(user_id = user.id, "user updated");

    Ok(Json(json!({ "message": "User updated successfully", "user": user })))
}

#[debug_handler]
pub(crate) async fn delete_user(
    IdPath(id): IdPath<i64>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Value>> {
    let deleted = sqlx::query("DELETE FROM users WHERE id=?")
        .bind(id)
        .execute(&db_pool)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(AppError::NotFound("User"));
    }

    tracing::info!(user_id = id, "user deleted");

    Ok(Json(json!({ "message": "User deleted successfully" })))
}

/// Unique violations become 400s naming the clashing column.
fn duplicate_or(err: sqlx::Error) -> AppError {
    let violated = err
        .as_database_error()
        .filter(|db_err| db_err.is_unique_violation())
        .map(|db_err| db_err.message().to_owned());

    match violated {
        Some(msg) if msg.contains("users.email") => AppError::BadRequest("Email already exists".to_owned()),
        Some(_) => AppError::BadRequest("Username already exists".to_owned()),
        None => err.into(),
    }
}
