use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::{AppError, AppResult, IdPath, JsonBody, db::Message};

use super::{ChatState, ensure_chat};

#[derive(Debug, Deserialize)]
pub(crate) struct MessageFields {
    text: String,
}

/// A message of `chat_id`, telling a missing chat apart from a missing message.
async fn find_msg(db_pool: &SqlitePool, chat_id: i64, id: i64) -> AppResult<Message> {
    let msg: Option<Message> = sqlx::query_as("SELECT id,text,chat_id FROM messages WHERE id=? AND chat_id=?")
        .bind(id)
        .bind(chat_id)
        .fetch_optional(db_pool)
        .await?;

    match msg {
        Some(msg) => Ok(msg),
        None => {
            ensure_chat(db_pool, chat_id).await?;
            Err(AppError::NotFound("Message"))
        }
    }
}

#[debug_handler(state = ChatState)]
pub(crate) async fn list_msgs(
    IdPath(chat_id): IdPath<i64>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Value>> {
    ensure_chat(&db_pool, chat_id).await?;

    let messages: Vec<Message> = sqlx::query_as("SELECT id,text,chat_id FROM messages WHERE chat_id=? ORDER BY id")
        .bind(chat_id)
        .fetch_all(&db_pool)
        .await?;

    Ok(Json(json!({ "messages": messages })))
}

#[debug_handler(state = ChatState)]
pub(crate) async fn create_msg(
    IdPath(chat_id): IdPath<i64>,
    State(db_pool): State<SqlitePool>,
    JsonBody(MessageFields { text }): JsonBody<MessageFields>,
) -> AppResult<(StatusCode, Json<Value>)> {
    ensure_chat(&db_pool, chat_id).await?;

    let msg: Message = sqlx::query_as("INSERT INTO messages (text,chat_id) VALUES (?,?) RETURNING id,text,chat_id")
        .bind(&text)
        .bind(chat_id)
        .fetch_one(&db_pool)
        .await?;

    tracing::info!(chat_id, message_id = msg.id, "message created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Message created successfully", "chat_message": msg })),
    ))
}

#[debug_handler(state = ChatState)]
pub(crate) async fn get_msg(
    IdPath((chat_id, id)): IdPath<(i64, i64)>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Value>> {
    let msg = find_msg(&db_pool, chat_id, id).await?;
    Ok(Json(json!({ "chat_message": msg })))
}

#[debug_handler(state = ChatState)]
pub(crate) async fn update_msg(
    IdPath((chat_id, id)): IdPath<(i64, i64)>,
    State(db_pool): State<SqlitePool>,
    JsonBody(MessageFields { text }): JsonBody<MessageFields>,
) -> AppResult<Json<Value>> {
    find_msg(&db_pool, chat_id, id).await?;

    let msg: Message = sqlx::query_as("UPDATE messages SET text=? WHERE id=? AND chat_id=? RETURNING id,text,chat_id")
        .bind(&text)
        .bind(id)
        .bind(chat_id)
        .fetch_optional(&db_pool)
        .await?
        .ok_or(AppError::NotFound("Message"))?;

    tracing::info!(chat_id, message_id = id, "message updated");

    Ok(Json(json!({ "message": "Message updated successfully", "chat_message": msg })))
}

#[debug_handler(state = ChatState)]
pub(crate) async fn delete_msg(
    IdPath((chat_id, id)): IdPath<(i64, i64)>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Value>> {
    find_msg(&db_pool, chat_id, id).await?;

    sqlx::query("DELETE FROM messages WHERE id=? AND chat_id=?")
        .bind(id)
        .bind(chat_id)
        .execute(&db_pool)
        .await?;

    tracing::info!(chat_id, message_id = id, "message deleted");

    Ok(Json(json!({ "message": "Message deleted successfully" })))
}
